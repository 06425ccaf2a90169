use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::path::PathBuf;

use make_ios::assemble::plan_assembly;
use make_ios::config::load_store_config;
use make_ios::params::{ParameterSet, Paradigm};
use make_ios::placeholder::{substitute, PlaceholderBindings};
use make_ios::template::load_template_set;

fn store_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
}

fn sample_bindings() -> PlaceholderBindings {
    let params = ParameterSet::new(
        "BenchApp",
        "com.example.benchapp",
        "16.0",
        "Bench Inc",
        Paradigm::UIKit,
    )
    .unwrap();
    PlaceholderBindings::from_parameters(&params)
}

fn bench_template_loading(c: &mut Criterion) {
    let root = store_path();
    let config = load_store_config(&root).unwrap();

    c.bench_function("load_template_set", |b| {
        b.iter(|| {
            let set = load_template_set(black_box(&root), black_box(&config), "UIKit").unwrap();
            black_box(set)
        });
    });
}

fn bench_substitution(c: &mut Criterion) {
    let bindings = sample_bindings();
    let text = std::fs::read_to_string(store_path().join("tuist/Project.swift")).unwrap();

    c.bench_function("substitute Project.swift", |b| {
        b.iter(|| {
            let out = substitute(black_box(&text), black_box(&bindings)).unwrap();
            black_box(out)
        });
    });
}

fn bench_assembly_planning(c: &mut Criterion) {
    let root = store_path();
    let config = load_store_config(&root).unwrap();
    let set = load_template_set(&root, &config, "UIKit").unwrap();
    let bindings = sample_bindings();

    c.bench_function("plan_assembly", |b| {
        b.iter(|| {
            let plan = plan_assembly(black_box(&set), black_box(&bindings)).unwrap();
            black_box(plan)
        });
    });
}

criterion_group!(
    benches,
    bench_template_loading,
    bench_substitution,
    bench_assembly_planning
);
criterion_main!(benches);
