pub mod file;
pub mod set;

pub use file::{classify, FileKind, TemplateFile};
pub use set::{load_template_set, TemplateSet};
