use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::placeholder::{find_path_tokens, find_tokens};

/// How a template file is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// UTF-8 text; placeholder tokens are substituted.
    Text,
    /// Copied byte-for-byte.
    Binary,
}

/// One file of a template set, loaded into memory.
#[derive(Debug, Clone)]
pub struct TemplateFile {
    /// Where the file was read from.
    pub source: PathBuf,
    /// Path relative to the project root, before token substitution.
    pub destination: PathBuf,
    pub content: Vec<u8>,
    pub kind: FileKind,
    /// Tokens referenced by the destination path and, for text, the content.
    pub tokens: BTreeSet<String>,
}

impl TemplateFile {
    pub fn new(source: PathBuf, destination: PathBuf, content: Vec<u8>, force_copy: bool) -> Self {
        let kind = if force_copy {
            FileKind::Binary
        } else {
            classify(&content)
        };

        let mut tokens = find_path_tokens(&destination);
        if kind == FileKind::Text {
            if let Ok(text) = std::str::from_utf8(&content) {
                tokens.extend(find_tokens(text));
            }
        }

        Self {
            source,
            destination,
            content,
            kind,
            tokens,
        }
    }

    pub fn is_binary(&self) -> bool {
        self.kind == FileKind::Binary
    }
}

/// Classify content using content_inspector (BOM-aware, null-byte scanning).
///
/// Only the first 8KB are inspected. Text that is not valid UTF-8 (UTF-16,
/// Latin-1) is treated as binary so its bytes are never re-encoded.
pub fn classify(content: &[u8]) -> FileKind {
    let head = &content[..content.len().min(8192)];
    if !content_inspector::inspect(head).is_text() {
        return FileKind::Binary;
    }
    if std::str::from_utf8(content).is_err() {
        return FileKind::Binary;
    }
    FileKind::Text
}
