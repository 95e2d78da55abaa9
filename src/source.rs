use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::DocumentError;

const SERVICE_PREFIX: &str = "s-adr-";
const DEPRECATED_PREFIX: &str = "do-not-use-f-adr-";
const FOUNDATIONAL_EXCLUDED: &[&str] = &["readme.md", "foundational-adr-structure.md"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Foundational,
    Deprecated,
    Service,
}

impl DocumentKind {
    /// Whether a file name belongs to this kind's directory listing.
    pub fn accepts(self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        if !lower.ends_with(".md") {
            return false;
        }
        match self {
            DocumentKind::Foundational => !FOUNDATIONAL_EXCLUDED.contains(&lower.as_str()),
            DocumentKind::Deprecated => file_name.starts_with(DEPRECATED_PREFIX),
            DocumentKind::Service => file_name.starts_with(SERVICE_PREFIX),
        }
    }

    /// Guess the kind from a file name, for single-file inspection.
    pub fn infer(file_name: &str) -> DocumentKind {
        if file_name.starts_with(SERVICE_PREFIX) {
            DocumentKind::Service
        } else if file_name.starts_with(DEPRECATED_PREFIX) {
            DocumentKind::Deprecated
        } else {
            DocumentKind::Foundational
        }
    }
}

#[derive(Debug, Clone)]
pub struct RawDocument {
    pub source: String,
    pub kind: DocumentKind,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct DocumentRef {
    pub path: PathBuf,
    pub kind: DocumentKind,
}

impl DocumentRef {
    pub fn load(&self) -> Result<RawDocument, DocumentError> {
        let source = self.path.display().to_string();
        let bytes = std::fs::read(&self.path).map_err(|err| DocumentError::Read {
            source_tag: source.clone(),
            err,
        })?;
        let text = String::from_utf8(bytes)
            .map_err(|_| DocumentError::Encoding { source_tag: source.clone() })?;
        Ok(RawDocument {
            source,
            kind: self.kind,
            text,
        })
    }
}

/// List the documents of one kind under `dir`, sorted by file name.
pub fn discover(dir: &Path, kind: DocumentKind, recursive: bool) -> Result<Vec<DocumentRef>> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .sort_by_file_name();

    let mut docs = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if kind.accepts(name) {
            docs.push(DocumentRef {
                path: entry.into_path(),
                kind,
            });
        }
    }
    Ok(docs)
}
