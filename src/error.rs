use thiserror::Error;

/// Failure scoped to one document; the batch logs it and moves on.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {source_tag}: {err}")]
    Read {
        source_tag: String,
        #[source]
        err: std::io::Error,
    },
    #[error("{source_tag} is not valid UTF-8")]
    Encoding { source_tag: String },
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("service name {name:?} is shared by {count} governance records")]
    DuplicateServiceName { name: String, count: usize },
}
