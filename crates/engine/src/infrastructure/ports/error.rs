//! Error types for port operations.

/// Storage failures reported by repository adapters.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// An adapter may report a missing record this way instead of `Ok(None)`.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The backing store failed while running `operation`.
    #[error("Storage error in {operation}: {message}")]
    Storage {
        operation: &'static str,
        message: String,
    },
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
