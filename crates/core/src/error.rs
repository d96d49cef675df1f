//! Domain error taxonomy shared by every crate in the workspace.

/// Errors raised by domain logic.
///
/// HTTP mapping lives in the API crate; this type carries no transport
/// concerns.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested entity (dashboard, widget, source workspace) does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Input rejected before any mutation took place.
    #[error("{0}")]
    Validation(String),

    /// The operation is not allowed on this entity (e.g. editing a frozen field).
    #[error("{0}")]
    UnsupportedOperation(String),

    /// A requested scope exceeds the platform sharing policy.
    #[error("{0}")]
    Policy(String),

    /// Stored manifest data could not be decoded.
    #[error("Corrupt manifest: {0}")]
    CorruptManifest(String),

    /// The external query engine failed.
    #[error("Upstream query failed: {0}")]
    Upstream(String),

    /// The request was aborted before completion.
    #[error("Request cancelled")]
    Cancelled,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`] with any displayable id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
