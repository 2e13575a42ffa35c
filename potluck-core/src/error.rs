use thiserror::Error;

/// Error kinds surfaced to callers unmodified. Every mutation either
/// succeeds or returns one of these; nothing is silently swallowed or
/// auto-corrected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed or missing required fields, non-positive numeric fields,
    /// empty required collections.
    #[error("{0}")]
    Validation(String),

    /// Actor is not the resource's author attempting a mutation.
    #[error("{0}")]
    Permission(String),

    /// Duplicate relation creation (e.g. favoriting an already-favorited
    /// recipe).
    #[error("{0}")]
    Conflict(String),

    /// Operating on an absent entity or relation.
    #[error("{0}")]
    NotFound(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Error::Permission(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Error::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound(message.into())
    }
}
