use thiserror::Error;

/// Failure to resolve a related type's structural data.
///
/// Expected in normal operation: optional dependencies are common, so a
/// missing ancestor or interface degrades the asking branch to non-match
/// rather than surfacing anywhere near the type-loading path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("type not found: {0}")]
    NotFound(String),

    #[error("type unreadable: {name}: {reason}")]
    Unreadable { name: String, reason: String },
}

impl ResolveError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    pub fn unreadable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unreadable {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type ResolveResult<T> = std::result::Result<T, ResolveError>;
