use thiserror::Error;

pub type LoadResult<T> = Result<T, LoadError>;

/// Errors produced by [`crate::transform::ImageLoader`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// A required key is absent from the sample record.
    #[error("sample record is missing required key '{0}'")]
    MissingKey(&'static str),

    /// A key is present but holds a value of the wrong kind.
    #[error("sample record key '{key}' must be {expected}, got {found}")]
    InvalidKey {
        key: &'static str,
        expected: &'static str,
        found: String,
    },

    /// The decoder rejected the file (missing, unreadable, corrupt, unsupported).
    /// The decoder's own error is passed through as-is.
    #[error(transparent)]
    Decode(#[from] image::ImageError),
}

impl LoadError {
    /// Whether this error came from the decode step.
    pub fn is_decode(&self) -> bool {
        matches!(self, LoadError::Decode(_))
    }
}
