//! Error types for tola-fingerprint.
//!
//! Fingerprinting and field access fail fast; nothing here is retried.

use thiserror::Error;

/// Errors that can occur while fingerprinting values or addressing fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FingerprintError {
    /// The value is not text, not a tuple, and has no native hash
    #[error("cannot fingerprint value of kind `{kind}`")]
    UnsupportedValue {
        /// Kind name of the offending value
        kind: &'static str,
    },

    /// A field was looked up by name and is absent
    #[error("field not found: {0}")]
    FieldNotFound(String),

    /// A dotted assignment ran into a value that is not a mapping
    #[error("cannot assign `{path}`: `{segment}` is not a mapping")]
    PathConflict {
        /// Remaining path that was being assigned
        path: String,
        /// Segment holding the non-mapping value
        segment: String,
    },
}

/// Result type alias for fingerprint operations.
pub type FingerprintResult<T> = Result<T, FingerprintError>;

impl FingerprintError {
    /// Create a missing-field error.
    pub fn field_not_found(name: impl Into<String>) -> Self {
        Self::FieldNotFound(name.into())
    }

    /// Create a path conflict error.
    pub fn path_conflict(path: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::PathConflict {
            path: path.into(),
            segment: segment.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FingerprintError::UnsupportedValue { kind: "list" };
        assert_eq!(err.to_string(), "cannot fingerprint value of kind `list`");

        let err = FingerprintError::field_not_found("title");
        assert_eq!(err.to_string(), "field not found: title");

        let err = FingerprintError::path_conflict("title.main", "title");
        assert_eq!(
            err.to_string(),
            "cannot assign `title.main`: `title` is not a mapping"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FingerprintError>();
    }
}
