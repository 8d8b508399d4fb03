//! Error types for the PostgreSQL compiler.

/// Errors that can occur while compiling statements or resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    /// A `[schema.]table` reference was empty.
    #[error("Schema reference is empty")]
    EmptyReference,

    /// A `[schema.]table` reference had more than one dot.
    #[error("Invalid schema reference '{reference}': expected 'schema.table' or 'table'")]
    ReferenceFormat {
        /// The offending reference.
        reference: String,
    },

    /// A JSON literal could not be encoded.
    #[error("JSON encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// A custom JSON encoder reported a failure.
    #[error("JSON encoder failed: {message}")]
    Encoder {
        /// Error message reported by the encoder.
        message: String,
    },

    /// A configuration value was present but had the wrong shape.
    #[error("Invalid configuration value for '{key}': {message}")]
    Config {
        /// Dotted configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, PostgresError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_format_message() {
        let err = PostgresError::ReferenceFormat {
            reference: "a.b.c".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid schema reference 'a.b.c': expected 'schema.table' or 'table'"
        );
    }

    #[test]
    fn test_encoding_from_serde_json() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: PostgresError = source.into();
        assert!(matches!(err, PostgresError::Encoding(_)));
    }
}
