//! Error types and handling infrastructure for document construction and
//! value conversion

use anyhow::Error;

/// Construction-time invariant failures of the document model.
///
/// These are raised at the moment an offending node would be built, never
/// later: an `Object` with a blank or duplicate key and a `Number` from a
/// non-finite float are rejected by the constructors themselves.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    #[error("object key violates uniqueness rules: {message}")]
    KeyUniqueness { message: String },

    #[error("number is not finite: {value}")]
    NonFiniteNumber { value: f64 },
}

impl DocumentError {
    pub fn duplicate_key(key: &str) -> Self {
        Self::KeyUniqueness {
            message: format!("duplicate key '{}'", key),
        }
    }

    pub fn blank_key() -> Self {
        Self::KeyUniqueness {
            message: "blank key".to_string(),
        }
    }

    pub fn non_finite(value: f64) -> Self {
        Self::NonFiniteNumber { value }
    }
}

/// Failures that abort one conversion call.
///
/// No partial tree is ever returned: the first failure propagates to the
/// caller and the document built so far is dropped.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("circular reference detected while converting {type_name}")]
    CircularReference { type_name: &'static str },

    #[error("unsupported type: {type_name}")]
    UnsupportedType { type_name: String },

    #[error("map keys must convert to strings, got {found}")]
    InvalidKeyType { found: String },

    #[error("recursion limit of {limit} exceeded")]
    RecursionLimit { limit: usize },

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Other(#[from] Error),
}

impl ConversionError {
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
        }
    }

    pub fn invalid_key(found: impl Into<String>) -> Self {
        Self::InvalidKeyType {
            found: found.into(),
        }
    }

    /// Stable category name for this error.
    ///
    /// Callers that must not leak internal diagnostics (a request dispatcher
    /// mapping failures to a generic server error) key their policy off this
    /// enumerable set instead of the display text.
    pub fn category(&self) -> &'static str {
        match self {
            Self::CircularReference { .. } => "circular_reference",
            Self::UnsupportedType { .. } => "unsupported_type",
            Self::InvalidKeyType { .. } => "invalid_key_type",
            Self::RecursionLimit { .. } => "recursion_limit",
            Self::Document(DocumentError::KeyUniqueness { .. }) => "key_uniqueness",
            Self::Document(DocumentError::NonFiniteNumber { .. }) => "non_finite_number",
            Self::Other(_) => "other",
        }
    }

    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::CircularReference { type_name } => {
                format!("Circular reference detected in value of type {}", type_name)
            }
            Self::UnsupportedType { type_name } => {
                format!("Cannot convert unsupported type {}", type_name)
            }
            Self::InvalidKeyType { found } => {
                format!("Map keys must be strings, found {}", found)
            }
            Self::RecursionLimit { limit } => {
                format!("Value graph exceeds the nesting limit of {}", limit)
            }
            Self::Document(err) => format!("Document invariant violated: {}", err),
            Self::Other(err) => format!("Unexpected error: {}", err),
        }
    }
}

/// Result type for document construction
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_error_display() {
        let error = DocumentError::duplicate_key("id");
        assert_eq!(
            error.to_string(),
            "object key violates uniqueness rules: duplicate key 'id'"
        );

        let error = DocumentError::non_finite(f64::INFINITY);
        assert!(error.to_string().contains("not finite"));
    }

    #[test]
    fn test_conversion_error_categories() {
        let errors = vec![
            ConversionError::CircularReference { type_name: "Node" },
            ConversionError::unsupported("std::fs::File"),
            ConversionError::invalid_key("Number"),
            ConversionError::RecursionLimit { limit: 1000 },
            ConversionError::Document(DocumentError::blank_key()),
        ];

        let categories: Vec<&str> = errors.iter().map(|e| e.category()).collect();
        assert_eq!(
            categories,
            vec![
                "circular_reference",
                "unsupported_type",
                "invalid_key_type",
                "recursion_limit",
                "key_uniqueness",
            ]
        );
    }

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = vec![
            ConversionError::unsupported("X"),
            ConversionError::invalid_key("Boolean"),
            ConversionError::Document(DocumentError::non_finite(f64::NAN)),
        ];

        for error in errors {
            assert!(!error.user_message().is_empty());
        }
    }
}
