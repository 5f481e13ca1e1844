//! Error types for the filter parser.

use thiserror::Error;

/// A specialized Result type for filter parsing operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur during filter parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// A fragment of the expression is not a valid `field:value` term.
    #[error("invalid filter expression: {fragment}")]
    InvalidExpression {
        /// The malformed fragment.
        fragment: String,
    },

    /// The term names a field the filter grammar does not know.
    #[error("unknown filter field: {field}")]
    UnknownField {
        /// The unrecognized field name.
        field: String,
    },

    /// The value cannot be interpreted for its field.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// The field the value was given for.
        field: String,
        /// The value that failed to parse.
        value: String,
    },
}

impl FilterError {
    /// Creates an invalid expression error.
    pub fn invalid_expression(fragment: impl Into<String>) -> Self {
        FilterError::InvalidExpression {
            fragment: fragment.into(),
        }
    }

    /// Creates an unknown field error.
    pub fn unknown_field(field: impl Into<String>) -> Self {
        FilterError::UnknownField {
            field: field.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        FilterError::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }
}
