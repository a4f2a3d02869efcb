//! Errors and error specific types for universal use

/// Custom Result
/// A custom datatype that wraps the error variant <E> into a report, allowing
/// error_stack::Report<E> specific extendability
///
/// Effectively, equivalent to `Result<T, error_stack::Report<E>>`
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Parsing Errors
#[derive(Debug, thiserror::Error)]
pub enum ParsingError {
    /// Failed to parse struct
    #[error("Failed to parse struct: {0}")]
    StructParseFailure(&'static str),
    /// Failed to parse email
    #[error("Failed to parse email")]
    EmailParsingError,
}

/// Validation errors.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ValidationError {
    /// An invalid input was provided.
    #[error("{message}")]
    InvalidValue { message: String },
}
