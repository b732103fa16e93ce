//! Core error types

use thiserror::Error;

/// Errors raised while describing or loading a page
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A property name that the motion system cannot animate
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// A page document that could not be parsed
    #[error("Invalid page document: {0}")]
    InvalidDocument(String),

    /// Two elements declared with the same id
    #[error("Duplicate element id: {0}")]
    DuplicateId(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
