//! Animation error types

use thiserror::Error;

/// Configuration errors raised while building tweens and timelines.
///
/// These surface when an entry is added, never during playback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Easing name that does not name a supported curve
    #[error("Unknown easing: {0}")]
    UnknownEasing(String),

    /// Position token that could not be parsed
    #[error("Malformed position token: {0:?}")]
    MalformedPosition(String),

    /// Negative or non-finite timing value
    #[error("Invalid {field}: {value}")]
    InvalidTiming { field: &'static str, value: f32 },

    /// Immediate sets cannot have a duration
    #[error("Set entries must have zero duration, got {0}")]
    SetWithDuration(f32),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
