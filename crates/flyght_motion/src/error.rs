//! Motion error types

use std::path::PathBuf;

use flyght_animation::AnimationError;
use flyght_core::CoreError;
use thiserror::Error;

/// Errors raised while configuring reactors, scenes and transitions
#[derive(Error, Debug)]
pub enum MotionError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Animation(#[from] AnimationError),

    /// Config file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is malformed or holds out-of-range values
    #[error("Invalid config: {0}")]
    Config(String),
}

/// Result type for motion operations
pub type Result<T> = std::result::Result<T, MotionError>;
