//! Errors raised by frame operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("unable to set value at index {index} beyond current length {length}")]
    IndexOutOfRange { index: usize, length: usize },
    #[error("invalid frame document: {0}")]
    InvalidDto(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
