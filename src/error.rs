use std::ffi::NulError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShoreError {
    #[error("Engine initialization failed: {0}")]
    Initialization(String),
    #[error("Unsupported dimensionality: expected {expected}, got shape {shape:?}")]
    UnsupportedDimensionality {
        expected: &'static str,
        shape: Vec<usize>,
    },
    #[error("Unsupported colorspace: {0}")]
    UnsupportedColorSpace(String),
    #[error("Unsupported image layout: {0}")]
    UnsupportedLayout(String),
    #[error("Failed to retrieve content of image.")]
    ProcessingFailed,
    #[error("Index {index} out of range for {count} item(s)")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("Entry {index} of {count} could not be read from the engine")]
    UnreadableEntry { index: usize, count: usize },
    #[error("Key not found: {0}")]
    KeyNotFound(String),
    #[error("Invalid string: {0}")]
    InvalidString(String),
}

impl From<NulError> for ShoreError {
    fn from(err: NulError) -> Self {
        ShoreError::InvalidString(err.to_string())
    }
}

pub type ShoreResult<R> = Result<R, ShoreError>;
