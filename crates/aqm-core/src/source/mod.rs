//! Uplink sources.
//!
//! Sources own all file access and hand `UplinkInput` values to the decoder,
//! which never touches I/O itself.

mod jsonl;

pub use jsonl::JsonLinesSource;

use thiserror::Error;

use crate::uplink::UplinkInput;

pub trait UplinkSource {
    fn next_uplink(&mut self) -> Result<Option<UplinkInput>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid uplink JSON on line {line}: {message}")]
    Json { line: usize, message: String },
    #[error("invalid hex payload on line {line}: {message}")]
    Hex { line: usize, message: String },
    #[error("uplink on line {line} has neither `bytes` nor `hex`")]
    MissingPayload { line: usize },
    #[error("uplink on line {line} has both `bytes` and `hex`")]
    ConflictingPayload { line: usize },
}
