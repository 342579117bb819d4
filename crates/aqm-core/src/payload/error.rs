use thiserror::Error;

/// Errors returned by `ByteCursor` reads.
///
/// # Examples
/// ```
/// use aqm_core::payload::error::CursorError;
///
/// let err = CursorError::OutOfBounds { offset: 3, needed: 2, remaining: 1 };
/// assert!(err.to_string().contains("out of bounds"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("read out of bounds at offset {offset}: need {needed} bytes, {remaining} remaining")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
}

/// Errors returned by payload decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error(
        "truncated payload: field `{field}` needs {width} byte(s) at offset {offset}, payload has {actual}"
    )]
    Truncated {
        field: &'static str,
        offset: usize,
        width: usize,
        actual: usize,
    },
    #[error("trailing bytes: expected {expected} bytes, got {actual}")]
    TrailingBytes { expected: usize, actual: usize },
}
