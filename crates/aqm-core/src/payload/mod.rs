//! Air-quality frame decoding.
//!
//! The frame is a fixed 11-byte little-endian record:
//! header, battery voltage, temperature, humidity, pressure, TVOC and CO2.
//! Every measurement except the header has an all-ones raw pattern meaning
//! "no reading", decoded to `None` before any scaling is applied.
//!
//! Structure follows the usual split:
//! - `layout`: field offsets, widths, sentinels and scales (source of truth)
//! - `reader`: `ByteCursor`, bounds-checked sequential reads
//! - `parser`: domain-level decoding into a `Reading`
//! - `error`: cursor and decode errors
//!
//! The parser is pure; a cursor lives for exactly one call.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::{CursorError, DecodeError};
pub use parser::{DecodeOptions, parse_reading};
pub use reader::ByteCursor;
