//! Decoder for the air-quality monitor LoRaWAN uplink.
//!
//! The monitor reports one fixed 11-byte frame per uplink. This crate turns
//! `(port, bytes)` into a [`Reading`]: every field is read in wire order by a
//! bounds-checked [`ByteCursor`], raw all-ones values become `None`, and the
//! remaining values are scaled to physical units.
//!
//! Layers:
//! - `payload`: layout / reader / parser / error for the frame itself
//! - `decoder`: the [`Decoder`] entry point and port routing
//! - `uplink`: TTN v3 and ChirpStack result envelopes
//! - `source`: I/O for batches of uplinks (JSON lines)
//!
//! Invariants:
//! - Decoding is pure; each call owns its cursor, so calls may run in parallel.
//! - A short payload is an error value, never a panic or a partial reading.
//! - Output is deterministic for a given payload.
//!
//! # Examples
//! ```
//! use aqm_core::decode;
//!
//! let bytes = hex::decode("013f32ff6feb010000ffff")?;
//! let reading = decode(1, &bytes)?;
//! assert_eq!(reading.header, 1);
//! assert_eq!(reading.humidity, Some(55.5));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod decoder;
pub mod payload;
pub mod source;
pub mod uplink;

pub use decoder::{Decoder, PayloadKind, decode};
pub use payload::layout::{FIELDS, FieldSpec, PAYLOAD_LEN, Scale};
pub use payload::{ByteCursor, CursorError, DecodeError, DecodeOptions};
pub use source::{JsonLinesSource, SourceError, UplinkSource};
pub use uplink::{StatesOutput, UplinkInput, UplinkOutput, decode_states, decode_uplink};

/// One decoded measurement set.
///
/// `None` means the device reported "no reading" for that sensor. Fields are
/// serialized as `null` rather than omitted so the key set is stable.
///
/// # Examples
/// ```
/// use aqm_core::Reading;
///
/// let reading = Reading {
///     header: 1,
///     battery_voltage: Some(3.1),
///     temperature: Some(21.5),
///     humidity: None,
///     pressure: Some(1012),
///     tvoc: Some(120),
///     co2: Some(650),
/// };
/// let json = serde_json::to_value(&reading)?;
/// assert!(json["humidity"].is_null());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Frame header byte, passed through unchanged.
    pub header: u8,
    /// Battery voltage in volts (raw / 10).
    pub battery_voltage: Option<f64>,
    /// Temperature in °C (signed raw / 10).
    pub temperature: Option<f64>,
    /// Relative humidity in % (raw / 2).
    pub humidity: Option<f64>,
    /// Barometric pressure in hPa (raw * 2).
    pub pressure: Option<u32>,
    /// Total volatile organic compounds in ppb.
    pub tvoc: Option<u16>,
    /// CO2 concentration in ppm.
    pub co2: Option<u16>,
}
