use log::debug;

use crate::Reading;
use crate::payload::{DecodeError, DecodeOptions, parse_reading};

/// Frame layout carried on a given LoRaWAN port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    AirQuality,
}

impl PayloadKind {
    /// The monitor sends the same frame on every port.
    pub fn for_port(_port: u8) -> Self {
        PayloadKind::AirQuality
    }
}

/// Stateless uplink decoder.
///
/// Holds only its options, so one value can be shared freely between
/// threads.
///
/// # Examples
/// ```
/// use aqm_core::{DecodeOptions, Decoder};
///
/// let decoder = Decoder::with_options(DecodeOptions { strict_length: true });
/// let bytes = [0x01, 0x3f, 0x32, 0xff, 0x6f, 0xeb, 0x01, 0x00, 0x00, 0xff, 0xff];
/// let reading = decoder.decode(1, &bytes)?;
/// assert_eq!(reading.pressure, Some(982));
/// assert_eq!(reading.co2, None);
/// # Ok::<(), aqm_core::DecodeError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    pub fn decode(&self, port: u8, payload: &[u8]) -> Result<Reading, DecodeError> {
        debug!("decoding uplink: port={port} len={}", payload.len());
        match PayloadKind::for_port(port) {
            PayloadKind::AirQuality => parse_reading(payload, self.options),
        }
    }
}

/// Decode with default options.
///
/// # Examples
/// ```
/// let bytes = [0x01, 0x3f, 0x32, 0xff, 0x6f, 0xeb, 0x01, 0x00, 0x00, 0xff, 0xff];
/// let reading = aqm_core::decode(1, &bytes)?;
/// assert_eq!(reading.temperature, Some(-20.6));
/// # Ok::<(), aqm_core::DecodeError>(())
/// ```
pub fn decode(port: u8, payload: &[u8]) -> Result<Reading, DecodeError> {
    Decoder::new().decode(port, payload)
}
