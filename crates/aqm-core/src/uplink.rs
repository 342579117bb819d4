//! Network-server codec envelopes.
//!
//! `UplinkOutput` mirrors the TTN v3 `decodeUplink` result
//! (`data`/`errors`/`warnings`), `StatesOutput` the ChirpStack `Decode`
//! result (`states`). Decode failures become entries in `errors`; nothing
//! here panics or returns `Err` for a bad payload.

use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::decoder::Decoder;
use crate::source::{JsonLinesSource, SourceError, UplinkSource};
use crate::{DecodeError, Reading};

/// Uplink as handed over by the network server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UplinkInput {
    #[serde(rename = "fPort")]
    pub f_port: u8,
    pub bytes: Vec<u8>,
}

/// TTN v3 style result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UplinkOutput {
    pub data: Option<Reading>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl UplinkOutput {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl From<Result<Reading, DecodeError>> for UplinkOutput {
    fn from(result: Result<Reading, DecodeError>) -> Self {
        match result {
            Ok(reading) => UplinkOutput {
                data: Some(reading),
                errors: Vec::new(),
                warnings: Vec::new(),
            },
            Err(err) => UplinkOutput {
                data: None,
                errors: vec![err.to_string()],
                warnings: Vec::new(),
            },
        }
    }
}

/// ChirpStack style result. `errors` is only emitted on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatesOutput {
    pub states: Option<Reading>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl From<UplinkOutput> for StatesOutput {
    fn from(output: UplinkOutput) -> Self {
        StatesOutput {
            states: output.data,
            errors: output.errors,
        }
    }
}

impl Decoder {
    pub fn decode_uplink(&self, input: &UplinkInput) -> UplinkOutput {
        self.decode(input.f_port, &input.bytes).into()
    }

    pub fn decode_states(&self, port: u8, payload: &[u8]) -> StatesOutput {
        UplinkOutput::from(self.decode(port, payload)).into()
    }

    /// Decode every uplink of `source` in order.
    ///
    /// Payload errors are kept per uplink; only source errors abort.
    pub fn decode_source<S: UplinkSource>(
        &self,
        mut source: S,
    ) -> Result<Vec<UplinkOutput>, SourceError> {
        let mut outputs = Vec::new();
        while let Some(input) = source.next_uplink()? {
            let output = self.decode_uplink(&input);
            if let Some(err) = output.errors.first() {
                warn!("uplink #{} (port {}): {err}", outputs.len() + 1, input.f_port);
            }
            outputs.push(output);
        }
        Ok(outputs)
    }

    /// Decode a JSON-lines uplink file.
    pub fn decode_file(&self, path: &Path) -> Result<Vec<UplinkOutput>, SourceError> {
        debug!("reading uplinks from {}", path.display());
        self.decode_source(JsonLinesSource::open(path)?)
    }
}

/// TTN v3 `decodeUplink` with default options.
///
/// # Examples
/// ```
/// use aqm_core::{UplinkInput, decode_uplink};
///
/// let output = decode_uplink(&UplinkInput { f_port: 1, bytes: vec![0x01, 0x3f] });
/// assert!(output.data.is_none());
/// assert!(output.errors[0].starts_with("truncated"));
/// assert!(output.warnings.is_empty());
/// ```
pub fn decode_uplink(input: &UplinkInput) -> UplinkOutput {
    Decoder::new().decode_uplink(input)
}

/// ChirpStack `Decode` with default options.
pub fn decode_states(port: u8, payload: &[u8]) -> StatesOutput {
    Decoder::new().decode_states(port, payload)
}
