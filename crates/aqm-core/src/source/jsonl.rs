use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;

use super::{SourceError, UplinkSource};
use crate::uplink::UplinkInput;

/// One uplink per line, e.g. `{"fPort": 1, "hex": "013f32ff..."}` or
/// `{"fPort": 1, "bytes": [1, 63, ...]}`. Blank lines are skipped.
pub struct JsonLinesSource<R> {
    reader: R,
    line: usize,
    buf: String,
}

#[derive(Deserialize)]
struct UplinkLine {
    #[serde(rename = "fPort", alias = "f_port", alias = "port")]
    f_port: u8,
    #[serde(default)]
    bytes: Option<Vec<u8>>,
    #[serde(default)]
    hex: Option<String>,
}

impl JsonLinesSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> UplinkSource for JsonLinesSource<R> {
    fn next_uplink(&mut self) -> Result<Option<UplinkInput>, SourceError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }
            return parse_line(text, self.line).map(Some);
        }
    }
}

fn parse_line(text: &str, line: usize) -> Result<UplinkInput, SourceError> {
    let parsed: UplinkLine = serde_json::from_str(text).map_err(|err| SourceError::Json {
        line,
        message: err.to_string(),
    })?;

    let bytes = match (parsed.bytes, parsed.hex) {
        (Some(bytes), None) => bytes,
        (None, Some(hex)) => hex::decode(hex.trim()).map_err(|err| SourceError::Hex {
            line,
            message: err.to_string(),
        })?,
        (Some(_), Some(_)) => return Err(SourceError::ConflictingPayload { line }),
        (None, None) => return Err(SourceError::MissingPayload { line }),
    };

    Ok(UplinkInput {
        f_port: parsed.f_port,
        bytes,
    })
}
