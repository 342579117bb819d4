use log::debug;

use super::error::{CursorError, DecodeError};
use super::layout::{self, FieldSpec};
use super::reader::ByteCursor;
use crate::Reading;

/// Decoding switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject payloads longer than one frame instead of ignoring the tail.
    pub strict_length: bool,
}

pub fn parse_reading(payload: &[u8], options: DecodeOptions) -> Result<Reading, DecodeError> {
    if options.strict_length && payload.len() > layout::PAYLOAD_LEN {
        return Err(DecodeError::TrailingBytes {
            expected: layout::PAYLOAD_LEN,
            actual: payload.len(),
        });
    }

    let mut cursor = ByteCursor::new(payload);

    let header = read_field(&mut cursor, &layout::HEADER, ByteCursor::read_u8)?;
    let battery_voltage = read_field(&mut cursor, &layout::BATTERY_VOLTAGE, |c| {
        c.read_optional_u8(layout::U8_SENTINEL)
    })?;
    let temperature = read_field(&mut cursor, &layout::TEMPERATURE, |c| {
        c.read_optional_i16_le(layout::U16_SENTINEL)
    })?;
    let humidity = read_field(&mut cursor, &layout::HUMIDITY, |c| {
        c.read_optional_u8(layout::U8_SENTINEL)
    })?;
    let pressure = read_field(&mut cursor, &layout::PRESSURE, |c| {
        c.read_optional_u16_le(layout::U16_SENTINEL)
    })?;
    let tvoc = read_field(&mut cursor, &layout::TVOC, |c| {
        c.read_optional_u16_le(layout::U16_SENTINEL)
    })?;
    let co2 = read_field(&mut cursor, &layout::CO2, |c| {
        c.read_optional_u16_le(layout::U16_SENTINEL)
    })?;

    if !cursor.is_empty() {
        debug!("ignoring {} trailing byte(s)", cursor.remaining());
    }

    Ok(Reading {
        header,
        battery_voltage: battery_voltage.map(|raw| divide(raw, layout::BATTERY_VOLTAGE_DIVISOR)),
        temperature: temperature.map(|raw| divide(raw, layout::TEMPERATURE_DIVISOR)),
        humidity: humidity.map(|raw| divide(raw, layout::HUMIDITY_DIVISOR)),
        pressure: pressure.map(|raw| u32::from(raw) * u32::from(layout::PRESSURE_MULTIPLIER)),
        tvoc,
        co2,
    })
}

fn read_field<'a, T>(
    cursor: &mut ByteCursor<'a>,
    field: &FieldSpec,
    read: impl FnOnce(&mut ByteCursor<'a>) -> Result<T, CursorError>,
) -> Result<T, DecodeError> {
    debug_assert_eq!(cursor.position(), field.offset, "{} out of place", field.name);
    read(cursor).map_err(|err| match err {
        CursorError::OutOfBounds {
            offset, remaining, ..
        } => DecodeError::Truncated {
            field: field.name,
            offset,
            width: field.width,
            actual: offset + remaining,
        },
    })
}

fn divide(raw: impl Into<f64>, divisor: u16) -> f64 {
    raw.into() / f64::from(divisor)
}
