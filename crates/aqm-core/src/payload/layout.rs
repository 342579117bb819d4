use serde::Serialize;

/// Bytes consumed by one air-quality frame.
pub const PAYLOAD_LEN: usize = 11;

/// "No reading" marker for 8-bit fields.
pub const U8_SENTINEL: u8 = 0xFF;
/// "No reading" marker for 16-bit fields, compared against the raw pattern.
pub const U16_SENTINEL: u16 = 0xFFFF;

pub const BATTERY_VOLTAGE_DIVISOR: u16 = 10;
pub const TEMPERATURE_DIVISOR: u16 = 10;
pub const HUMIDITY_DIVISOR: u16 = 2;
pub const PRESSURE_MULTIPLIER: u16 = 2;

/// Transformation applied to a raw value that is not a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "factor", rename_all = "snake_case")]
pub enum Scale {
    Identity,
    Divide(u16),
    Multiply(u16),
}

/// One entry of the frame layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
    pub signed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentinel: Option<u16>,
    pub scale: Scale,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
}

impl FieldSpec {
    /// Offset one past the last byte of the field.
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }
}

pub const HEADER: FieldSpec = FieldSpec {
    name: "header",
    offset: 0,
    width: 1,
    signed: false,
    sentinel: None,
    scale: Scale::Identity,
    unit: None,
};

pub const BATTERY_VOLTAGE: FieldSpec = FieldSpec {
    name: "battery_voltage",
    offset: 1,
    width: 1,
    signed: false,
    sentinel: Some(U8_SENTINEL as u16),
    scale: Scale::Divide(BATTERY_VOLTAGE_DIVISOR),
    unit: Some("V"),
};

pub const TEMPERATURE: FieldSpec = FieldSpec {
    name: "temperature",
    offset: 2,
    width: 2,
    signed: true,
    sentinel: Some(U16_SENTINEL),
    scale: Scale::Divide(TEMPERATURE_DIVISOR),
    unit: Some("°C"),
};

pub const HUMIDITY: FieldSpec = FieldSpec {
    name: "humidity",
    offset: 4,
    width: 1,
    signed: false,
    sentinel: Some(U8_SENTINEL as u16),
    scale: Scale::Divide(HUMIDITY_DIVISOR),
    unit: Some("%"),
};

pub const PRESSURE: FieldSpec = FieldSpec {
    name: "pressure",
    offset: 5,
    width: 2,
    signed: false,
    sentinel: Some(U16_SENTINEL),
    scale: Scale::Multiply(PRESSURE_MULTIPLIER),
    unit: Some("hPa"),
};

pub const TVOC: FieldSpec = FieldSpec {
    name: "tvoc",
    offset: 7,
    width: 2,
    signed: false,
    sentinel: Some(U16_SENTINEL),
    scale: Scale::Identity,
    unit: Some("ppb"),
};

pub const CO2: FieldSpec = FieldSpec {
    name: "co2",
    offset: 9,
    width: 2,
    signed: false,
    sentinel: Some(U16_SENTINEL),
    scale: Scale::Identity,
    unit: Some("ppm"),
};

/// Fields in wire order.
pub const FIELDS: [FieldSpec; 7] = [
    HEADER,
    BATTERY_VOLTAGE,
    TEMPERATURE,
    HUMIDITY,
    PRESSURE,
    TVOC,
    CO2,
];
