use super::error::CursorError;

/// Forward-only little-endian reader over a borrowed payload.
///
/// A failed read leaves the position untouched.
#[derive(Debug)]
pub struct ByteCursor<'a> {
    payload: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            payload,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.payload.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        self.take::<1>().map(u8::from_le_bytes)
    }

    pub fn read_i8(&mut self) -> Result<i8, CursorError> {
        self.take::<1>().map(i8::from_le_bytes)
    }

    pub fn read_u16_le(&mut self) -> Result<u16, CursorError> {
        self.take::<2>().map(u16::from_le_bytes)
    }

    pub fn read_i16_le(&mut self) -> Result<i16, CursorError> {
        self.take::<2>().map(i16::from_le_bytes)
    }

    pub fn read_u32_le(&mut self) -> Result<u32, CursorError> {
        self.take::<4>().map(u32::from_le_bytes)
    }

    pub fn read_i32_le(&mut self) -> Result<i32, CursorError> {
        self.take::<4>().map(i32::from_le_bytes)
    }

    pub fn read_optional_u8(&mut self, sentinel: u8) -> Result<Option<u8>, CursorError> {
        let value = self.read_u8()?;
        Ok(unless_sentinel(value, sentinel))
    }

    pub fn read_optional_u16_le(&mut self, sentinel: u16) -> Result<Option<u16>, CursorError> {
        let value = self.read_u16_le()?;
        Ok(unless_sentinel(value, sentinel))
    }

    /// Signed read whose sentinel is matched on the raw unsigned pattern, so
    /// only that exact pattern maps to `None`.
    pub fn read_optional_i16_le(&mut self, raw_sentinel: u16) -> Result<Option<i16>, CursorError> {
        let bytes = self.take::<2>()?;
        if u16::from_le_bytes(bytes) == raw_sentinel {
            return Ok(None);
        }
        Ok(Some(i16::from_le_bytes(bytes)))
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], CursorError> {
        if self.remaining() < N {
            return Err(CursorError::OutOfBounds {
                offset: self.position,
                needed: N,
                remaining: self.remaining(),
            });
        }
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.payload[self.position..self.position + N]);
        self.position += N;
        Ok(bytes)
    }
}

fn unless_sentinel<T: PartialEq>(value: T, sentinel: T) -> Option<T> {
    if value == sentinel { None } else { Some(value) }
}
