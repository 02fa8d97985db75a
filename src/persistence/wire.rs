//! Primitive record encodings
//!
//! Little-endian fixed-width integers and floats, one-byte booleans, and
//! strings prefixed with a 7-bit variable-length byte count. This matches
//! the layout of records written by every earlier release.

use crate::error::{Result, StoreError};

/// Append-only byte sink for a record
#[derive(Debug, Default)]
pub struct RecordWriter {
    buf: Vec<u8>,
}

impl RecordWriter {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Unsigned values are stored as int32; anything above `i32::MAX` saturates
    pub fn write_u32(&mut self, value: u32) {
        self.write_i32(i32::try_from(value).unwrap_or(i32::MAX));
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    /// Element count prefix for a sequence
    pub fn write_len(&mut self, len: usize) {
        self.write_i32(i32::try_from(len).unwrap_or(i32::MAX));
    }

    pub fn write_str(&mut self, value: &str) {
        let mut len = value.len() as u32;
        while len >= 0x80 {
            self.buf.push((len as u8 & 0x7F) | 0x80);
            len >>= 7;
        }
        self.buf.push(len as u8);
        self.buf.extend_from_slice(value.as_bytes());
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over a record; every read fails with `MalformedRecord` on truncation
#[derive(Debug)]
pub struct RecordReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> RecordReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.bytes.len());
        match end {
            Some(end) => {
                let bytes: &'a [u8] = self.bytes;
                let slice = &bytes[self.pos..end];
                self.pos = end;
                Ok(slice)
            }
            None => Err(StoreError::malformed(format!(
                "truncated reading {what} at byte {} ({} left, {n} needed)",
                self.pos,
                self.remaining()
            ))),
        }
    }

    fn take_array<const N: usize>(&mut self, what: &str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    pub fn read_i32(&mut self, what: &str) -> Result<i32> {
        Ok(i32::from_le_bytes(self.take_array(what)?))
    }

    pub fn read_f32(&mut self, what: &str) -> Result<f32> {
        Ok(f32::from_le_bytes(self.take_array(what)?))
    }

    pub fn read_bool(&mut self, what: &str) -> Result<bool> {
        let [byte] = self.take_array::<1>(what)?;
        Ok(byte != 0)
    }

    /// Sequence length; negative counts are rejected
    pub fn read_len(&mut self, what: &str) -> Result<usize> {
        let raw = self.read_i32(what)?;
        usize::try_from(raw)
            .map_err(|_| StoreError::malformed(format!("negative {what}: {raw}")))
    }

    pub fn read_string(&mut self, what: &str) -> Result<String> {
        let len = self.read_str_len(what)?;
        let bytes = self.take(len, what)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| StoreError::malformed(format!("{what} is not UTF-8: {e}")))
    }

    fn read_str_len(&mut self, what: &str) -> Result<usize> {
        let mut len: u32 = 0;
        for shift in (0..35).step_by(7) {
            let [byte] = self.take_array::<1>(what)?;
            let chunk = u32::from(byte & 0x7F);
            if shift == 28 && chunk > 0x0F {
                break;
            }
            len |= chunk << shift;
            if byte & 0x80 == 0 {
                return Ok(len as usize);
            }
        }
        Err(StoreError::malformed(format!("bad length prefix for {what}")))
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}
