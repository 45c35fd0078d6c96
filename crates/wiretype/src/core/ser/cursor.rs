// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read/write cursors for wire-format buffer manipulation.
//!

use super::{SerError, SerResult};

/// Generate write methods for primitive types (eliminates code duplication)
///
/// Each generated method:
/// 1. Checks buffer bounds (returns `SerError::WriteFailed` if overflow)
/// 2. Converts value to little-endian bytes via `to_le_bytes()`
/// 3. Copies bytes to buffer
/// 4. Advances offset
macro_rules! impl_write_le {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self, value: $type) -> SerResult<()> {
            if self.offset + $size > self.buffer.len() {
                return Err(SerError::WriteFailed {
                    offset: self.offset,
                    reason: "buffer too small".into(),
                });
            }
            let bytes = value.to_le_bytes();
            self.buffer[self.offset..self.offset + $size].copy_from_slice(&bytes);
            self.offset += $size;
            Ok(())
        }
    };
}

/// Generate read methods for primitive types (eliminates code duplication)
///
/// Each generated method:
/// 1. Checks buffer bounds (returns `SerError::ReadFailed` if overflow)
/// 2. Reads N bytes from buffer
/// 3. Converts bytes to value via `from_le_bytes()`
/// 4. Advances offset
macro_rules! impl_read_le {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> SerResult<$type> {
            if self.offset + $size > self.buffer.len() {
                return Err(SerError::ReadFailed {
                    offset: self.offset,
                    reason: "unexpected end of buffer".into(),
                });
            }
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(&self.buffer[self.offset..self.offset + $size]);
            self.offset += $size;
            Ok(<$type>::from_le_bytes(bytes))
        }
    };
}

/// Mutable cursor for writing (bounds-checked, zero-copy)
pub struct CursorMut<'a> {
    buffer: &'a mut [u8],
    offset: usize,
}

impl<'a> CursorMut<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    impl_write_le!(write_u8, u8, 1);
    impl_write_le!(write_u16_le, u16, 2);
    impl_write_le!(write_u32_le, u32, 4);
    impl_write_le!(write_u64_le, u64, 8);
    impl_write_le!(write_i8, i8, 1);
    impl_write_le!(write_i16_le, i16, 2);
    impl_write_le!(write_i32_le, i32, 4);
    impl_write_le!(write_i64_le, i64, 8);

    pub fn write_f32_le(&mut self, value: f32) -> SerResult<()> {
        self.write_u32_le(value.to_bits())
    }

    pub fn write_f64_le(&mut self, value: f64) -> SerResult<()> {
        self.write_u64_le(value.to_bits())
    }

    pub fn write_bool(&mut self, value: bool) -> SerResult<()> {
        self.write_u8(u8::from(value))
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> SerResult<()> {
        if self.offset + data.len() > self.buffer.len() {
            return Err(SerError::WriteFailed {
                offset: self.offset,
                reason: "buffer too small".into(),
            });
        }
        self.buffer[self.offset..self.offset + data.len()].copy_from_slice(data);
        self.offset += data.len();
        Ok(())
    }

    /// Write a length-prefixed byte block: u32-LE length + raw bytes.
    pub fn write_bytes_prefixed(&mut self, data: &[u8]) -> SerResult<()> {
        let len = u32::try_from(data.len()).map_err(|_| SerError::WriteFailed {
            offset: self.offset,
            reason: "block exceeds u32 length prefix".into(),
        })?;
        self.write_u32_le(len)?;
        self.write_bytes(data)
    }

    /// Write a string field: u32-LE length + UTF-8 bytes, no terminator.
    pub fn write_str(&mut self, value: &str) -> SerResult<()> {
        self.write_bytes_prefixed(value.as_bytes())
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }
}

/// Immutable cursor for reading (bounds-checked, zero-copy)
pub struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    impl_read_le!(read_u8, u8, 1);
    impl_read_le!(read_u16_le, u16, 2);
    impl_read_le!(read_u32_le, u32, 4);
    impl_read_le!(read_u64_le, u64, 8);
    impl_read_le!(read_i8, i8, 1);
    impl_read_le!(read_i16_le, i16, 2);
    impl_read_le!(read_i32_le, i32, 4);
    impl_read_le!(read_i64_le, i64, 8);

    pub fn read_f32_le(&mut self) -> SerResult<f32> {
        Ok(f32::from_bits(self.read_u32_le()?))
    }

    pub fn read_f64_le(&mut self) -> SerResult<f64> {
        Ok(f64::from_bits(self.read_u64_le()?))
    }

    pub fn read_bool(&mut self) -> SerResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_bytes(&mut self, len: usize) -> SerResult<&'a [u8]> {
        if self.offset + len > self.buffer.len() {
            return Err(SerError::ReadFailed {
                offset: self.offset,
                reason: "unexpected end of buffer".into(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Read a length-prefixed byte block: u32-LE length + raw bytes.
    pub fn read_bytes_prefixed(&mut self) -> SerResult<&'a [u8]> {
        let len = self.read_u32_le()? as usize;
        self.read_bytes(len)
    }

    /// Read a string field: u32-LE length + UTF-8 bytes.
    pub fn read_str(&mut self) -> SerResult<&'a str> {
        let bytes = self.read_bytes_prefixed()?;
        std::str::from_utf8(bytes).map_err(|_| SerError::InvalidData {
            reason: "string field is not valid UTF-8".into(),
        })
    }

    /// Skip a length-prefixed block, returning its total encoded length.
    pub fn skip_prefixed(&mut self) -> SerResult<usize> {
        let len = self.read_u32_le()? as usize;
        self.read_bytes(len)?;
        Ok(4 + len)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_U16: u16 = 0xCDEF;
    const TEST_U32: u32 = 0x1234_5678;
    const TEST_U64: u64 = 0x1122_3344_5566_7788;

    #[test]
    fn test_cursor_mut_write_overflow_reports_offset() {
        let mut buffer = [0u8; 2];
        let mut cursor = CursorMut::new(&mut buffer);
        cursor
            .write_u16_le(TEST_U16)
            .expect("Write u16 should succeed");

        let err = cursor.write_u8(0xFF).unwrap_err();
        match err {
            SerError::WriteFailed { offset, reason } => {
                assert_eq!(offset, 2);
                assert_eq!(reason, "buffer too small");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_cursor_read_overflow_reports_offset() {
        let buffer = [0u8; 1];
        let mut cursor = Cursor::new(&buffer);
        assert_eq!(cursor.read_u8().expect("Read u8 should succeed"), 0);

        let err = cursor.read_u8().unwrap_err();
        match err {
            SerError::ReadFailed { offset, reason } => {
                assert_eq!(offset, 1);
                assert_eq!(reason, "unexpected end of buffer");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_cursor_roundtrip_across_numeric_types() {
        let mut buffer = [0u8; 64];
        let mut writer = CursorMut::new(&mut buffer);
        writer.write_u8(0xAB).expect("Write u8 should succeed");
        writer
            .write_u16_le(TEST_U16)
            .expect("Write u16 should succeed");
        writer
            .write_u32_le(TEST_U32)
            .expect("Write u32 should succeed");
        writer
            .write_u64_le(TEST_U64)
            .expect("Write u64 should succeed");
        writer.write_i32_le(-42).expect("Write i32 should succeed");
        writer.write_f64_le(6.25).expect("Write f64 should succeed");
        writer.write_bool(true).expect("Write bool should succeed");
        let written = writer.offset();
        assert_eq!(written, 1 + 2 + 4 + 8 + 4 + 8 + 1);

        let mut reader = Cursor::new(&buffer);
        assert_eq!(reader.read_u8().expect("Read u8 should succeed"), 0xAB);
        assert_eq!(
            reader.read_u16_le().expect("Read u16 should succeed"),
            TEST_U16
        );
        assert_eq!(
            reader.read_u32_le().expect("Read u32 should succeed"),
            TEST_U32
        );
        assert_eq!(
            reader.read_u64_le().expect("Read u64 should succeed"),
            TEST_U64
        );
        assert_eq!(reader.read_i32_le().expect("Read i32 should succeed"), -42);
        assert!(
            (reader.read_f64_le().expect("Read f64 should succeed") - 6.25).abs() < f64::EPSILON
        );
        assert!(reader.read_bool().expect("Read bool should succeed"));
        assert_eq!(reader.remaining(), buffer.len() - written);
    }

    #[test]
    fn test_string_roundtrip_is_length_prefixed_without_terminator() {
        let mut buffer = [0u8; 32];
        let mut writer = CursorMut::new(&mut buffer);
        writer.write_str("tuner").expect("Write str should succeed");
        assert_eq!(writer.offset(), 4 + 5);
        assert_eq!(&buffer[0..4], &5u32.to_le_bytes());
        assert_eq!(&buffer[4..9], b"tuner");

        let mut reader = Cursor::new(&buffer);
        assert_eq!(reader.read_str().expect("Read str should succeed"), "tuner");
        assert_eq!(reader.offset(), 9);
    }

    #[test]
    fn test_read_str_rejects_invalid_utf8() {
        let mut buffer = [0u8; 8];
        {
            let mut writer = CursorMut::new(&mut buffer);
            writer
                .write_bytes_prefixed(&[0xFF, 0xFE])
                .expect("Write bytes should succeed");
        }
        let mut reader = Cursor::new(&buffer);
        let err = reader.read_str().unwrap_err();
        match err {
            SerError::InvalidData { reason } => {
                assert_eq!(reason, "string field is not valid UTF-8");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_skip_prefixed_reports_total_encoded_length() {
        let mut buffer = [0u8; 16];
        {
            let mut writer = CursorMut::new(&mut buffer);
            writer
                .write_bytes_prefixed(&[1, 2, 3])
                .expect("Write bytes should succeed");
            writer.write_u8(0x7F).expect("Write u8 should succeed");
        }
        let mut reader = Cursor::new(&buffer);
        assert_eq!(
            reader.skip_prefixed().expect("Skip should succeed"),
            4 + 3
        );
        assert_eq!(reader.read_u8().expect("Read u8 should succeed"), 0x7F);
    }

    #[test]
    fn test_empty_string_roundtrip() {
        let mut buffer = [0u8; 4];
        {
            let mut writer = CursorMut::new(&mut buffer);
            writer.write_str("").expect("Write str should succeed");
        }
        let mut reader = Cursor::new(&buffer);
        assert_eq!(reader.read_str().expect("Read str should succeed"), "");
        assert!(reader.is_eof());
    }
}
