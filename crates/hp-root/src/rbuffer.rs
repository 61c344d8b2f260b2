//! Cursor over ROOT's big-endian serialization.

use crate::error::{Result, RootError};

/// Bit ROOT sets on the leading u32 of a streamed object when a byte count follows.
const BYTE_COUNT_MASK: u32 = 0x4000_0000;

/// TObject `fBits` flag: a 2-byte process id follows the header.
const IS_REFERENCED: u32 = 0x0000_0010;

/// Version and extent of a streamed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamerHeader {
    /// Class version.
    pub version: u16,
    /// Absolute offset one past the object, when a byte count was written.
    pub end: Option<usize>,
}

/// Big-endian reader over a borrowed byte slice.
pub struct RBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> RBuffer<'a> {
    /// Reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Move the cursor to an absolute offset.
    pub fn set_pos(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(RootError::BufferUnderflow {
                offset: self.pos,
                need: pos.saturating_sub(self.pos),
                have: self.remaining(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Advance by `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Borrow the next `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read a byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a signed byte.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian u16.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian i16.
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian u32.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian i32.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian u64.
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian f32.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian f64.
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(self.read_array()?))
    }

    /// Read a seek pointer: 64-bit when `large`, 32-bit otherwise.
    pub fn read_seek(&mut self, large: bool) -> Result<u64> {
        if large { self.read_u64() } else { Ok(u64::from(self.read_u32()?)) }
    }

    /// Read a `TString`: one length byte, or `255` followed by a u32 length.
    pub fn read_string(&mut self) -> Result<String> {
        let short = self.read_u8()?;
        let len = if short == 255 { self.read_u32()? as usize } else { usize::from(short) };
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read the version header of a streamed object.
    ///
    /// Modern writers prefix objects with `byte_count | 0x4000_0000`; the byte
    /// count covers everything after that u32, version included. Old writers
    /// emit the bare u16 version.
    pub fn read_version(&mut self) -> Result<StreamerHeader> {
        let start = self.pos;
        let raw = self.read_u32()?;
        if raw & BYTE_COUNT_MASK != 0 {
            let count = (raw & !BYTE_COUNT_MASK) as usize;
            let version = self.read_u16()?;
            Ok(StreamerHeader { version, end: Some(start + 4 + count) })
        } else {
            self.pos = start;
            let version = self.read_u16()?;
            Ok(StreamerHeader { version, end: None })
        }
    }

    /// Jump to the end recorded in `header`, if any was recorded and lies ahead.
    pub fn seek_end(&mut self, header: StreamerHeader) -> Result<()> {
        match header.end {
            Some(end) if end >= self.pos => self.set_pos(end),
            Some(end) => Err(RootError::Deserialization(format!(
                "object overran its byte count (end {end}, cursor {})",
                self.pos
            ))),
            None => Ok(()),
        }
    }

    /// Skip a whole streamed object using its byte count.
    pub fn skip_object(&mut self) -> Result<()> {
        let header = self.read_version()?;
        if header.end.is_none() {
            return Err(RootError::Deserialization(format!(
                "cannot skip object without byte count at offset {}",
                self.pos
            )));
        }
        self.seek_end(header)
    }

    /// Read a `TObject` header, returning `(unique_id, bits)`.
    pub fn read_tobject(&mut self) -> Result<(u32, u32)> {
        let _version = self.read_u16()?;
        let unique_id = self.read_u32()?;
        let bits = self.read_u32()?;
        if bits & IS_REFERENCED != 0 {
            self.skip(2)?;
        }
        Ok((unique_id, bits))
    }

    /// Read a `TNamed`, returning `(name, title)`.
    pub fn read_tnamed(&mut self) -> Result<(String, String)> {
        let header = self.read_version()?;
        self.read_tobject()?;
        let name = self.read_string()?;
        let title = self.read_string()?;
        self.seek_end(header)?;
        Ok((name, title))
    }

    /// Read `n` big-endian f64 values.
    pub fn read_f64_vec(&mut self, n: usize) -> Result<Vec<f64>> {
        self.ensure(n.saturating_mul(8))?;
        (0..n).map(|_| self.read_f64()).collect()
    }

    /// Read a `TArrayD` (`i32` length, then values).
    pub fn read_tarray_d(&mut self) -> Result<Vec<f64>> {
        let n = self.read_len()?;
        self.read_f64_vec(n)
    }

    /// Read a non-negative i32 length prefix.
    pub fn read_len(&mut self) -> Result<usize> {
        let n = self.read_i32()?;
        usize::try_from(n).map_err(|_| {
            RootError::Deserialization(format!("negative array length {n} at offset {}", self.pos))
        })
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if n > self.remaining() {
            return Err(RootError::BufferUnderflow {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_primitives() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x40, 0x09, 0x21, 0xfb, 0x54, 0x44, 0x2d, 0x18];
        let mut r = RBuffer::new(&data);
        assert_eq!(r.read_u32().unwrap(), 0x0102_0304);
        assert!((r.read_f64().unwrap() - std::f64::consts::PI).abs() < 1e-15);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn short_and_long_strings() {
        let mut data = vec![3, b'a', b'b', b'c', 255];
        data.extend_from_slice(&300u32.to_be_bytes());
        data.extend(std::iter::repeat_n(b'x', 300));
        let mut r = RBuffer::new(&data);
        assert_eq!(r.read_string().unwrap(), "abc");
        assert_eq!(r.read_string().unwrap().len(), 300);
    }

    #[test]
    fn version_with_byte_count_reports_end() {
        let mut data = Vec::new();
        data.extend_from_slice(&(BYTE_COUNT_MASK | 16).to_be_bytes());
        data.extend_from_slice(&3u16.to_be_bytes());
        data.extend_from_slice(&[0u8; 20]);
        let mut r = RBuffer::new(&data);
        let h = r.read_version().unwrap();
        assert_eq!(h, StreamerHeader { version: 3, end: Some(20) });
        r.seek_end(h).unwrap();
        assert_eq!(r.pos(), 20);
    }

    #[test]
    fn version_without_byte_count() {
        let data = [0x00, 0x05, 0x00, 0x00];
        let mut r = RBuffer::new(&data);
        let h = r.read_version().unwrap();
        assert_eq!(h, StreamerHeader { version: 5, end: None });
        assert_eq!(r.pos(), 2);
    }

    #[test]
    fn underflow_is_an_error() {
        let data = [0u8; 3];
        let mut r = RBuffer::new(&data);
        assert!(matches!(
            r.read_u32(),
            Err(RootError::BufferUnderflow { offset: 0, need: 4, have: 3 })
        ));
    }
}
