//! Little-endian stream primitives shared by every codec layer
//!
//! The whole protocol is little-endian with no per-message negotiation.
//! [`WireReader`] counts the bytes it has consumed so truncation errors can
//! report the stream offset alongside the field that failed.

use std::io::{self, Read, Write};

use crate::error::{Result, WireError};

/// Longest string the 1-byte length prefix can carry
pub const MAX_STRING_LEN: usize = u8::MAX as usize;

/// Largest element count the 2-byte list prefix can carry
pub const MAX_LIST_LEN: usize = u16::MAX as usize;

/// A closed enumeration carried as a single ordinal byte on the wire.
///
/// Decoding validates membership; a non-member ordinal surfaces as
/// [`WireError::EnumOutOfRange`] naming the enumeration.
pub trait WireEnum: Sized + Copy {
    /// Name used in out-of-range diagnostics
    const WIRE_NAME: &'static str;

    fn from_u8(value: u8) -> Option<Self>;
    fn to_u8(self) -> u8;
}

/// Counting reader for decoding protocol fields
pub struct WireReader<R> {
    inner: R,
    position: u64,
}

impl<R: Read> WireReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Bytes consumed from the stream so far
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self, buf: &mut [u8], field: &'static str) -> Result<()> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.position += buf.len() as u64;
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Err(WireError::Truncated {
                field,
                offset: self.position,
            }),
            Err(err) => Err(WireError::Io(err)),
        }
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf, field)?;
        Ok(buf[0])
    }

    /// Reads one byte, returning `None` on a clean end-of-stream
    pub fn read_u8_or_eof(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.position += 1;
                    return Ok(Some(buf[0]));
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(WireError::Io(err)),
            }
        }
    }

    pub fn read_bool(&mut self, field: &'static str) -> Result<bool> {
        Ok(self.read_u8(field)? != 0)
    }

    pub fn read_i8(&mut self, field: &'static str) -> Result<i8> {
        Ok(self.read_u8(field)? as i8)
    }

    pub fn read_u16(&mut self, field: &'static str) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.fill(&mut buf, field)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub fn read_i16(&mut self, field: &'static str) -> Result<i16> {
        let mut buf = [0u8; 2];
        self.fill(&mut buf, field)?;
        Ok(i16::from_le_bytes(buf))
    }

    pub fn read_u32(&mut self, field: &'static str) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf, field)?;
        Ok(u32::from_le_bytes(buf))
    }

    pub fn read_i32(&mut self, field: &'static str) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf, field)?;
        Ok(i32::from_le_bytes(buf))
    }

    pub fn read_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.fill(&mut buf, field)?;
        Ok(buf)
    }

    pub fn read_bytes(&mut self, len: usize, field: &'static str) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.fill(&mut buf, field)?;
        Ok(buf)
    }

    /// Reads a 1-byte length prefix followed by that many bytes of UTF-8
    pub fn read_string(&mut self, field: &'static str) -> Result<String> {
        let len = self.read_u8(field)?;
        let offset = self.position;
        let bytes = self.read_bytes(len as usize, field)?;
        String::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8 { field, offset })
    }

    /// Reads a validated enumeration ordinal
    pub fn read_enum<E: WireEnum>(&mut self, field: &'static str) -> Result<E> {
        let value = self.read_u8(field)?;
        E::from_u8(value).ok_or(WireError::EnumOutOfRange {
            name: E::WIRE_NAME,
            value,
        })
    }

    /// Reads a 2-byte count prefix, then exactly that many elements
    pub fn read_list<T>(
        &mut self,
        field: &'static str,
        mut element: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        let count = self.read_u16(field)?;
        let mut items = Vec::with_capacity(count as usize);
        for _ in 0..count {
            items.push(element(self)?);
        }
        Ok(items)
    }
}

/// Writer for encoding protocol fields
pub struct WireWriter<W> {
    inner: W,
}

impl<W: Write> WireWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.inner.write_all(&[value])?;
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(value as u8)
    }

    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_u8(value as u8)
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.inner.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.inner.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.inner.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.inner.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    /// Writes a 1-byte length prefix and the raw bytes.
    ///
    /// Strings longer than [`MAX_STRING_LEN`] are rejected outright rather
    /// than silently narrowed into the prefix.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        if value.len() > MAX_STRING_LEN {
            return Err(WireError::StringTooLong { len: value.len() });
        }
        self.write_u8(value.len() as u8)?;
        self.inner.write_all(value.as_bytes())?;
        Ok(())
    }

    pub fn write_enum<E: WireEnum>(&mut self, value: E) -> Result<()> {
        self.write_u8(value.to_u8())
    }

    /// Writes a 2-byte count prefix, then each element in order
    pub fn write_list<T>(
        &mut self,
        items: &[T],
        mut element: impl FnMut(&mut Self, &T) -> Result<()>,
    ) -> Result<()> {
        if items.len() > MAX_LIST_LEN {
            return Err(WireError::ListTooLong { len: items.len() });
        }
        self.write_u16(items.len() as u16)?;
        for item in items {
            element(self, item)?;
        }
        Ok(())
    }
}
