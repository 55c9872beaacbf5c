//! Forward-only primitive decoder
//!
//! The songs.db layout is tag-free, so every value is read positionally:
//! - varUint: 7 data bits per byte, high bit set means more bytes follow
//! - string: varUint byte length + raw bytes (UTF-8)
//! - i32 / i64 / f64: fixed width, little-endian
//! - bool: one byte, non-zero is true
//! - date: i64 tick count, see [`crate::date`]

use std::io::{self, Read, Seek, SeekFrom};

use binrw::BinReaderExt;

use crate::date::Timestamp;
use crate::error::{Error, Result};

/// Longest varUint that still fits in 64 bits
const MAX_VAR_UINT_LEN: usize = 10;

/// Exclusively-owned cursor over the database bytes
///
/// Tracks how many bytes have been consumed so the stream driver can tell a
/// clean end of input from a record cut short.
pub struct ByteCursor<R> {
    reader: Tracked<R>,
}

/// Reader that counts consumed bytes and answers position queries itself
///
/// binrw asks for the stream position before every scalar. Forwarding that
/// to a `BufReader<File>` would cost an `lseek` per field.
struct Tracked<R> {
    inner: R,
    pos: u64,
}

impl<R: Read> Read for Tracked<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl<R: Seek> Seek for Tracked<R> {
    fn seek(&mut self, target: SeekFrom) -> io::Result<u64> {
        match target {
            SeekFrom::Current(0) => Ok(self.pos),
            SeekFrom::Start(pos) if pos == self.pos => Ok(pos),
            other => {
                self.pos = self.inner.seek(other)?;
                Ok(self.pos)
            }
        }
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.pos)
    }
}

impl<'a> ByteCursor<io::Cursor<&'a [u8]>> {
    /// Cursor over an in-memory buffer
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self::new(io::Cursor::new(data))
    }
}

impl<R: Read + Seek> ByteCursor<R> {
    /// Wrap a reader positioned at the start of the data
    pub fn new(reader: R) -> Self {
        Self {
            reader: Tracked {
                inner: reader,
                pos: 0,
            },
        }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> u64 {
        self.reader.pos
    }

    pub fn read_var_uint(&mut self) -> Result<u64> {
        let start = self.position();
        let mut value = 0u64;
        let mut shift = 0u32;

        for i in 0..MAX_VAR_UINT_LEN {
            let byte = self.read_u8()?;
            if byte < 0x80 {
                if i == MAX_VAR_UINT_LEN - 1 && byte > 1 {
                    break;
                }
                return Ok(value | (byte as u64) << shift);
            }
            value |= ((byte & 0x7F) as u64) << shift;
            shift += 7;
        }

        Err(Error::CorruptData {
            offset: start,
            reason: "varUint overflows a 64-bit integer".into(),
        })
    }

    /// Length-prefixed string
    ///
    /// Each byte that is not part of a valid UTF-8 sequence becomes one
    /// U+FFFD, matching how the XML dump has always rendered such bytes.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_var_uint()?;

        // Grows with the data actually present rather than trusting `len`
        let mut bytes = Vec::new();
        let got = (&mut self.reader).take(len).read_to_end(&mut bytes)? as u64;

        if got < len {
            return Err(Error::Truncated {
                offset: self.position(),
                needed: len - got,
            });
        }

        Ok(String::from_utf8(bytes).unwrap_or_else(|e| replace_invalid_bytes(e.as_bytes())))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let start = self.position();
        let value = self.reader.read_le::<i32>();
        Self::check(value, start, 4)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        let start = self.position();
        let value = self.reader.read_le::<i64>();
        Self::check(value, start, 8)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        let start = self.position();
        let value = self.reader.read_le::<f64>();
        Self::check(value, start, 8)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_date(&mut self) -> Result<Timestamp> {
        let start = self.position();
        let ticks = self.read_i64()?;
        Timestamp::from_ticks(ticks).ok_or_else(|| Error::CorruptData {
            offset: start,
            reason: format!("date tick count {} is out of range", ticks),
        })
    }

    fn read_u8(&mut self) -> Result<u8> {
        let start = self.position();
        let value = self.reader.read_le::<u8>();
        Self::check(value, start, 1)
    }

    /// Map a fixed-width read of `width` bytes starting at `start`
    fn check<T>(value: binrw::BinResult<T>, start: u64, width: u64) -> Result<T> {
        match value {
            Ok(value) => Ok(value),
            Err(binrw::Error::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(Error::Truncated {
                    offset: start,
                    needed: width,
                })
            }
            Err(binrw::Error::Io(e)) => Err(Error::Io(e)),
            Err(other) => Err(Error::CorruptData {
                offset: start,
                reason: other.to_string(),
            }),
        }
    }
}

/// Lossy UTF-8 decoding with one U+FFFD per offending byte
fn replace_invalid_bytes(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                // valid_up_to guarantees this prefix is UTF-8
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                let bad = e.error_len().unwrap_or(rest.len());
                out.extend(std::iter::repeat('\u{FFFD}').take(bad));
                bytes = &rest[bad..];
            }
        }
    }
}
