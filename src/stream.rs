//! Byte sink / source plumbing shared by every codec in the crate.
//!
//! [`XdrWriter`] and [`XdrReader`] wrap a plain `std::io` stream and keep a
//! monotonic cursor of bytes written or read. The cursor exists only to
//! compute padding: after a byte-granular payload, the stream is brought back
//! to a 4-byte boundary with `(4 - pos % 4) % 4` zero bytes. Neither side ever
//! seeks, so a length or count is always written before its payload.
//!
//! ```text
//! +--------+--------+...+--------+---...---+
//! | byte 0 | byte 1 |...| byte N-1 |  r×0   |
//! +--------+--------+...+--------+---...---+
//! |<-----------N bytes---------->|<--pad--->|
//!                         where (N + r) % 4 == 0
//! ```

use crate::error::{Error, Result};
use crate::limits::Limits;
use std::io::{self, Read, Write};

const ZERO_PAD: [u8; 3] = [0; 3];

fn padding_after(pos: u64) -> usize {
    ((4 - pos % 4) % 4) as usize
}

fn io_error(e: io::Error) -> Error {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => Error::UnexpectedEof,
        _ => Error::Io(e.to_string()),
    }
}

// ── XdrWriter ──────────────────────────────────────────────────────────────

/// Big-endian, 4-byte aligned byte sink. Generic over any `W: Write`.
///
/// ```rust
/// use ledger_xdr::XdrWriter;
///
/// let mut w = XdrWriter::new(Vec::new());
/// w.write_var_opaque(b"abcde", 16).unwrap();
/// assert_eq!(w.position(), 12);
/// assert_eq!(w.into_inner(), [0, 0, 0, 5, b'a', b'b', b'c', b'd', b'e', 0, 0, 0]);
/// ```
pub struct XdrWriter<W: Write> {
    inner: W,
    pos: u64,
}

impl<W: Write> XdrWriter<W> {
    pub fn new(inner: W) -> Self {
        XdrWriter { inner, pos: 0 }
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Consume the writer and return the inner sink.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes).map_err(io_error)?;
        self.pos += bytes.len() as u64;
        Ok(())
    }

    /// XDR signed integer: 4 bytes, big-endian, two's complement
    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        self.write_raw(&v.to_be_bytes())
    }

    /// XDR unsigned integer: 4 bytes, big-endian
    pub fn write_u32(&mut self, v: u32) -> Result<()> {
        self.write_raw(&v.to_be_bytes())
    }

    /// XDR hyper integer: 8 bytes, big-endian, two's complement
    pub fn write_i64(&mut self, v: i64) -> Result<()> {
        self.write_raw(&v.to_be_bytes())
    }

    /// XDR unsigned hyper integer: 8 bytes, big-endian
    pub fn write_u64(&mut self, v: u64) -> Result<()> {
        self.write_raw(&v.to_be_bytes())
    }

    pub fn write_f32(&mut self, v: f32) -> Result<()> {
        self.write_raw(&v.to_be_bytes())
    }

    pub fn write_f64(&mut self, v: f64) -> Result<()> {
        self.write_raw(&v.to_be_bytes())
    }

    /// XDR bool: the 32-bit integer 0 or 1
    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        self.write_u32(u32::from(v))
    }

    /// Write `buf` verbatim: no length prefix and no padding.
    pub fn write_bytes_fixed(&mut self, buf: &[u8]) -> Result<()> {
        self.write_raw(buf)
    }

    /// Emit zero bytes up to the next 4-byte boundary.
    pub fn pad(&mut self) -> Result<()> {
        let n = padding_after(self.pos);
        self.write_raw(&ZERO_PAD[..n])
    }

    /// `opaque x[N]`: exactly `buf.len()` bytes, then padding.
    pub fn write_fixed_opaque(&mut self, buf: &[u8]) -> Result<()> {
        self.write_bytes_fixed(buf)?;
        self.pad()
    }

    /// Write a length or element count prefix, refusing anything above `max`.
    pub fn write_length(&mut self, len: usize, max: u32) -> Result<()> {
        let prefix = u32::try_from(len)
            .ok()
            .filter(|l| *l <= max)
            .ok_or(Error::LengthExceedsBound { len, max })?;
        self.write_u32(prefix)
    }

    /// `opaque x<MAX>` / `string s<MAX>`: 4-byte length, data, padding.
    pub fn write_var_opaque(&mut self, buf: &[u8], max: u32) -> Result<()> {
        self.write_length(buf.len(), max)?;
        self.write_fixed_opaque(buf)
    }
}

// ── XdrReader ──────────────────────────────────────────────────────────────

/// Big-endian, 4-byte aligned byte source. Generic over any `R: Read`.
///
/// Every read that cannot obtain its full byte count fails with
/// [`Error::UnexpectedEof`]; padding that is not all zeroes fails with
/// [`Error::MalformedPadding`].
pub struct XdrReader<R: Read> {
    inner: R,
    pos: u64,
    depth: u32,
    limit: usize,
}

impl<R: Read> XdrReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_limits(inner, Limits::default())
    }

    pub fn with_limits(inner: R, limits: Limits) -> Self {
        XdrReader {
            inner,
            pos: 0,
            depth: limits.depth,
            limit: limits.len,
        }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Consume the reader and return the inner source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn charge(&mut self, n: usize) -> Result<()> {
        let budget = (self.limit as u64).saturating_sub(self.pos);
        if n as u64 > budget {
            return Err(Error::LimitExceeded(self.limit));
        }
        Ok(())
    }

    fn read_raw(&mut self, buf: &mut [u8]) -> Result<()> {
        self.charge(buf.len())?;
        self.inner.read_exact(buf).map_err(io_error)?;
        self.pos += buf.len() as u64;
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_raw(&mut buf)?;
        Ok(buf)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    /// Values above `i32::MAX` come back as plain magnitudes, never negative.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_be_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(self.read_array()?))
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u32()? {
            0 => Ok(false),
            1 => Ok(true),
            v => Err(Error::InvalidBool(v)),
        }
    }

    /// Fill `buf` verbatim: no length prefix and no padding.
    pub fn read_bytes_fixed(&mut self, buf: &mut [u8]) -> Result<()> {
        self.read_raw(buf)
    }

    /// Consume the padding up to the next 4-byte boundary; it must be zero.
    pub fn skip_padding(&mut self) -> Result<()> {
        let n = padding_after(self.pos);
        let mut pad = [0u8; 3];
        self.read_raw(&mut pad[..n])?;
        if pad.iter().any(|b| *b != 0) {
            return Err(Error::MalformedPadding);
        }
        Ok(())
    }

    /// `opaque x[N]`: exactly `N` bytes, then padding.
    pub fn read_fixed_opaque<const N: usize>(&mut self) -> Result<[u8; N]> {
        let buf = self.read_array::<N>()?;
        self.skip_padding()?;
        Ok(buf)
    }

    /// Read a length or element count prefix, rejecting anything above `max`.
    pub fn read_length(&mut self, max: u32) -> Result<usize> {
        let len = self.read_u32()?;
        if len > max {
            return Err(Error::LengthExceedsBound {
                len: len as usize,
                max,
            });
        }
        Ok(len as usize)
    }

    /// `opaque x<MAX>` / `string s<MAX>`: 4-byte length, data, padding.
    pub fn read_var_opaque(&mut self, max: u32) -> Result<Vec<u8>> {
        let len = self.read_length(max)?;
        let buf = self.read_payload(len)?;
        self.skip_padding()?;
        Ok(buf)
    }

    // Grows with the bytes actually delivered; the declared length is never
    // allocated up front.
    fn read_payload(&mut self, len: usize) -> Result<Vec<u8>> {
        self.charge(len)?;
        let mut buf = Vec::new();
        (&mut self.inner)
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(io_error)?;
        self.pos += buf.len() as u64;
        if buf.len() < len {
            return Err(Error::UnexpectedEof);
        }
        Ok(buf)
    }

    /// Run `f` one composite level deeper, failing once the depth budget is
    /// spent. Struct and union decoders wrap their body in this.
    pub fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.enter()?;
        let result = f(self);
        self.leave();
        result
    }

    pub(crate) fn enter(&mut self) -> Result<()> {
        if self.depth == 0 {
            return Err(Error::DepthLimitExceeded);
        }
        self.depth -= 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth += 1;
    }
}
