//! The [`WriteXdr`] / [`ReadXdr`] traits.
//!
//! Every schema type is an ordered composition of the impls in this crate:
//! primitives here, bounded shapes in [`opaque`](crate::opaque),
//! [`string`](crate::string), [`array`](crate::array) and
//! [`fixed_opaque`](crate::fixed_opaque), and unions via
//! [`union`](crate::union). Encode and decode are single depth-first walks
//! over the value with no state outside the stream.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::stream::{XdrReader, XdrWriter};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::any::type_name;
use std::io::{Read, Write};
use tracing::{debug, trace};

/// A value with a canonical XDR encoding.
pub trait WriteXdr {
    fn write_xdr<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()>;

    /// Encode into a freshly allocated buffer.
    fn to_xdr(&self) -> Result<Vec<u8>> {
        let mut w = XdrWriter::new(Vec::new());
        self.write_xdr(&mut w)?;
        let bytes = w.into_inner();
        trace!(type_name = type_name::<Self>(), len = bytes.len(), "encoded xdr");
        Ok(bytes)
    }

    /// Encode and render the bytes as standard padded base64.
    fn to_xdr_base64(&self) -> Result<String> {
        Ok(STANDARD.encode(self.to_xdr()?))
    }
}

/// A value that can be reconstructed from its XDR encoding.
pub trait ReadXdr: Sized {
    fn read_xdr<R: Read>(r: &mut XdrReader<R>) -> Result<Self>;

    /// Decode exactly one value from `bytes` with the default [`Limits`].
    /// Bytes left over after the value are an error.
    fn from_xdr(bytes: impl AsRef<[u8]>) -> Result<Self> {
        Self::from_xdr_with_limits(bytes, Limits::default())
    }

    fn from_xdr_with_limits(bytes: impl AsRef<[u8]>, limits: Limits) -> Result<Self> {
        let bytes = bytes.as_ref();
        trace!(type_name = type_name::<Self>(), len = bytes.len(), "decoding xdr");
        let result = Self::read_xdr_partial(bytes, limits).and_then(|(value, rest)| {
            if rest.is_empty() {
                Ok(value)
            } else {
                Err(Error::TrailingBytes(rest.len()))
            }
        });
        if let Err(e) = &result {
            debug!(type_name = type_name::<Self>(), error = %e, "xdr decode failed");
        }
        result
    }

    /// Decode one value from the front of `bytes`, returning the unread tail.
    fn read_xdr_partial(bytes: &[u8], limits: Limits) -> Result<(Self, &[u8])> {
        let mut rest = bytes;
        let value = {
            let mut r = XdrReader::with_limits(&mut rest, limits);
            Self::read_xdr(&mut r)?
        };
        Ok((value, rest))
    }

    /// Base64-decode `text`, then decode the bytes with [`ReadXdr::from_xdr`].
    fn from_xdr_base64(text: impl AsRef<[u8]>) -> Result<Self> {
        let bytes = STANDARD.decode(text)?;
        Self::from_xdr(bytes)
    }
}

// ── Primitives ─────────────────────────────────────────────────────────────

macro_rules! primitive_xdr {
    ($($t:ty => $write:ident, $read:ident;)+) => {
        $(
            impl WriteXdr for $t {
                fn write_xdr<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
                    w.$write(*self)
                }
            }

            impl ReadXdr for $t {
                fn read_xdr<R: Read>(r: &mut XdrReader<R>) -> Result<Self> {
                    r.$read()
                }
            }
        )+
    };
}

primitive_xdr! {
    i32 => write_i32, read_i32;
    u32 => write_u32, read_u32;
    i64 => write_i64, read_i64;
    u64 => write_u64, read_u64;
    f32 => write_f32, read_f32;
    f64 => write_f64, read_f64;
    bool => write_bool, read_bool;
}

/// XDR void: zero bytes.
impl WriteXdr for () {
    fn write_xdr<W: Write>(&self, _w: &mut XdrWriter<W>) -> Result<()> {
        Ok(())
    }
}

impl ReadXdr for () {
    fn read_xdr<R: Read>(_r: &mut XdrReader<R>) -> Result<Self> {
        Ok(())
    }
}

// ── Optional data (`T* p`) ─────────────────────────────────────────────────

impl<T: WriteXdr> WriteXdr for Option<T> {
    fn write_xdr<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
        match self {
            Some(value) => {
                w.write_u32(1)?;
                value.write_xdr(w)
            }
            None => w.write_u32(0),
        }
    }
}

impl<T: ReadXdr> ReadXdr for Option<T> {
    fn read_xdr<R: Read>(r: &mut XdrReader<R>) -> Result<Self> {
        match r.read_u32()? {
            0 => Ok(None),
            1 => T::read_xdr(r).map(Some),
            flag => Err(Error::InvalidOptionFlag(flag)),
        }
    }
}

// Recursive shapes hold their children behind a `Box`.
impl<T: WriteXdr + ?Sized> WriteXdr for Box<T> {
    fn write_xdr<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
        (**self).write_xdr(w)
    }
}

impl<T: ReadXdr> ReadXdr for Box<T> {
    fn read_xdr<R: Read>(r: &mut XdrReader<R>) -> Result<Self> {
        T::read_xdr(r).map(Box::new)
    }
}

// ── Fixed-length arrays (`T x[N]`) ─────────────────────────────────────────
//
// Elements are written back to back. Each element's own encoding is already a
// multiple of 4 bytes, so no padding is inserted between them.

impl<T: WriteXdr, const N: usize> WriteXdr for [T; N] {
    fn write_xdr<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
        self.iter().try_for_each(|item| item.write_xdr(w))
    }
}

impl<T: ReadXdr, const N: usize> ReadXdr for [T; N] {
    fn read_xdr<R: Read>(r: &mut XdrReader<R>) -> Result<Self> {
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(T::read_xdr(r)?);
        }
        items.try_into().map_err(|rest: Vec<T>| Error::LengthExceedsBound {
            len: rest.len(),
            max: N as u32,
        })
    }
}
