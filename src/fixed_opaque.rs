//! XDR fixed-length opaque data (RFC 4506 §4.9): `opaque x[N]`.
//!
//! The byte count `N` is fixed by the schema and never appears on the wire;
//! the bytes are followed only by 0–3 zero-padding bytes. [`FixedOpaque`] is
//! the typed form used by schema bindings (hashes, keys, asset codes).
//!
//! # With serde
//!
//! Without help, serde treats `[u8; 12]` as a 12-tuple and every byte would
//! be promoted to a 4-byte XDR int (48 bytes). Either hold a [`FixedOpaque`]
//! or annotate the bare array with `#[serde(with = "ledger_xdr::fixed_opaque")]`:
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use ledger_xdr::{FixedOpaque, from_bytes, to_bytes};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! pub struct BalanceId {
//!     pub kind: u32,
//!     pub hash: FixedOpaque<32>,
//!     #[serde(with = "ledger_xdr::fixed_opaque")]
//!     pub code: [u8; 5],
//! }
//!
//! let id = BalanceId { kind: 0, hash: FixedOpaque::new([7; 32]), code: *b"ABCDE" };
//!
//! let bytes = to_bytes(&id).unwrap();
//! // 4 (kind) + 32 (hash) + 5 (code) + 3 (padding)
//! assert_eq!(bytes.len(), 44);
//! assert_eq!(&bytes[36..], [b'A', b'B', b'C', b'D', b'E', 0, 0, 0]);
//!
//! let decoded: BalanceId = from_bytes(&bytes).unwrap();
//! assert_eq!(id, decoded);
//! ```

use crate::codec::{ReadXdr, WriteXdr};
use crate::error::{Error, Result};
use crate::stream::{XdrReader, XdrWriter};
use std::io::{Read, Write};
use std::ops::Deref;

/// `opaque x[N]`: exactly `N` raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedOpaque<const N: usize>(pub [u8; N]);

impl<const N: usize> FixedOpaque<N> {
    pub const fn new(bytes: [u8; N]) -> Self {
        FixedOpaque(bytes)
    }

    pub fn into_inner(self) -> [u8; N] {
        self.0
    }
}

impl<const N: usize> Default for FixedOpaque<N> {
    fn default() -> Self {
        FixedOpaque([0; N])
    }
}

impl<const N: usize> Deref for FixedOpaque<N> {
    type Target = [u8; N];

    fn deref(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> AsRef<[u8]> for FixedOpaque<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> From<[u8; N]> for FixedOpaque<N> {
    fn from(bytes: [u8; N]) -> Self {
        FixedOpaque(bytes)
    }
}

impl<const N: usize> TryFrom<&[u8]> for FixedOpaque<N> {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        <[u8; N]>::try_from(bytes)
            .map(FixedOpaque)
            .map_err(|_| Error::LengthExceedsBound {
                len: bytes.len(),
                max: N as u32,
            })
    }
}

impl<const N: usize> WriteXdr for FixedOpaque<N> {
    fn write_xdr<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
        w.write_fixed_opaque(&self.0)
    }
}

impl<const N: usize> ReadXdr for FixedOpaque<N> {
    fn read_xdr<R: Read>(r: &mut XdrReader<R>) -> Result<Self> {
        r.read_fixed_opaque::<N>().map(FixedOpaque)
    }
}

impl<const N: usize> serde::Serialize for FixedOpaque<N> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize(&self.0, serializer)
    }
}

impl<'de, const N: usize> serde::Deserialize<'de> for FixedOpaque<N> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserialize(deserializer).map(FixedOpaque)
    }
}

mod private {
    pub trait Sealed {}
}

/// Byte arrays usable with `#[serde(with = "ledger_xdr::fixed_opaque")]`.
///
/// This trait is sealed; only `[u8; N]` implements it.
pub trait XdrFixedOpaque: private::Sealed + Sized {
    /// `N`, the payload length before padding.
    fn fixed_len() -> usize;
    fn as_bytes(&self) -> &[u8];
    /// `None` unless `bytes.len() == fixed_len()`.
    fn from_exact_bytes(bytes: &[u8]) -> Option<Self>;
}

impl<const N: usize> private::Sealed for [u8; N] {}

impl<const N: usize> XdrFixedOpaque for [u8; N] {
    fn fixed_len() -> usize {
        N
    }
    fn as_bytes(&self) -> &[u8] {
        self.as_slice()
    }
    fn from_exact_bytes(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok()
    }
}

/// Write the array as `opaque x[N]`: payload and padding, no length.
pub fn serialize<T, S>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: XdrFixedOpaque,
    S: serde::Serializer,
{
    // The token tells our serializer that the `serialize_bytes` call coming
    // from `FixedOpaqueHelper` carries no length prefix.
    serializer.serialize_newtype_struct(
        crate::FIXED_OPAQUE_TOKEN,
        &FixedOpaqueHelper(value.as_bytes()),
    )
}

/// Read `opaque x[N]` back into the array.
pub fn deserialize<'de, T, D>(deserializer: D) -> std::result::Result<T, D::Error>
where
    T: XdrFixedOpaque,
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_newtype_struct(
        crate::FIXED_OPAQUE_TOKEN,
        FixedOpaqueVisitor::<T>(std::marker::PhantomData),
    )
}

/// Wraps a raw byte slice so `serialize_bytes` is called on it.
struct FixedOpaqueHelper<'a>(&'a [u8]);

impl serde::Serialize for FixedOpaqueHelper<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.0)
    }
}

/// When our deserializer sees [`FIXED_OPAQUE_TOKEN`](crate::FIXED_OPAQUE_TOKEN)
/// it arms fixed framing and calls `visit_newtype_struct(self)`. Asking for a
/// tuple of `N` then makes it read `N` raw bytes plus padding and hand them
/// back through `visit_byte_buf`. Other formats see an ordinary tuple.
struct FixedOpaqueVisitor<T>(std::marker::PhantomData<T>);

impl<'de, T: XdrFixedOpaque> serde::de::Visitor<'de> for FixedOpaqueVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fixed-length opaque ({} bytes)", T::fixed_len())
    }

    fn visit_newtype_struct<D: serde::Deserializer<'de>>(
        self,
        de: D,
    ) -> std::result::Result<T, D::Error> {
        de.deserialize_tuple(T::fixed_len(), self)
    }

    fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> std::result::Result<T, E> {
        T::from_exact_bytes(v).ok_or_else(|| E::invalid_length(v.len(), &self))
    }

    fn visit_byte_buf<E: serde::de::Error>(self, v: Vec<u8>) -> std::result::Result<T, E> {
        self.visit_bytes(&v)
    }

    fn visit_seq<A: serde::de::SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<T, A::Error> {
        let mut buf = Vec::with_capacity(T::fixed_len());
        while let Some(b) = seq.next_element::<u8>()? {
            buf.push(b);
        }
        T::from_exact_bytes(&buf).ok_or_else(|| serde::de::Error::invalid_length(buf.len(), &self))
    }
}
