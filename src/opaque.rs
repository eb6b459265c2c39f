//! XDR variable-length opaque data (RFC 4506 §4.10): `opaque x<MAX>`.

use crate::codec::{ReadXdr, WriteXdr};
use crate::error::{Error, Result};
use crate::stream::{XdrReader, XdrWriter};
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeTupleStruct;
use serde_bytes::{ByteBuf, Bytes};
use std::fmt;
use std::io::{Read, Write};
use std::ops::Deref;

/// `opaque x<MAX>`: at most `MAX` raw bytes.
///
/// Wire form is a `u32` length, the bytes, then padding to a 4-byte boundary.
/// The bound is enforced when the value is built, again before it is
/// written, and on decode before any payload byte is read.
///
/// ```rust
/// use ledger_xdr::{Error, ReadXdr, VarOpaque, WriteXdr};
///
/// let v = VarOpaque::<8>::new(vec![1u8, 2, 3]).unwrap();
/// assert_eq!(v.to_xdr().unwrap(), [0, 0, 0, 3, 1, 2, 3, 0]);
///
/// assert_eq!(
///     VarOpaque::<2>::from_xdr([0u8, 0, 0, 3, 1, 2, 3, 0]),
///     Err(Error::LengthExceedsBound { len: 3, max: 2 })
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarOpaque<const MAX: u32 = { u32::MAX }>(Vec<u8>);

impl<const MAX: u32> VarOpaque<MAX> {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.len() > MAX as usize {
            return Err(Error::LengthExceedsBound {
                len: bytes.len(),
                max: MAX,
            });
        }
        Ok(VarOpaque(bytes))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl<const MAX: u32> Deref for VarOpaque<MAX> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl<const MAX: u32> AsRef<[u8]> for VarOpaque<MAX> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const MAX: u32> TryFrom<Vec<u8>> for VarOpaque<MAX> {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        Self::new(bytes)
    }
}

impl<const MAX: u32> TryFrom<&[u8]> for VarOpaque<MAX> {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::new(bytes)
    }
}

impl<const MAX: u32> WriteXdr for VarOpaque<MAX> {
    fn write_xdr<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
        w.write_var_opaque(&self.0, MAX)
    }
}

impl<const MAX: u32> ReadXdr for VarOpaque<MAX> {
    fn read_xdr<R: Read>(r: &mut XdrReader<R>) -> Result<Self> {
        r.read_var_opaque(MAX).map(VarOpaque)
    }
}

impl<const MAX: u32> serde::Serialize for VarOpaque<MAX> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_bounded_bytes(&self.0, MAX, serializer)
    }
}

impl<'de, const MAX: u32> serde::Deserialize<'de> for VarOpaque<MAX> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let bytes = deserialize_bounded_bytes(MAX, deserializer)?;
        Self::new(bytes).map_err(de::Error::custom)
    }
}

// ── serde framing shared with `XdrString` ─────────────────────────────────
//
// A bounded value travels as a one-field tuple struct named `BOUNDED_TOKEN`
// whose declared length is `MAX`. Our serializer and deserializer apply that
// bound to the length prefix of the single field; other formats just see a
// one-element tuple.

pub(crate) fn serialize_bounded_bytes<S: serde::Serializer>(
    bytes: &[u8],
    max: u32,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut st = serializer.serialize_tuple_struct(crate::BOUNDED_TOKEN, max as usize)?;
    st.serialize_field(Bytes::new(bytes))?;
    st.end()
}

pub(crate) fn deserialize_bounded_bytes<'de, D: serde::Deserializer<'de>>(
    max: u32,
    deserializer: D,
) -> std::result::Result<Vec<u8>, D::Error> {
    deserializer.deserialize_tuple_struct(crate::BOUNDED_TOKEN, max as usize, BoundedBytesVisitor(max))
}

struct BoundedBytesVisitor(u32);

impl<'de> Visitor<'de> for BoundedBytesVisitor {
    type Value = Vec<u8>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at most {} bytes", self.0)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Vec<u8>, A::Error> {
        let buf: ByteBuf = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        Ok(buf.into_vec())
    }
}
