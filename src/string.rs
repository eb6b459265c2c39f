//! XDR string (RFC 4506 §4.11): `string s<MAX>`.
//!
//! Same wire shape as `opaque s<MAX>`. The bytes are kept exactly as
//! received: decode never validates UTF-8, so a hostile or legacy payload
//! still round-trips byte for byte. Text is checked only when asked for.

use crate::codec::{ReadXdr, WriteXdr};
use crate::error::{Error, Result};
use crate::opaque::{deserialize_bounded_bytes, serialize_bounded_bytes};
use crate::stream::{XdrReader, XdrWriter};
use std::borrow::Cow;
use std::fmt;
use std::io::{Read, Write};

/// `string s<MAX>`: at most `MAX` bytes of (nominally) UTF-8 text.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct XdrString<const MAX: u32 = { u32::MAX }>(Vec<u8>);

impl<const MAX: u32> XdrString<MAX> {
    /// Build from raw bytes; the byte length (not char count) is bounded.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.len() > MAX as usize {
            return Err(Error::LengthExceedsBound {
                len: bytes.len(),
                max: MAX,
            });
        }
        Ok(XdrString(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The text, if the stored bytes are valid UTF-8.
    pub fn to_str(&self) -> Result<&str> {
        std::str::from_utf8(&self.0).map_err(|_| Error::InvalidString)
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl<const MAX: u32> TryFrom<&str> for XdrString<MAX> {
    type Error = Error;

    fn try_from(text: &str) -> Result<Self> {
        Self::new(text.as_bytes())
    }
}

impl<const MAX: u32> TryFrom<String> for XdrString<MAX> {
    type Error = Error;

    fn try_from(text: String) -> Result<Self> {
        Self::new(text.into_bytes())
    }
}

impl<const MAX: u32> TryFrom<Vec<u8>> for XdrString<MAX> {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        Self::new(bytes)
    }
}

impl<const MAX: u32> fmt::Display for XdrString<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl<const MAX: u32> WriteXdr for XdrString<MAX> {
    fn write_xdr<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
        w.write_var_opaque(&self.0, MAX)
    }
}

impl<const MAX: u32> ReadXdr for XdrString<MAX> {
    fn read_xdr<R: Read>(r: &mut XdrReader<R>) -> Result<Self> {
        r.read_var_opaque(MAX).map(XdrString)
    }
}

impl<const MAX: u32> serde::Serialize for XdrString<MAX> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_bounded_bytes(&self.0, MAX, serializer)
    }
}

impl<'de, const MAX: u32> serde::Deserialize<'de> for XdrString<MAX> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let bytes = deserialize_bounded_bytes(MAX, deserializer)?;
        Self::new(bytes).map_err(serde::de::Error::custom)
    }
}
