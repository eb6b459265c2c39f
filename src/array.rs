//! XDR variable-length array (RFC 4506 §4.13): `T x<MAX>`.

use crate::codec::{ReadXdr, WriteXdr};
use crate::error::{Error, Result};
use crate::stream::{XdrReader, XdrWriter};
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeTupleStruct;
use std::fmt;
use std::io::{Read, Write};
use std::marker::PhantomData;
use std::ops::Deref;

// Upper bound on the capacity reserved from a declared count before any
// element has actually been decoded.
const PREALLOC_LIMIT: usize = 1024;

/// `T x<MAX>`: at most `MAX` elements of `T`.
///
/// Wire form is a `u32` count followed by each element's own encoding.
/// Nothing is inserted between elements: every XDR encoding is already a
/// multiple of 4 bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarArray<T, const MAX: u32 = { u32::MAX }>(Vec<T>);

impl<T, const MAX: u32> VarArray<T, MAX> {
    pub fn new(items: Vec<T>) -> Result<Self> {
        if items.len() > MAX as usize {
            return Err(Error::LengthExceedsBound {
                len: items.len(),
                max: MAX,
            });
        }
        Ok(VarArray(items))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T, const MAX: u32> Default for VarArray<T, MAX> {
    fn default() -> Self {
        VarArray(Vec::new())
    }
}

impl<T, const MAX: u32> Deref for VarArray<T, MAX> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T, const MAX: u32> TryFrom<Vec<T>> for VarArray<T, MAX> {
    type Error = Error;

    fn try_from(items: Vec<T>) -> Result<Self> {
        Self::new(items)
    }
}

impl<T, const MAX: u32> IntoIterator for VarArray<T, MAX> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T, const MAX: u32> IntoIterator for &'a VarArray<T, MAX> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: WriteXdr, const MAX: u32> WriteXdr for VarArray<T, MAX> {
    fn write_xdr<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
        w.write_length(self.0.len(), MAX)?;
        self.0.iter().try_for_each(|item| item.write_xdr(w))
    }
}

impl<T: ReadXdr, const MAX: u32> ReadXdr for VarArray<T, MAX> {
    fn read_xdr<R: Read>(r: &mut XdrReader<R>) -> Result<Self> {
        let count = r.read_length(MAX)?;
        let mut items = Vec::with_capacity(count.min(PREALLOC_LIMIT));
        for _ in 0..count {
            items.push(T::read_xdr(r)?);
        }
        Ok(VarArray(items))
    }
}

impl<T: serde::Serialize, const MAX: u32> serde::Serialize for VarArray<T, MAX> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_tuple_struct(crate::BOUNDED_TOKEN, MAX as usize)?;
        st.serialize_field(&self.0)?;
        st.end()
    }
}

impl<'de, T: serde::Deserialize<'de>, const MAX: u32> serde::Deserialize<'de> for VarArray<T, MAX> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let items = deserializer.deserialize_tuple_struct(
            crate::BOUNDED_TOKEN,
            MAX as usize,
            VarArrayVisitor::<T, MAX>(PhantomData),
        )?;
        Self::new(items).map_err(de::Error::custom)
    }
}

struct VarArrayVisitor<T, const MAX: u32>(PhantomData<T>);

impl<'de, T: serde::Deserialize<'de>, const MAX: u32> Visitor<'de> for VarArrayVisitor<T, MAX> {
    type Value = Vec<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at most {} elements", MAX)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Vec<T>, A::Error> {
        seq.next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))
    }
}
