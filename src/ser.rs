//! serde bridge, encode side.
//!
//! [`Serializer`] drives any `serde::Serialize` type through the same
//! [`XdrWriter`] the typed codecs use, so derived structs and hand-written
//! bindings produce identical bytes.
//!
//! How the serde data model lands on the wire:
//! - `bool`, 8/16/32-bit integers and `char` take one 4-byte word; `i64`/`u64` take two
//! - `f32` / `f64` are IEEE-754 single and double precision
//! - strings and byte buffers carry a `u32` length, the payload, then zero padding
//! - sequences and maps carry a `u32` count; tuples and structs carry none
//! - `Option` writes a 0/1 word before the value
//! - enum variants write their index as the discriminant, then the arm's fields
//! - [`FixedOpaque`](crate::FixedOpaque) bytes are written without a length prefix
//! - bounded shapes ([`VarOpaque`](crate::VarOpaque), [`XdrString`](crate::XdrString),
//!   [`VarArray`](crate::VarArray)) refuse lengths above their `MAX`

use crate::Framing;
use crate::error::{Error, Result};
use crate::stream::XdrWriter;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::ser::{self, Serialize};
use std::io::Write;
use tracing::trace;

/// Encode `value` into a new buffer.
pub fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut ser = Serializer::new(Vec::new());
    value.serialize(&mut ser)?;
    let bytes = ser.into_writer();
    trace!(type_name = std::any::type_name::<T>(), len = bytes.len(), "serialized xdr");
    Ok(bytes)
}

/// Encode `value` straight into `writer`.
pub fn to_writer<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> Result<()> {
    let mut ser = Serializer::new(writer);
    value.serialize(&mut ser)
}

/// Serialize `value` and render the bytes as standard padded base64.
pub fn to_base64<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(STANDARD.encode(to_bytes(value)?))
}

/// ```rust
/// use ledger_xdr::{Serializer, XdrString};
/// use serde::Serialize;
///
/// let name = XdrString::<8>::try_from("fee").unwrap();
/// let mut ser = Serializer::new(Vec::new());
/// (7u32, name).serialize(&mut ser).unwrap();
/// assert_eq!(ser.into_writer(), [0, 0, 0, 7, 0, 0, 0, 3, b'f', b'e', b'e', 0]);
/// ```
pub struct Serializer<W: Write> {
    writer: XdrWriter<W>,
    framing: Option<Framing>,
}

impl<W: Write> Serializer<W> {
    pub fn new(writer: W) -> Self {
        Serializer {
            writer: XdrWriter::new(writer),
            framing: None,
        }
    }

    /// Recover the sink.
    pub fn into_writer(self) -> W {
        self.writer.into_inner()
    }

    /// Bound for the next length prefix, if a bounded wrapper armed one.
    fn take_bound(&mut self) -> u32 {
        match self.framing.take() {
            Some(Framing::Bounded(max)) => max,
            _ => u32::MAX,
        }
    }
}

impl<'a, W: Write> ser::Serializer for &'a mut Serializer<W> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.writer.write_bool(v)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.writer.write_i32(v.into())
    }
    fn serialize_i16(self, v: i16) -> Result<()> {
        self.writer.write_i32(v.into())
    }
    fn serialize_i32(self, v: i32) -> Result<()> {
        self.writer.write_i32(v)
    }
    fn serialize_i64(self, v: i64) -> Result<()> {
        self.writer.write_i64(v)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.writer.write_u32(v.into())
    }
    fn serialize_u16(self, v: u16) -> Result<()> {
        self.writer.write_u32(v.into())
    }
    fn serialize_u32(self, v: u32) -> Result<()> {
        self.writer.write_u32(v)
    }
    fn serialize_u64(self, v: u64) -> Result<()> {
        self.writer.write_u64(v)
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.writer.write_f32(v)
    }
    fn serialize_f64(self, v: f64) -> Result<()> {
        self.writer.write_f64(v)
    }

    // Unicode scalar value as an unsigned int.
    fn serialize_char(self, v: char) -> Result<()> {
        self.writer.write_u32(v.into())
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        let max = self.take_bound();
        self.writer.write_var_opaque(v.as_bytes(), max)
    }

    /// Variable-length opaque, or fixed-length opaque when the
    /// `FIXED_OPAQUE_TOKEN` wrapper armed it (no length prefix).
    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        match self.framing.take() {
            Some(Framing::Fixed) => self.writer.write_fixed_opaque(v),
            Some(Framing::Bounded(max)) => self.writer.write_var_opaque(v, max),
            None => self.writer.write_var_opaque(v, u32::MAX),
        }
    }

    fn serialize_none(self) -> Result<()> {
        self.writer.write_u32(0)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<()> {
        self.writer.write_u32(1)?;
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Ok(())
    }
    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        self.writer.write_u32(variant_index)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<()> {
        if name == crate::FIXED_OPAQUE_TOKEN {
            self.framing = Some(Framing::Fixed);
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<()> {
        self.writer.write_u32(variant_index)?;
        value.serialize(self)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        let l = len.ok_or(Error::LengthRequired)?;
        let max = self.take_bound();
        self.writer.write_length(l, max)?;
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Ok(self)
    }

    /// A `BOUNDED_TOKEN` tuple struct arms the bound for its single field.
    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        if name == crate::BOUNDED_TOKEN {
            self.framing = Some(Framing::Bounded(u32::try_from(len).unwrap_or(u32::MAX)));
        }
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.writer.write_u32(variant_index)?;
        Ok(self)
    }

    // Pair count, then key and value alternately.
    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        let l = len.ok_or(Error::LengthRequired)?;
        let max = self.take_bound();
        self.writer.write_length(l, max)?;
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.writer.write_u32(variant_index)?;
        Ok(self)
    }
}

// Compound values write their parts in order with nothing in between.

macro_rules! forward_serialize_element {
    ($t:ty) => {
        impl<'a, W: Write> $t for &'a mut Serializer<W> {
            type Ok = ();
            type Error = Error;
            fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
                value.serialize(&mut **self)
            }
            fn end(self) -> Result<()> {
                Ok(())
            }
        }
    };
}

macro_rules! forward_unnamed_field {
    ($t:ty) => {
        impl<'a, W: Write> $t for &'a mut Serializer<W> {
            type Ok = ();
            type Error = Error;
            fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
                value.serialize(&mut **self)
            }
            fn end(self) -> Result<()> {
                Ok(())
            }
        }
    };
}

macro_rules! forward_serialize_field {
    ($t:ty) => {
        impl<'a, W: Write> $t for &'a mut Serializer<W> {
            type Ok = ();
            type Error = Error;
            fn serialize_field<T: Serialize + ?Sized>(
                &mut self,
                _key: &'static str,
                value: &T,
            ) -> Result<()> {
                value.serialize(&mut **self)
            }
            fn end(self) -> Result<()> {
                Ok(())
            }
        }
    };
}

forward_serialize_element!(ser::SerializeSeq);
forward_serialize_element!(ser::SerializeTuple);
forward_unnamed_field!(ser::SerializeTupleStruct);
forward_unnamed_field!(ser::SerializeTupleVariant);
forward_serialize_field!(ser::SerializeStruct);
forward_serialize_field!(ser::SerializeStructVariant);

impl<'a, W: Write> ser::SerializeMap for &'a mut Serializer<W> {
    type Ok = ();
    type Error = Error;
    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<()> {
        key.serialize(&mut **self)
    }
    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }
    fn end(self) -> Result<()> {
        Ok(())
    }
}
