//! serde bridge, decode side.
//!
//! Reads through an [`XdrReader`], so the serde path shares bounds checks,
//! padding verification and depth limits with the typed codecs. Values are
//! always produced owned; borrowed `&str` / `&[u8]` targets are not supported.

use crate::Framing;
use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::stream::XdrReader;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::{
    self, DeserializeOwned, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use std::io::Read;
use tracing::{debug, trace};

/// Deserialize exactly one value from XDR bytes; trailing bytes are an error.
pub fn from_bytes<T: DeserializeOwned>(input: &[u8]) -> Result<T> {
    from_bytes_with_limits(input, Limits::default())
}

/// [`from_bytes`] with caller-chosen depth and byte limits.
pub fn from_bytes_with_limits<T: DeserializeOwned>(input: &[u8], limits: Limits) -> Result<T> {
    trace!(type_name = std::any::type_name::<T>(), len = input.len(), "deserializing xdr");
    let result = partial_with_limits(input, limits).and_then(|(value, rest)| {
        if rest.is_empty() {
            Ok(value)
        } else {
            Err(Error::TrailingBytes(rest.len()))
        }
    });
    if let Err(e) = &result {
        debug!(type_name = std::any::type_name::<T>(), error = %e, "xdr deserialize failed");
    }
    result
}

/// Decode one value from the front of `input` and hand back the unread tail.
pub fn from_bytes_partial<T: DeserializeOwned>(input: &[u8]) -> Result<(T, &[u8])> {
    partial_with_limits(input, Limits::default())
}

fn partial_with_limits<T: DeserializeOwned>(input: &[u8], limits: Limits) -> Result<(T, &[u8])> {
    let mut rest = input;
    let value = {
        let mut de = Deserializer::with_limits(&mut rest, limits);
        T::deserialize(&mut de)?
    };
    Ok((value, rest))
}

/// Deserialize one value from any `Read` source. Whatever follows the value
/// is left unread.
pub fn from_reader<R: Read, T: DeserializeOwned>(reader: R) -> Result<T> {
    let mut de = Deserializer::new(reader);
    T::deserialize(&mut de)
}

/// Base64-decode `text`, then [`from_bytes`].
pub fn from_base64<T: DeserializeOwned>(text: impl AsRef<[u8]>) -> Result<T> {
    let bytes = STANDARD.decode(text)?;
    from_bytes(&bytes)
}

/// The XDR deserializer. Generic over any `R: Read`.
pub struct Deserializer<R: Read> {
    reader: XdrReader<R>,
    framing: Option<Framing>,
}

impl<R: Read> Deserializer<R> {
    pub fn new(reader: R) -> Self {
        Self::with_limits(reader, Limits::default())
    }

    pub fn with_limits(reader: R, limits: Limits) -> Self {
        Deserializer {
            reader: XdrReader::with_limits(reader, limits),
            framing: None,
        }
    }

    /// Consume the deserializer and return the inner reader.
    pub fn into_reader(self) -> R {
        self.reader.into_inner()
    }

    /// Bound for the next length prefix, if a bounded wrapper armed one.
    fn take_bound(&mut self) -> u32 {
        match self.framing.take() {
            Some(Framing::Bounded(max)) => max,
            _ => u32::MAX,
        }
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.reader.enter()?;
        let result = f(self);
        self.reader.leave();
        result
    }

    fn read_string(&mut self) -> Result<String> {
        let max = self.take_bound();
        let bytes = self.reader.read_var_opaque(max)?;
        String::from_utf8(bytes).map_err(|_| Error::InvalidString)
    }
}

fn narrow<T: TryFrom<i64>>(v: i64, ty: &'static str) -> Result<T> {
    T::try_from(v).map_err(|_| Error::Message(format!("value {v} out of range for {ty}")))
}

impl<'de, 'a, R: Read> de::Deserializer<'de> for &'a mut Deserializer<R> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Unsupported(
            "deserialize_any (XDR is not self-describing)",
        ))
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_bool(self.reader.read_bool()?)
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i8(narrow(self.reader.read_i32()?.into(), "i8")?)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i16(narrow(self.reader.read_i32()?.into(), "i16")?)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i32(self.reader.read_i32()?)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i64(self.reader.read_i64()?)
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u8(narrow(self.reader.read_u32()?.into(), "u8")?)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u16(narrow(self.reader.read_u32()?.into(), "u16")?)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u32(self.reader.read_u32()?)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u64(self.reader.read_u64()?)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(self.reader.read_f32()?)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(self.reader.read_f64()?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let v = self.reader.read_u32()?;
        let c = char::from_u32(v).ok_or(Error::InvalidString)?;
        visitor.visit_char(c)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_string(self.read_string()?)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_string(self.read_string()?)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_byte_buf(self, visitor)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let max = self.take_bound();
        visitor.visit_byte_buf(self.reader.read_var_opaque(max)?)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.reader.read_u32()? {
            0 => visitor.visit_none(),
            1 => visitor.visit_some(self),
            flag => Err(Error::InvalidOptionFlag(flag)),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        if name == crate::FIXED_OPAQUE_TOKEN {
            self.framing = Some(Framing::Fixed);
            return visitor.visit_newtype_struct(self);
        }
        self.nested(|de| visitor.visit_newtype_struct(de))
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let max = self.take_bound();
        let count = self.reader.read_length(max)?;
        visitor.visit_seq(SeqDeserializer::new(self, count))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        if self.framing == Some(Framing::Fixed) {
            self.framing = None;
            let mut buf = vec![0u8; len];
            self.reader.read_bytes_fixed(&mut buf)?;
            self.reader.skip_padding()?;
            return visitor.visit_byte_buf(buf);
        }
        visitor.visit_seq(SeqDeserializer::new(self, len))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        if name == crate::BOUNDED_TOKEN {
            self.framing = Some(Framing::Bounded(u32::try_from(len).unwrap_or(u32::MAX)));
            return visitor.visit_seq(SeqDeserializer::new(self, 1));
        }
        self.nested(|de| visitor.visit_seq(SeqDeserializer::new(de, len)))
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let max = self.take_bound();
        let count = self.reader.read_length(max)?;
        visitor.visit_map(MapDeserializer::new(self, count))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.nested(|de| visitor.visit_seq(SeqDeserializer::new(de, fields.len())))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.nested(|de| visitor.visit_enum(EnumDeserializer::new(de, variants.len())))
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        // Identifiers are discriminants in XDR context: read as u32
        visitor.visit_u32(self.reader.read_u32()?)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Unsupported(
            "deserialize_ignored_any (XDR is not self-describing)",
        ))
    }
}

// Hands out exactly `remaining` elements; the count is known before the first.
struct SeqDeserializer<'a, R: Read> {
    de: &'a mut Deserializer<R>,
    remaining: usize,
}

impl<'a, R: Read> SeqDeserializer<'a, R> {
    fn new(de: &'a mut Deserializer<R>, count: usize) -> Self {
        SeqDeserializer {
            de,
            remaining: count,
        }
    }
}

impl<'de, 'a, R: Read> SeqAccess<'de> for SeqDeserializer<'a, R> {
    type Error = Error;

    fn next_element_seed<T: de::DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

struct MapDeserializer<'a, R: Read> {
    de: &'a mut Deserializer<R>,
    remaining: usize,
}

impl<'a, R: Read> MapDeserializer<'a, R> {
    fn new(de: &'a mut Deserializer<R>, count: usize) -> Self {
        MapDeserializer {
            de,
            remaining: count,
        }
    }
}

impl<'de, 'a, R: Read> MapAccess<'de> for MapDeserializer<'a, R> {
    type Error = Error;

    fn next_key_seed<K: de::DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn next_value_seed<V: de::DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        seed.deserialize(&mut *self.de)
    }
}

struct EnumDeserializer<'a, R: Read> {
    de: &'a mut Deserializer<R>,
    variants: usize,
}

impl<'a, R: Read> EnumDeserializer<'a, R> {
    fn new(de: &'a mut Deserializer<R>, variants: usize) -> Self {
        EnumDeserializer { de, variants }
    }
}

impl<'de, 'a, R: Read> EnumAccess<'de> for EnumDeserializer<'a, R> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V: de::DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, Self::Variant)> {
        let discriminant = self.de.reader.read_i32()?;
        // Derived enums number their variants 0..n; anything else is undeclared.
        let index = u32::try_from(discriminant)
            .ok()
            .filter(|i| (*i as usize) < self.variants)
            .ok_or(Error::UnknownDiscriminant(discriminant))?;
        let val = seed.deserialize(de::value::U32Deserializer::<Error>::new(index))?;
        Ok((val, self))
    }
}

impl<'de, 'a, R: Read> VariantAccess<'de> for EnumDeserializer<'a, R> {
    type Error = Error;

    /// Unit variant: no data follows the discriminant
    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    /// Newtype variant: deserialize the inner value
    fn newtype_variant_seed<T: de::DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(self.de)
    }

    /// Tuple variant: deserialize a fixed-length sequence of fields
    fn tuple_variant<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(SeqDeserializer::new(self.de, len))
    }

    /// Struct variant: deserialize fields consecutively by name list length
    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_seq(SeqDeserializer::new(self.de, fields.len()))
    }
}
