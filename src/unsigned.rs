//! Range-checked unsigned integer value objects.
//!
//! `unsigned int` and `unsigned hyper` fields are carried as
//! [`UnsignedInt32`] / [`UnsignedInt64`]. Construction from a signed
//! magnitude is validated; on the wire they are plain big-endian words, and
//! decoding never fails on values above the signed range.

use crate::codec::{ReadXdr, WriteXdr};
use crate::error::{Error, Result};
use crate::stream::{XdrReader, XdrWriter};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::io::{Read, Write};

macro_rules! unsigned_int {
    (
        $(#[$meta:meta])*
        $name:ident($native:ty), magnitude: $wide:ty, bits: $bits:literal,
        write: $write:ident, read: $read:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($native);

        impl $name {
            pub const MIN: Self = $name(<$native>::MIN);
            pub const MAX: Self = $name(<$native>::MAX);

            /// Validate `magnitude` against the declared bit width.
            pub fn new(magnitude: $wide) -> Result<Self> {
                <$native>::try_from(magnitude)
                    .map($name)
                    .map_err(|_| Error::RangeError {
                        value: magnitude.into(),
                        bits: $bits,
                    })
            }

            pub const fn get(self) -> $native {
                self.0
            }
        }

        impl From<$native> for $name {
            fn from(v: $native) -> Self {
                $name(v)
            }
        }

        impl From<$name> for $native {
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl From<$name> for $wide {
            fn from(v: $name) -> Self {
                v.0.into()
            }
        }

        impl TryFrom<$wide> for $name {
            type Error = Error;

            fn try_from(magnitude: $wide) -> Result<Self> {
                $name::new(magnitude)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl WriteXdr for $name {
            fn write_xdr<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
                w.$write(self.0)
            }
        }

        impl ReadXdr for $name {
            fn read_xdr<R: Read>(r: &mut XdrReader<R>) -> Result<Self> {
                r.$read().map($name)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                self.0.serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                <$native>::deserialize(deserializer).map($name)
            }
        }
    };
}

unsigned_int! {
    /// XDR `unsigned int`: a magnitude in `[0, 2^32 - 1]`.
    UnsignedInt32(u32), magnitude: i64, bits: 32,
    write: write_u32, read: read_u32
}

unsigned_int! {
    /// XDR `unsigned hyper`: a magnitude in `[0, 2^64 - 1]`.
    UnsignedInt64(u64), magnitude: i128, bits: 64,
    write: write_u64, read: read_u64
}
