//! Discriminated unions (RFC 4506 §4.15) and `i32`-backed enums (§4.3).
//!
//! A union is modelled as a Rust enum with exactly one payload per arm. The
//! discriminant goes on the wire as an `i32`, followed by the active arm's
//! fields in declaration order; void arms carry nothing.
//!
//! Decoding goes through an exhaustive `match` on the discriminant type, so a
//! new case is a compile error until every union over it handles the arm.
//! Enum discriminants are declared with [`xdr_enum!`](crate::xdr_enum), whose
//! decoder rejects undeclared values with [`Error::UnknownDiscriminant`].
//! Unions switched on a bare `int` match on `i32` and must end with an arm
//! that returns that same error.
//!
//! ```rust
//! use std::io::{Read, Write};
//! use ledger_xdr::{
//!     xdr_enum, Error, ReadXdr, Result, Union, WriteXdr, XdrReader, XdrWriter,
//! };
//!
//! xdr_enum! {
//!     pub enum SignerKind {
//!         Ed25519 = 0,
//!         PreAuthTx = 1,
//!     }
//! }
//!
//! #[derive(Debug, PartialEq)]
//! pub enum SignerKey {
//!     Ed25519(u64),
//!     PreAuthTx,
//! }
//!
//! impl Union for SignerKey {
//!     type Discriminant = SignerKind;
//!
//!     fn discriminant(&self) -> SignerKind {
//!         match self {
//!             SignerKey::Ed25519(_) => SignerKind::Ed25519,
//!             SignerKey::PreAuthTx => SignerKind::PreAuthTx,
//!         }
//!     }
//! }
//!
//! impl WriteXdr for SignerKey {
//!     fn write_xdr<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
//!         self.discriminant().write_xdr(w)?;
//!         match self {
//!             SignerKey::Ed25519(key) => key.write_xdr(w),
//!             SignerKey::PreAuthTx => Ok(()),
//!         }
//!     }
//! }
//!
//! impl ReadXdr for SignerKey {
//!     fn read_xdr<R: Read>(r: &mut XdrReader<R>) -> Result<Self> {
//!         r.nested(|r| {
//!             Ok(match SignerKind::read_xdr(r)? {
//!                 SignerKind::Ed25519 => SignerKey::Ed25519(u64::read_xdr(r)?),
//!                 SignerKind::PreAuthTx => SignerKey::PreAuthTx,
//!             })
//!         })
//!     }
//! }
//!
//! let bytes = SignerKey::Ed25519(42).to_xdr().unwrap();
//! assert_eq!(bytes, [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 42]);
//! assert_eq!(SignerKey::from_xdr(&bytes).unwrap(), SignerKey::Ed25519(42));
//! assert_eq!(SignerKey::from_xdr([0u8, 0, 0, 9]), Err(Error::UnknownDiscriminant(9)));
//! ```

use crate::error::Result;
use crate::stream::{XdrReader, XdrWriter};
use std::io::{Read, Write};

/// A value that selects a union arm.
pub trait Discriminant: Copy {
    /// Map a wire value onto a declared case; anything else is
    /// [`Error::UnknownDiscriminant`](crate::Error::UnknownDiscriminant).
    fn from_value(value: i32) -> Result<Self>;

    fn value(self) -> i32;
}

/// Unions switched on a bare `int`: every value is representable here, so
/// the union's own `match` must reject undeclared cases.
impl Discriminant for i32 {
    fn from_value(value: i32) -> Result<Self> {
        Ok(value)
    }

    fn value(self) -> i32 {
        self
    }
}

/// A discriminated union: one active arm selected by a discriminant.
pub trait Union {
    type Discriminant: Discriminant;

    fn discriminant(&self) -> Self::Discriminant;
}

pub fn write_discriminant<W: Write, D: Discriminant>(w: &mut XdrWriter<W>, d: D) -> Result<()> {
    w.write_i32(d.value())
}

pub fn read_discriminant<R: Read, D: Discriminant>(r: &mut XdrReader<R>) -> Result<D> {
    D::from_value(r.read_i32()?)
}

/// Declare an `i32`-backed XDR enum.
///
/// Generates the enum itself plus [`Discriminant`], [`WriteXdr`](crate::WriteXdr),
/// [`ReadXdr`](crate::ReadXdr) and serde impls. `VARIANTS` lists every case
/// in declaration order and `name()` returns the case identifier.
///
/// ```rust
/// use ledger_xdr::{xdr_enum, Error, ReadXdr, WriteXdr};
///
/// xdr_enum! {
///     /// Result of applying a transaction.
///     pub enum TxResultCode {
///         FeeBumpInnerSuccess = 1,
///         Success = 0,
///         Failed = -1,
///     }
/// }
///
/// assert_eq!(TxResultCode::Failed.to_xdr().unwrap(), [0xFF, 0xFF, 0xFF, 0xFF]);
/// assert_eq!(TxResultCode::from_xdr([0u8, 0, 0, 1]).unwrap(), TxResultCode::FeeBumpInnerSuccess);
/// assert_eq!(TxResultCode::from_xdr([0u8, 0, 0, 2]), Err(Error::UnknownDiscriminant(2)));
/// assert_eq!(TxResultCode::Success.name(), "Success");
/// ```
#[macro_export]
macro_rules! xdr_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(i32)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $value, )+
        }

        impl $name {
            pub const VARIANTS: &'static [$name] = &[ $( $name::$variant, )+ ];

            pub const fn name(&self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant), )+
                }
            }
        }

        impl $crate::Discriminant for $name {
            fn from_value(value: i32) -> $crate::Result<Self> {
                match value {
                    $( $value => ::core::result::Result::Ok($name::$variant), )+
                    other => ::core::result::Result::Err($crate::Error::UnknownDiscriminant(other)),
                }
            }

            fn value(self) -> i32 {
                self as i32
            }
        }

        impl $crate::WriteXdr for $name {
            fn write_xdr<W: ::std::io::Write>(
                &self,
                w: &mut $crate::XdrWriter<W>,
            ) -> $crate::Result<()> {
                $crate::union::write_discriminant(w, *self)
            }
        }

        impl $crate::ReadXdr for $name {
            fn read_xdr<R: ::std::io::Read>(
                r: &mut $crate::XdrReader<R>,
            ) -> $crate::Result<Self> {
                $crate::union::read_discriminant(r)
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S: $crate::__private::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::core::result::Result<S::Ok, S::Error> {
                serializer.serialize_i32(*self as i32)
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D: $crate::__private::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::core::result::Result<Self, D::Error> {
                let value = <i32 as $crate::__private::serde::Deserialize>::deserialize(deserializer)?;
                <$name as $crate::Discriminant>::from_value(value)
                    .map_err(<D::Error as $crate::__private::serde::de::Error>::custom)
            }
        }
    };
}
