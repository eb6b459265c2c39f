//! # ledger-xdr
//!
//! Canonical XDR (eXternal Data Representation, RFC 4506) codec engine for a
//! distributed ledger's wire and storage formats.
//!
//! ## Overview
//!
//! All values are big-endian and every item occupies a multiple of 4 bytes.
//! Encoding is deterministic: each value has exactly one byte form, and the
//! decoder rejects anything else (non-zero padding, over-bound lengths,
//! undeclared discriminants, bad option flags) instead of normalising it.
//!
//! The engine has three layers, leaf first:
//!
//! - [`stream`]: [`XdrWriter`] / [`XdrReader`], primitive integers, bools and
//!   floats, raw bytes, and the zero-padding rule.
//! - Composite shapes: [`FixedOpaque`], [`VarOpaque`], [`XdrString`],
//!   [`VarArray`], `Option<T>`, fixed arrays `[T; N]`, and unions via
//!   [`Union`] / [`Discriminant`] / [`xdr_enum!`].
//! - Entry points: [`WriteXdr::to_xdr`] / [`ReadXdr::from_xdr`] and their
//!   base64 forms, or the serde bridge ([`to_bytes`] / [`from_bytes`]) for
//!   `#[derive(Serialize, Deserialize)]` types.
//!
//! ## Type mapping
//!
//! | XDR declaration        | Rust type |
//! |------------------------|-----------|
//! | `int` / `hyper`        | `i32` / `i64` |
//! | `unsigned int` / `unsigned hyper` | [`UnsignedInt32`] / [`UnsignedInt64`] (or `u32` / `u64`) |
//! | `bool`                 | `bool` (0 or 1) |
//! | `float` / `double`     | `f32` / `f64` |
//! | `opaque x[N]`          | [`FixedOpaque<N>`] |
//! | `opaque x<MAX>`        | [`VarOpaque<MAX>`] |
//! | `string s<MAX>`        | [`XdrString<MAX>`] |
//! | `T x[N]`               | `[T; N]` |
//! | `T x<MAX>`             | [`VarArray<T, MAX>`] |
//! | `T* p`                 | `Option<T>` (`Option<Box<T>>` when recursive) |
//! | `enum`                 | [`xdr_enum!`] |
//! | `union switch`         | Rust enum implementing [`Union`] |
//! | `void`                 | `()` |
//!
//! ## Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use ledger_xdr::{from_bytes, to_bytes, FixedOpaque, VarOpaque};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct DataEntry {
//!     account: FixedOpaque<32>,
//!     name: VarOpaque<64>,
//!     sequence: u64,
//! }
//!
//! let entry = DataEntry {
//!     account: FixedOpaque::new([9; 32]),
//!     name: VarOpaque::new(b"config".to_vec()).unwrap(),
//!     sequence: 7,
//! };
//!
//! let bytes = to_bytes(&entry).unwrap();
//! assert_eq!(bytes.len(), 32 + 4 + 8 + 8);
//!
//! let decoded: DataEntry = from_bytes(&bytes).unwrap();
//! assert_eq!(entry, decoded);
//! ```

pub mod array;
pub mod codec;
pub mod de;
pub mod error;
pub mod fixed_opaque;
pub mod limits;
pub mod opaque;
pub mod ser;
pub mod stream;
pub mod string;
pub mod union;
pub mod unsigned;

pub use array::VarArray;
pub use codec::{ReadXdr, WriteXdr};
pub use de::{
    Deserializer, from_base64, from_bytes, from_bytes_partial, from_bytes_with_limits, from_reader,
};
pub use error::{Error, Result};
pub use fixed_opaque::FixedOpaque;
pub use limits::{DEFAULT_MAX_DEPTH, Limits};
pub use opaque::VarOpaque;
pub use ser::{Serializer, to_base64, to_bytes, to_writer};
pub use stream::{XdrReader, XdrWriter};
pub use string::XdrString;
pub use union::{Discriminant, Union};
pub use unsigned::{UnsignedInt32, UnsignedInt64};

pub use serde::{Deserialize, Serialize};

#[doc(hidden)]
pub mod __private {
    pub use serde;
}

/// Newtype-struct name that marks fixed-length opaque data for our
/// serializer and deserializer.
pub(crate) const FIXED_OPAQUE_TOKEN: &str = "$ledger_xdr::FixedOpaque";

/// Tuple-struct name whose declared length carries the `MAX` bound of the
/// single length-prefixed field inside it.
pub(crate) const BOUNDED_TOKEN: &str = "$ledger_xdr::Bounded";

/// Framing armed by a token wrapper and consumed by the next
/// byte/string/sequence the serde bridge reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Framing {
    /// `opaque x[N]`: no length prefix.
    Fixed,
    /// Length prefix bounded by this maximum.
    Bounded(u32),
}
