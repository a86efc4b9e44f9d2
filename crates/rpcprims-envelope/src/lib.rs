//! Self-describing request/response envelope for rpcprims.
//!
//! An envelope is a procedure name plus an ordered list of [`Value`] slots.
//! The same shape carries requests (name + arguments) and responses
//! (the same name + results). Values are tagged on the wire, so a decoder
//! needs no schema to reconstruct them; static Rust types map onto values
//! through [`IntoValue`] / [`FromValue`], and onto whole slot lists through
//! the [`IntoArgs`], [`FromArgs`], [`IntoResults`] and [`FromResults`] traits.

pub mod codec;
pub mod convert;
pub mod error;
pub mod remote;
pub mod slots;
pub mod value;

pub use codec::{decode_envelope, encode_envelope, Envelope, MAX_NESTING_DEPTH};
pub use convert::{FromValue, IntoValue};
pub use error::{CodecError, ConvertError, Result};
pub use remote::RemoteError;
pub use slots::{FromArgs, FromResults, IntoArgs, IntoResults};
pub use value::{Record, Value};
