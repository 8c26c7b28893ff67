//! Encoding data in BER, CER, and DER.
//!
//! Encoding is done through a [`Writer`] created for one of the three
//! encoding modes. Primitive values are written through its various
//! `write_*` methods. Constructed values are opened through the `push_*`
//! methods which return a [`Scope`]. The content of the constructed value
//! is written through the scope and the value is completed when the scope
//! is dropped. Once everything has been written, [`Writer::encode`]
//! returns the encoded data.
//!
//! All the methods take an optional tag. If it is `None`, the natural
//! universal tag of the type is used. Otherwise the given tag replaces it
//! as is necessary for implicit tagging. Explicit tagging is done by
//! pushing a sequence with the context specific tag.

pub use self::error::EncodeError;
pub use self::scope::Scope;
pub use self::writer::Writer;

mod error;
mod scope;
mod writer;
