//! Reading encoded data.
//!
//! This module contains the [`Reader`] which decodes a sequence of values
//! from a slice of octets according to one of the three encoding rules.
//! The reader checks every value for the restrictions of its mode, so
//! reading data with a [`Mode::Der`][crate::Mode::Der] reader also verifies
//! that the data is in fact DER encoded.
//!
//! Content of constructed values is read through a [`Nested`] reader that
//! borrows its parent for as long as it lives.
//!
//! Problems are reported through [`DecodeError`] which always carries the
//! position in the data where the problem was found.

pub use self::error::{DecodeError, ErrorKind, Pos};
pub use self::nested::Nested;
pub use self::options::ReaderOptions;
pub use self::reader::Reader;

pub(crate) use self::error::ContentError;

mod error;
mod nested;
mod options;
mod reader;
mod scan;
