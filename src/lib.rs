//! Writing and reading data in Basic Encoding Rules.
//!
//! This crate encodes and decodes ASN.1 values in the Basic Encoding Rules
//! (BER) as well as its two restricted forms, the Canonical Encoding Rules
//! (CER) and Distinguished Encoding Rules (DER), as defined in ITU
//! Recommendation X.690.
//!
//! Encoding happens through the [`Writer`][encode::Writer]. It has a
//! method for each of the supported primitive types and opens constructed
//! values as scopes that are closed when they are dropped. The writer takes
//! care of the rules of the chosen mode such as the sort order of sets.
//!
//! Decoding happens through the [`Reader`][decode::Reader]. It borrows the
//! data and reads values one by one, with nested readers for the content
//! of constructed values. The reader checks that the data conforms to the
//! rules of the chosen mode.
//!
//! Both use [`Tag`] to override the natural tag of a type for implicit
//! tagging and [`Mode`] to select the encoding rules. Restricted character
//! string types and named bit lists are described in the [`string`]
//! module.
//!
//! # Example
//!
//! ```
//! use berwire::{Mode, Tag};
//! use berwire::decode::Reader;
//! use berwire::encode::Writer;
//! use berwire::string::PrintableString;
//!
//! let mut writer = Writer::new(Mode::Der);
//! {
//!     let mut seq = writer.push_sequence(None);
//!     seq.write_object_identifier(None, "2.5.4.6").unwrap();
//!     seq.write_character_string::<PrintableString>(None, "NL").unwrap();
//! }
//! let data = writer.encode();
//!
//! let mut reader = Reader::new(&data, Mode::Der);
//! let mut seq = reader.read_sequence(None).unwrap();
//! assert_eq!(seq.read_object_identifier(None).unwrap(), "2.5.4.6");
//! assert_eq!(
//!     seq.read_character_string::<PrintableString>(None).unwrap(),
//!     "NL"
//! );
//! seq.finish().unwrap();
//! ```

//--- Re-exports

pub use self::length::Length;
pub use self::mode::Mode;
pub use self::tag::{Class, Tag};
pub use self::time::UTC_TIME_TWO_DIGIT_YEAR_MAX;

//--- Public modules

pub mod decode;
pub mod encode;
pub mod string;

//--- Private modules

mod int;
mod length;
mod mode;
mod oid;
mod tag;
mod time;
