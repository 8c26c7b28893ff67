//! BER encoding for various strings types.
//!
//! There are two types of strings for binary data. Octet strings contain an
//! unrestricted sequence of octets while bit strings contain a sequence of
//! bits that does not need to be of a length divisible by eight. Bit
//! strings are often used as sets of named flags which are represented by
//! the [`NamedBits`] trait.
//!
//! In addition, there are a number of so-called restricted character strings
//! that each contain a sequence of characters according to a pre-defined
//! character set. ASN.1 defines quite a few of those of which the crate
//! currently only implements a subset that is commonly in use. Specifically:
//!
//! * [`BmpString`] contains characters of the Basic Multilingual Plane
//!   encoded as two octets each,
//! * [`Ia5String`] contains ASCII characters only (IA5 is an alternative
//!   name for ASCII),
//! * [`NumericString`] contains only decimals digits and spaces,
//! * [`PrintableString`] contains a subset of ASCII characters including
//!   letters, digits, and a few symbols,
//! * [`Utf8String`] contains a sequence of Unicode code points encoded as
//!   octets through UTF-8,
//! * [`VisibleString`] contains the printing ASCII characters.
//!
//! Each of these is a type implementing the [`CharSet`] trait.

//--- Re-exports

pub use self::bit::NamedBits;
pub use self::restricted::{
    CharSet, CharSetError,
    BmpString, Ia5String, NumericString, PrintableString, Utf8String,
    VisibleString,
};

//--- Private modules

pub(crate) mod bit;
mod restricted;
