//! The NumericString type.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::borrow::Cow;
use crate::tag::Tag;
use super::charset::{decode_ascii, encode_ascii, CharSet, CharSetError};


//------------ NumericString -------------------------------------------------

/// A restricted character string containing only digits and spaces.
///
/// This character string allows only the ASCII characters `0` to `9` and
/// the space character, encoded with their ASCII value.
#[derive(Clone, Copy, Debug, Default)]
pub struct NumericString;

impl NumericString {
    fn is_allowed(ch: u8) -> bool {
        ch.is_ascii_digit() || ch == b' '
    }
}

impl CharSet for NumericString {
    const TAG: Tag = Tag::NUMERIC_STRING;

    fn encode_str(s: &str) -> Result<Cow<'_, [u8]>, CharSetError> {
        encode_ascii(s, Self::TAG, Self::is_allowed)
    }

    fn decode_slice(slice: &[u8]) -> Result<Cow<'_, str>, CharSetError> {
        decode_ascii(slice, Self::TAG, Self::is_allowed)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn check() {
        assert!(NumericString::encode_str("0123 456789").is_ok());
        assert!(NumericString::encode_str("12a").is_err());
        assert!(NumericString::decode_slice(b"12-3").is_err());
        assert_eq!(NumericString::decode_slice(b"").unwrap(), "");
    }
}
