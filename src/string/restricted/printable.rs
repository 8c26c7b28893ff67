//! The PrintableString type.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::borrow::Cow;
use crate::tag::Tag;
use super::charset::{decode_ascii, encode_ascii, CharSet, CharSetError};


//------------ PrintableString -----------------------------------------------

/// A restricted character string allowing a subset of ASCII characters.
///
/// This character string allows the following characters from the ASCII
/// character set and encodes them with their ASCII value:
///
/// * the letters `A` to `Z` and `a` to `z`,
/// * the digits `0` to `9`,
/// * the space character ` `,
/// * the symbols `'`, `(`, `)`, `+`, `,`, `-`, `.`, `/`, `:`, `=`, and `?`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrintableString;

impl PrintableString {
    fn is_allowed(x: u8) -> bool {
        x.is_ascii_alphanumeric() || // A-Z a-z 0-9
        x == b' ' || x == b'\'' || x == b'(' || x == b')' ||
        x == b'+' || x == b',' || x == b'-' || x == b'.' ||
        x == b'/' || x == b':' || x == b'=' || x == b'?'
    }
}

impl CharSet for PrintableString {
    const TAG: Tag = Tag::PRINTABLE_STRING;

    fn encode_str(s: &str) -> Result<Cow<'_, [u8]>, CharSetError> {
        encode_ascii(s, Self::TAG, Self::is_allowed)
    }

    fn decode_slice(slice: &[u8]) -> Result<Cow<'_, str>, CharSetError> {
        decode_ascii(slice, Self::TAG, Self::is_allowed)
    }
}


//============ Tests =========================================================
