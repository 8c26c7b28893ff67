//! The VisibleString type.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::borrow::Cow;
use crate::tag::Tag;
use super::charset::{decode_ascii, encode_ascii, CharSet, CharSetError};


//------------ VisibleString -------------------------------------------------

/// A restricted character string containing printing ASCII characters.
///
/// This character string allows the ASCII characters from the space
/// character `0x20` up to and including the tilde `0x7E`. Control
/// characters are not allowed.
#[derive(Clone, Copy, Debug, Default)]
pub struct VisibleString;

impl VisibleString {
    fn is_allowed(ch: u8) -> bool {
        (0x20..=0x7E).contains(&ch)
    }
}

impl CharSet for VisibleString {
    const TAG: Tag = Tag::VISIBLE_STRING;

    fn encode_str(s: &str) -> Result<Cow<'_, [u8]>, CharSetError> {
        encode_ascii(s, Self::TAG, Self::is_allowed)
    }

    fn decode_slice(slice: &[u8]) -> Result<Cow<'_, str>, CharSetError> {
        decode_ascii(slice, Self::TAG, Self::is_allowed)
    }
}


//============ Tests =========================================================
