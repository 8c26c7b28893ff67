//! The character set trait and its helpers.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::str;
use std::borrow::Cow;
use crate::tag::Tag;


//------------ CharSet -------------------------------------------------------

/// The character set of a restricted character string type.
///
/// The trait converts between Rust strings and the content octets of a
/// value of the string type, checking that all characters belong to the
/// set.
pub trait CharSet {
    /// The natural tag of the related restricted character string type.
    const TAG: Tag;

    /// Encodes a string into content octets.
    ///
    /// Fails if the string contains characters outside the set.
    fn encode_str(s: &str) -> Result<Cow<'_, [u8]>, CharSetError>;

    /// Decodes content octets into a string.
    ///
    /// Fails if the content contains octets that don’t encode characters
    /// of the set.
    fn decode_slice(slice: &[u8]) -> Result<Cow<'_, str>, CharSetError>;
}


//------------ CharSetError --------------------------------------------------

/// A string contained characters not allowed by a character set.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum CharSetError {
    /// A character of the string to be encoded is not allowed.
    #[error("invalid character {ch:?} in {tag}")]
    Char { ch: char, tag: Tag },

    /// Some content octets do not encode an allowed character.
    #[error("invalid octet 0x{octet:02x} at index {idx} in {tag}")]
    Octet { octet: u8, idx: usize, tag: Tag },
}


//------------ Helpers for ASCII subsets -------------------------------------

/// Encodes a string of a character set that is a subset of ASCII.
pub(super) fn encode_ascii(
    s: &str, tag: Tag, allowed: impl Fn(u8) -> bool
) -> Result<Cow<'_, [u8]>, CharSetError> {
    match s.chars().find(|&ch| !ch.is_ascii() || !allowed(ch as u8)) {
        Some(ch) => Err(CharSetError::Char { ch, tag }),
        None => Ok(Cow::Borrowed(s.as_bytes()))
    }
}

/// Decodes the content of a character set that is a subset of ASCII.
pub(super) fn decode_ascii(
    slice: &[u8], tag: Tag, allowed: impl Fn(u8) -> bool
) -> Result<Cow<'_, str>, CharSetError> {
    if let Some(idx) = slice.iter().position(|&ch| {
        !ch.is_ascii() || !allowed(ch)
    }) {
        return Err(CharSetError::Octet { octet: slice[idx], idx, tag })
    }
    match str::from_utf8(slice) {
        Ok(res) => Ok(Cow::Borrowed(res)),
        Err(err) => {
            let idx = err.valid_up_to();
            Err(CharSetError::Octet { octet: slice[idx], idx, tag })
        }
    }
}
