//! The IA5String type.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::borrow::Cow;
use crate::tag::Tag;
use super::charset::{decode_ascii, encode_ascii, CharSet, CharSetError};


//------------ Ia5String -----------------------------------------------------

/// A restricted character string containing ASCII characters.
///
/// This character string allows all ASCII characters (i.e., octets with
/// values `0x00` to `0x7F`) and encodes them with their ASCII value.
///
/// The type’s name is derived from the name used in ASN.1. It is derived
/// from the name IA5 or International Alphabet No. 5 which is the ITU name
/// for ASCII and is specified in ITU.T recommendation T.50.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ia5String;

impl CharSet for Ia5String {
    const TAG: Tag = Tag::IA5_STRING;

    fn encode_str(s: &str) -> Result<Cow<'_, [u8]>, CharSetError> {
        encode_ascii(s, Self::TAG, |_| true)
    }

    fn decode_slice(slice: &[u8]) -> Result<Cow<'_, str>, CharSetError> {
        decode_ascii(slice, Self::TAG, |_| true)
    }
}


//============ Tests =========================================================
