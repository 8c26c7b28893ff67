//! The BMPString type.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::borrow::Cow;
use crate::tag::Tag;
use super::charset::{CharSet, CharSetError};


//------------ BmpString -----------------------------------------------------

/// A restricted character string of the Basic Multilingual Plane.
///
/// This character string allows all Unicode code points up to U+FFFF. Each
/// character is encoded as two octets in big-endian order, i.e., as
/// UTF-16BE without surrogate pairs.
#[derive(Clone, Copy, Debug, Default)]
pub struct BmpString;

impl CharSet for BmpString {
    const TAG: Tag = Tag::BMP_STRING;

    fn encode_str(s: &str) -> Result<Cow<'_, [u8]>, CharSetError> {
        let mut res = Vec::with_capacity(s.len() * 2);
        for ch in s.chars() {
            let code = match u16::try_from(u32::from(ch)) {
                Ok(code) => code,
                Err(_) => {
                    return Err(CharSetError::Char { ch, tag: Self::TAG })
                }
            };
            res.extend_from_slice(&code.to_be_bytes());
        }
        Ok(Cow::Owned(res))
    }

    fn decode_slice(slice: &[u8]) -> Result<Cow<'_, str>, CharSetError> {
        if slice.len() % 2 != 0 {
            let idx = slice.len() - 1;
            return Err(CharSetError::Octet {
                octet: slice[idx], idx, tag: Self::TAG
            })
        }
        let mut res = String::with_capacity(slice.len() / 2);
        for (idx, pair) in slice.chunks_exact(2).enumerate() {
            let code = u16::from_be_bytes([pair[0], pair[1]]);
            match char::from_u32(u32::from(code)) {
                Some(ch) => res.push(ch),
                None => {
                    return Err(CharSetError::Octet {
                        octet: pair[0], idx: idx * 2, tag: Self::TAG
                    })
                }
            }
        }
        Ok(Cow::Owned(res))
    }
}


//============ Tests =========================================================
