//! UTF8 strings.

use std::str;
use std::borrow::Cow;
use crate::tag::Tag;
use super::charset::{CharSet, CharSetError};


//------------ Utf8String ----------------------------------------------------

/// A restricted character string containing UTF-8 encoded characters.
///
/// This character string allows all Unicode code points. It represents them
/// as a sequence of octets according to the UTF-8 encoding defined in
/// [RFC 3629]. Since Rust strings are UTF-8 already, encoding never fails.
///
/// [RFC 3629]: https://tools.ietf.org/html/rfc3629
#[derive(Clone, Copy, Debug, Default)]
pub struct Utf8String;

impl CharSet for Utf8String {
    const TAG: Tag = Tag::UTF8_STRING;

    fn encode_str(s: &str) -> Result<Cow<'_, [u8]>, CharSetError> {
        Ok(Cow::Borrowed(s.as_bytes()))
    }

    fn decode_slice(slice: &[u8]) -> Result<Cow<'_, str>, CharSetError> {
        match str::from_utf8(slice) {
            Ok(res) => Ok(Cow::Borrowed(res)),
            Err(err) => {
                let idx = err.valid_up_to();
                Err(CharSetError::Octet {
                    octet: slice[idx], idx, tag: Self::TAG
                })
            }
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decode() {
        assert_eq!(
            Utf8String::decode_slice("Grüße".as_bytes()).unwrap(), "Grüße"
        );
        assert_eq!(
            Utf8String::decode_slice(b"ab\xc3").unwrap_err(),
            CharSetError::Octet { octet: 0xc3, idx: 2, tag: Tag::UTF8_STRING }
        );
        assert!(Utf8String::decode_slice(b"\xff").is_err());
    }
}
