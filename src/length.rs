//! The length octets.
//!
//! This is a private module. The [`Length`] defined herein is re-exported
//! by the parent.

use std::mem::size_of;
use crate::decode::{DecodeError, Pos};
use crate::mode::Mode;


//------------ Length --------------------------------------------------------

/// The length octets of an encoded value.
///
/// A length value can either be definite, meaning it provides the actual
/// number of content octets in the value, or indefinite, in which case the
/// content is delimited by a special end-of-value marker.
///
/// # BER Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets is one octet long and the remaining bits of this
/// first octet provide the definite length. Thus, if the first octet is
/// less than 128, it provides the definite length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. If they specify that there are zero more octets, i.e., the
/// value of the first octet is 128, the length is indefinite. Otherwise,
/// those following octets give the big-endian encoding of the definite
/// length of the content octets. The value 0xFF is reserved.
///
/// Under both CER and DER rules, a definite length must be encoded in the
/// minimum number of octets. DER doesn’t allow indefinite length at all.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Length {
    /// A definite length of the given number of content octets.
    Definite(usize),

    /// An indefinite length.
    Indefinite,
}

impl Length {
    /// Returns the length if it is definite.
    pub fn definite(self) -> Option<usize> {
        match self {
            Length::Definite(len) => Some(len),
            Length::Indefinite => None,
        }
    }

    /// Parses the length octets at the start of `data`.
    ///
    /// The data is assumed to start at position `pos` for error reporting.
    /// Returns the length and the number of octets it occupied.
    ///
    /// In BER mode, leading zero octets in the long form as well as a long
    /// form for a length that would fit the short form are accepted. In
    /// CER and DER mode, both are rejected as non-canonical as is the
    /// indefinite form in DER mode.
    pub fn take_from(
        data: &[u8], pos: Pos, mode: Mode
    ) -> Result<(Self, usize), DecodeError> {
        let first = match data.first() {
            Some(first) => *first,
            None => return Err(DecodeError::truncated(pos))
        };
        let len = match first {
            // Bit 7 clear: single.
            n if (n & 0x80) == 0 => {
                return Ok((Length::Definite(n as usize), 1))
            }

            // 0x80: indefinite.
            0x80 => {
                if !mode.allow_indefinite_constructed() {
                    return Err(DecodeError::non_canonical(
                        pos, "indefinite length in DER"
                    ))
                }
                return Ok((Length::Indefinite, 1))
            }

            // 0xFF: illegal.
            0xFF => {
                return Err(DecodeError::malformed_length(
                    pos, "illegal length octets"
                ))
            }

            // anything else: clear left bit, number of octets.
            n => (n & 0x7F) as usize
        };

        let octets = match data.get(1..len + 1) {
            Some(octets) => octets,
            None => {
                return Err(DecodeError::truncated(
                    pos.index() + data.len()
                ))
            }
        };

        // The second octet can’t be zero and it can’t be less than 0x80
        // if it is the last octet as well. In both cases, there is a
        // shorter encoding.
        if mode.is_restricted()
            && (octets[0] == 0 || (octets[0] < 0x80 && len == 1))
        {
            return Err(DecodeError::non_canonical(
                pos, "length not in shortest form"
            ))
        }

        let mut res = 0usize;
        for &octet in octets {
            if res > usize::MAX >> 8 {
                return Err(DecodeError::malformed_length(
                    pos, "excessive length"
                ))
            }
            res = (res << 8) | octet as usize;
        }
        Ok((Length::Definite(res), len + 1))
    }

    /// Returns the length of the encoded representation of the value.
    pub fn encoded_len(self) -> usize {
        match self {
            Length::Definite(len) if len > 0x7F => {
                1 + Self::octet_count(len)
            }
            _ => 1,
        }
    }

    /// Appends the encoded length to the end of `target`.
    pub fn append_encoded(self, target: &mut Vec<u8>) {
        match self {
            Length::Definite(len) if len > 0x7F => {
                let count = Self::octet_count(len);

                // `count` will never be greater than the size of a usize,
                // so it easily fits the seven bits.
                target.push(count as u8 | 0x80);
                target.extend_from_slice(
                    &len.to_be_bytes()[size_of::<usize>() - count..]
                )
            }
            Length::Definite(len) => target.push(len as u8),
            Length::Indefinite => target.push(0x80),
        }
    }

    /// Returns the number of octets needed for `len` in big-endian form.
    fn octet_count(len: usize) -> usize {
        size_of::<usize>() - (len.leading_zeros() / 8) as usize
    }
}


//============ Tests =========================================================
