//! BER-encoded bit strings.
//!
//! This is a private module. Its public items are re-exported by the parent.
//!
//! # BER Encoding
//!
//! When encoded in BER, bit strings can either be a primitive or
//! constructed value.
//!
//! If encoded as a primitive value, the first octet of the content
//! contains the number of unused bits in the last octet and the following
//! octets contain the bits with the first bit in the most significant bit
//! of the octet.
//!
//! In the constructed encoding, the bit string is represented as a
//! sequence of primitive bit strings. Only the last one may have a non-zero
//! number of unused bits. With CER, the constructed form is used if the
//! content is longer than 1000 octets and each segment except the last has
//! exactly 1000 content octets. With DER, only the primitive form is
//! allowed. Both require the unused bits to be zero.

use std::borrow::Cow;
use crate::decode::ContentError;
use crate::mode::Mode;


//------------ NamedBits -----------------------------------------------------

/// A set of flags encoded as a BIT STRING with a named bit list.
///
/// ASN.1 types such as X.509’s `KeyUsage` define names for individual bits
/// of a bit string. A type implementing this trait converts between its
/// flags and a `u64` where the value `1 << n` stands for the bit named
/// with number `n`, i.e., bit 0 is the most significant bit of the first
/// octet of the bit string.
pub trait NamedBits: Sized {
    /// The number of defined bits.
    ///
    /// This must not be larger than 64. When reading, a set bit at this
    /// position or beyond is an error.
    const BIT_COUNT: usize;

    /// Returns the flags as a bit mask.
    fn to_bits(&self) -> u64;

    /// Creates a value from a bit mask.
    ///
    /// Only bits below `BIT_COUNT` will be set in `bits`.
    fn from_bits(bits: u64) -> Self;
}


//------------ Encoding ------------------------------------------------------

/// Returns the bit string data with the unused bits cleared.
///
/// The caller has made sure that `unused` is within range and zero if the
/// data is empty.
pub(crate) fn mask_unused(unused: u8, data: &[u8]) -> Cow<'_, [u8]> {
    match data.split_last() {
        Some((&last, head)) if last & !(0xFFu8 << unused) != 0 => {
            let mut res = Vec::with_capacity(data.len());
            res.extend_from_slice(head);
            res.push(last & (0xFFu8 << unused));
            Cow::Owned(res)
        }
        _ => Cow::Borrowed(data)
    }
}

/// Returns the unused bits and data of a named bit list.
///
/// The data is trimmed to the last set bit. If no bit is set, the data is
/// empty.
pub(crate) fn named_bits_content(bits: u64) -> (u8, Vec<u8>) {
    if bits == 0 {
        return (0, Vec::new())
    }
    let last = 63 - bits.leading_zeros() as usize;
    let mut data = vec![0u8; last / 8 + 1];
    for bit in 0..=last {
        if bits & (1 << bit) != 0 {
            data[bit / 8] |= 0x80 >> (bit % 8);
        }
    }
    (7 - (last % 8) as u8, data)
}


//------------ Decoding ------------------------------------------------------

/// Checks the unused bits octet and padding of bit string content.
///
/// The number of unused bits must be between 0 and 7 and must be 0 if
/// there is no data. In the restricted modes, the unused bits must be zero.
pub(crate) fn check_content(
    unused: u8, data: &[u8], mode: Mode
) -> Result<(), ContentError> {
    if unused > 7 {
        return Err(ContentError::invalid("invalid number of unused bits"))
    }
    match data.last() {
        None if unused != 0 => {
            Err(ContentError::invalid("unused bits in empty bit string"))
        }
        Some(&last) if mode.is_restricted()
            && last & !(0xFFu8 << unused) != 0 =>
        {
            Err(ContentError::NonCanonical("unused bits not zero"))
        }
        _ => Ok(())
    }
}

/// Converts checked bit string content into named bits.
pub(crate) fn named_bits_from<F: NamedBits>(
    unused: u8, data: &[u8], mode: Mode
) -> Result<F, ContentError> {
    let bit_len = data.len() * 8 - unused as usize;
    let mut bits = 0u64;
    for bit in 0..bit_len {
        if data[bit / 8] & (0x80 >> (bit % 8)) == 0 {
            continue
        }
        if bit >= F::BIT_COUNT.min(64) {
            return Err(ContentError::invalid(format!(
                "bit {bit} set but only {} bits defined", F::BIT_COUNT
            )))
        }
        bits |= 1 << bit;
    }
    if mode.is_restricted() && bit_len > 0 {
        let last = bit_len - 1;
        if data[last / 8] & (0x80 >> (last % 8)) == 0 {
            return Err(ContentError::NonCanonical(
                "trailing zero bits in named bit list"
            ))
        }
    }
    Ok(F::from_bits(bits))
}


//============ Tests =========================================================
