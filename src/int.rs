//! BER encoded integers.
//!
//! This is a private module. It provides the conversions between integer
//! values and the content octets of an INTEGER or ENUMERATED value which
//! are used by both the writer and the reader.
//!
//! # BER Encoding
//!
//! In BER, an INTEGER is encoded as a primitive value with the content
//! octets providing a variable-length, big-endian, two‘s complement byte
//! sequence of that integer. Thus, the most-significant bit of the first
//! octet serves as the sign bit. There must be at least one octet and, in
//! CER and DER, the first nine bits of a multi-octet integer must not all
//! be the same.

use num_bigint::BigInt;
use crate::decode::ContentError;
use crate::mode::Mode;


//------------ Encoding ------------------------------------------------------

/// Strips redundant leading octets from two’s complement octets.
///
/// A leading 0x00 is redundant if the next octet has its sign bit clear
/// and a leading 0xFF is redundant if the next octet has it set.
pub(crate) fn trim_signed(mut octets: &[u8]) -> &[u8] {
    while let [first, second, ..] = octets {
        if (*first == 0 && second & 0x80 == 0)
            || (*first == 0xFF && second & 0x80 != 0)
        {
            octets = &octets[1..];
        }
        else {
            break
        }
    }
    octets
}

/// Returns the content octets for an arbitrary-size integer.
pub(crate) fn bigint_content(value: &BigInt) -> Vec<u8> {
    let octets = value.to_signed_bytes_be();
    match trim_signed(&octets) {
        [] => vec![0],
        trimmed => trimmed.to_vec(),
    }
}

/// Returns the content octets for a signed built-in integer.
pub(crate) fn i128_content(value: i128) -> Vec<u8> {
    trim_signed(&value.to_be_bytes()).to_vec()
}

/// Returns the content octets for an unsigned built-in integer.
pub(crate) fn u128_content(value: u128) -> Vec<u8> {
    unsigned_content(&value.to_be_bytes())
}

/// Returns the content octets for a big-endian unsigned magnitude.
///
/// Leading zero octets are dropped and a single zero octet is added back
/// if the sign bit of the first remaining octet is set. An empty
/// magnitude is zero.
pub(crate) fn unsigned_content(magnitude: &[u8]) -> Vec<u8> {
    let start = magnitude.iter().position(|&x| x != 0);
    let magnitude = match start {
        Some(start) => &magnitude[start..],
        None => return vec![0],
    };
    let mut res = Vec::with_capacity(magnitude.len() + 1);
    if magnitude[0] & 0x80 != 0 {
        res.push(0);
    }
    res.extend_from_slice(magnitude);
    res
}


//------------ Decoding ------------------------------------------------------

/// Checks that the content octets are a valid integer for the mode.
///
/// Specifically, checks that there is at least one octet and, in the
/// restricted modes, that the integer is encoded in the smallest possible
/// number of octets.
pub(crate) fn check_content(
    content: &[u8], mode: Mode
) -> Result<(), ContentError> {
    if content.is_empty() {
        return Err(ContentError::invalid("empty integer"))
    }
    if mode.is_restricted() && trim_signed(content).len() != content.len() {
        return Err(ContentError::NonCanonical("integer not in shortest form"))
    }
    Ok(())
}

/// Converts integer content octets into an arbitrary-size integer.
pub(crate) fn to_bigint(content: &[u8]) -> BigInt {
    BigInt::from_signed_bytes_be(content)
}

/// Converts integer content octets into an `i128` if it fits.
///
/// Redundant leading octets are skipped so this works for BER content
/// that isn’t minimal.
pub(crate) fn to_i128(content: &[u8]) -> Option<i128> {
    let content = trim_signed(content);
    let (&first, rest) = content.split_first()?;
    if content.len() > 16 {
        return None
    }
    let mut res = i128::from(first as i8);
    for &octet in rest {
        res = (res << 8) | i128::from(octet);
    }
    Some(res)
}

/// Converts integer content octets into a `u128` if it fits.
pub(crate) fn to_u128(content: &[u8]) -> Option<u128> {
    let content = trim_signed(content);
    let (&first, rest) = content.split_first()?;
    if first & 0x80 != 0 {
        return None
    }
    let rest = if first == 0 {
        rest
    }
    else {
        content
    };
    if rest.len() > 16 {
        return None
    }
    let mut res = 0u128;
    for &octet in rest {
        res = (res << 8) | u128::from(octet);
    }
    Some(res)
}


//============ Tests =========================================================
