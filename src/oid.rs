//! ASN.1 Object Identifiers.
//!
//! This is a private module. It converts between the dotted-decimal text
//! form of an object identifier such as ‘1.3.6.1.5.5.7.1’ and the content
//! octets of its BER encoding.
//!
//! # BER Encoding
//!
//! The first two components are combined into a single value `40 * X + Y`
//! and each resulting value is encoded as a sequence of base-128 digits,
//! most significant first, with the top bit set in all but the last octet.
//! Components can be arbitrarily large, so they are kept as [`BigUint`]s.

use num_bigint::BigUint;
use crate::decode::ContentError;


//------------ Encoding ------------------------------------------------------

/// Returns the content octets for an object identifier in dotted form.
///
/// Returns an error message if the string isn’t a valid object identifier.
pub(crate) fn encode_dotted(dotted: &str) -> Result<Vec<u8>, &'static str> {
    let mut arcs = Vec::new();
    for arc in dotted.split('.') {
        if arc.is_empty() {
            return Err("empty component")
        }
        if !arc.bytes().all(|ch| ch.is_ascii_digit()) {
            return Err("component contains non-digit characters")
        }
        match BigUint::parse_bytes(arc.as_bytes(), 10) {
            Some(arc) => arcs.push(arc),
            None => return Err("component contains non-digit characters"),
        }
    }
    let (first, second, rest) = match arcs.as_slice() {
        [first, second, rest @ ..] => (first, second, rest),
        _ => return Err("fewer than two components"),
    };
    if *first > BigUint::from(2u8) {
        return Err("first component larger than 2")
    }
    if *first < BigUint::from(2u8) && *second >= BigUint::from(40u8) {
        return Err("second component larger than 39")
    }

    let mut res = Vec::new();
    append_component(&(first * 40u8 + second), &mut res);
    for arc in rest {
        append_component(arc, &mut res)
    }
    Ok(res)
}

/// Appends the base-128 encoding of a single component.
fn append_component(arc: &BigUint, target: &mut Vec<u8>) {
    let digits = arc.to_radix_be(128);
    if let Some((last, head)) = digits.split_last() {
        target.extend(head.iter().map(|digit| digit | 0x80));
        target.push(*last);
    }
}


//------------ Decoding ------------------------------------------------------

/// Returns the dotted form of an object identifier’s content octets.
///
/// The content must not be empty, every component must end in an octet
/// with the top bit clear, and no component may start with the padding
/// octet 0x80.
pub(crate) fn decode_dotted(content: &[u8]) -> Result<String, ContentError> {
    if content.is_empty() {
        return Err(ContentError::invalid("empty object identifier"))
    }

    let mut res = String::new();
    for (idx, component) in Components::new(content).enumerate() {
        let value = component?;
        if idx == 0 {
            let forty = BigUint::from(40u8);
            if value < forty {
                res.push_str("0.");
                res.push_str(&value.to_string());
            }
            else if value < BigUint::from(80u8) {
                res.push_str("1.");
                res.push_str(&(value - forty).to_string());
            }
            else {
                res.push_str("2.");
                res.push_str(&(value - BigUint::from(80u8)).to_string());
            }
        }
        else {
            res.push('.');
            res.push_str(&value.to_string());
        }
    }
    Ok(res)
}


//------------ Components ----------------------------------------------------

/// An iterator over the encoded components of an object identifier.
struct Components<'a> {
    /// The remaining content octets.
    slice: &'a [u8],
}

impl<'a> Components<'a> {
    fn new(slice: &'a [u8]) -> Self {
        Components { slice }
    }
}

impl Iterator for Components<'_> {
    type Item = Result<BigUint, ContentError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.slice.is_empty() {
            return None
        }
        if self.slice[0] == 0x80 {
            self.slice = &[];
            return Some(Err(ContentError::invalid(
                "object identifier component with leading zero"
            )))
        }
        let end = match self.slice.iter().position(|x| x & 0x80 == 0) {
            Some(end) => end + 1,
            None => {
                self.slice = &[];
                return Some(Err(ContentError::invalid(
                    "truncated object identifier component"
                )))
            }
        };
        let (head, tail) = self.slice.split_at(end);
        self.slice = tail;
        let digits: Vec<u8> = head.iter().map(|x| x & 0x7F).collect();
        Some(BigUint::from_radix_be(&digits, 128).ok_or_else(|| {
            ContentError::invalid("invalid object identifier component")
        }))
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0.0", b"\x00")]
    #[case("0.39", b"\x27")]
    #[case("1.0", b"\x28")]
    #[case("1.2.840.113549.1.1.11", b"\x2a\x86\x48\x86\xf7\x0d\x01\x01\x0b")]
    #[case("1.2.840.10045.4.3.2", b"\x2a\x86\x48\xce\x3d\x04\x03\x02")]
    #[case("2.5.4.3", b"\x55\x04\x03")]
    #[case("2.5.29.15", b"\x55\x1d\x0f")]
    #[case("2.47", b"\x7f")]
    #[case("2.48", b"\x81\x00")]
    #[case("2.999.3", b"\x88\x37\x03")]
    #[case("1.3.6.1.4.1.311.21.20", b"\x2b\x06\x01\x04\x01\x82\x37\x15\x14")]
    #[case(
        "2.25.329800735698586629295641978511506172918",
        b"\x69\x83\xf0\x9d\xa7\xeb\xcf\xde\xe0\xc7\xa1\xa7\xb2\xc0\x94\
          \x8c\xc8\xf9\xd7\x76"
    )]
    fn round_trip(#[case] dotted: &str, #[case] content: &[u8]) {
        assert_eq!(encode_dotted(dotted).unwrap(), content);
        assert_eq!(decode_dotted(content).unwrap(), dotted);
    }

    #[rstest]
    #[case("")]
    #[case("1")]
    #[case("1.")]
    #[case(".1.2")]
    #[case("1..2")]
    #[case("3.1")]
    #[case("0.40")]
    #[case("1.40.1")]
    #[case("1.-2")]
    #[case("1.2.a")]
    #[case("1.2_3")]
    #[case("1.+2")]
    #[case(" 1.2")]
    fn encode_invalid(#[case] dotted: &str) {
        assert!(encode_dotted(dotted).is_err(), "{dotted:?} accepted");
    }

    #[test]
    fn decode_invalid() {
        assert!(decode_dotted(b"").is_err());
        assert!(decode_dotted(b"\x2a\x86").is_err());
        assert!(decode_dotted(b"\x80\x01").is_err());
        assert!(decode_dotted(b"\x2a\x80\x01").is_err());
    }
}
