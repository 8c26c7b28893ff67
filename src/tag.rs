//! The identifier octets of a BER encoded value.
//!
//! This is a private module. The relevant items are re-exported by the
//! parent.

use std::fmt;
use crate::decode::{DecodeError, Pos};
use crate::mode::Mode;


//------------ Tag -----------------------------------------------------------

/// The tag of a value.
///
/// In ASN.1, tags are used to identify the type of a value. Tags consist of
/// one of four classes, represented by the [`Class`] enum, and a number
/// within this class. The number is an unsigned integer. In BER encoding,
/// the tag becomes part of the identifier octets by combining it with a bit
/// indicating whether a value is primitive or constructed. This flag is
/// kept with the tag.
///
/// Where a tag is given as the expected tag of a value, only class and
/// number are compared. Each read operation checks for itself whether the
/// value has to be primitive or constructed.
///
/// The derived ordering sorts by class, then number. This is the canonical
/// order of the components of a SET in DER.
///
/// # Limitations
///
/// We only support tag numbers that fit into a `u32`. This should be more
/// than enough in practice.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag {
    class: Class,
    number: u32,
    constructed: bool,
}

impl Tag {
    /// Creates a tag for a primitive value from a class and number.
    pub const fn new(class: Class, number: u32) -> Self {
        Tag { class, number, constructed: false }
    }

    /// Creates a new context specific tag with the given number.
    pub const fn ctx(number: u32) -> Self {
        Self::new(Class::Context, number)
    }

    /// Creates a new tag in class “application” with the given number.
    pub const fn application(number: u32) -> Self {
        Self::new(Class::Application, number)
    }

    /// Creates a new tag in class “private” with the given number.
    pub const fn private(number: u32) -> Self {
        Self::new(Class::Private, number)
    }

    /// Returns the tag with the constructed flag set as given.
    pub const fn with_constructed(self, constructed: bool) -> Self {
        Tag { class: self.class, number: self.number, constructed }
    }

    /// Returns the class of the tag.
    pub const fn class(self) -> Class {
        self.class
    }

    /// Returns the number of the tag.
    pub const fn number(self) -> u32 {
        self.number
    }

    /// Returns whether the tag is for a constructed value.
    pub const fn is_constructed(self) -> bool {
        self.constructed
    }

    /// Returns whether the two tags agree in class and number.
    pub fn matches(self, other: Tag) -> bool {
        self.class == other.class && self.number == other.number
    }

    /// Returns whether this is the tag of the end-of-contents marker.
    pub(crate) fn is_end_of_contents(self) -> bool {
        self.class == Class::Universal && self.number == 0
            && !self.constructed
    }
}

/// # Constants for universal tags.
///
/// See clause 8.4 of ITU Recommendation X.690. SEQUENCE and SET always
/// have the constructed flag set.
///
impl Tag {
    /// The tag marking the end-of-contents in an indefinite length value.
    pub const END_OF_CONTENTS: Self = Self::new(Class::Universal, 0);

    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Self::new(Class::Universal, 1);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Self::new(Class::Universal, 2);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Self::new(Class::Universal, 3);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Self::new(Class::Universal, 4);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Self::new(Class::Universal, 5);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Self::new(Class::Universal, 6);

    /// The tag for the ObjectDescriptor type, UNIVERSAL 7.
    pub const OBJECT_DESCRIPTOR: Self = Self::new(Class::Universal, 7);

    /// The tag for the EXTERNAL and Instance-of types, UNIVERSAL 8.
    pub const EXTERNAL: Self = Self::new(Class::Universal, 8);

    /// The tag for the REAL type, UNIVERSAL 9.
    pub const REAL: Self = Self::new(Class::Universal, 9);

    /// The tag for the ENUMERATED type, UNIVERSAL 10.
    pub const ENUMERATED: Self = Self::new(Class::Universal, 10);

    /// The tag for the EMBEDDED PDV type, UNIVERSAL 11.
    pub const EMBEDDED_PDV: Self = Self::new(Class::Universal, 11);

    /// The tag for the UTF8String type, UNIVERSAL 12
    pub const UTF8_STRING: Self = Self::new(Class::Universal, 12);

    /// The tag for the RELATIVE-OID type, UNIVERSAL 13.
    pub const RELATIVE_OID: Self = Self::new(Class::Universal, 13);

    /// The tag for the TIME type, UNIVERSAL 14.
    pub const TIME: Self = Self::new(Class::Universal, 14);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self
        = Self::new(Class::Universal, 16).with_constructed(true);

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    pub const SET: Self
        = Self::new(Class::Universal, 17).with_constructed(true);

    /// The tag for the NumericString type, UNIVERSAL 18.
    pub const NUMERIC_STRING: Self = Self::new(Class::Universal, 18);

    /// The tag for the PrintableString type, UNIVERSAL 19.
    pub const PRINTABLE_STRING: Self = Self::new(Class::Universal, 19);

    /// The tag for the TeletexString type, UNIVERSAL 20.
    pub const TELETEX_STRING: Self = Self::new(Class::Universal, 20);

    /// The tag for the VideotexString type, UNIVERSAL 21.
    pub const VIDEOTEX_STRING: Self = Self::new(Class::Universal, 21);

    /// The tag for the IA5String type, UNIVERSAL 22.
    pub const IA5_STRING: Self = Self::new(Class::Universal, 22);

    /// The tag for the UTCTime type, UNIVERSAL 23.
    pub const UTC_TIME: Self = Self::new(Class::Universal, 23);

    /// The tag for the GeneralizedType type, UNIVERSAL 24.
    pub const GENERALIZED_TIME: Self = Self::new(Class::Universal, 24);

    /// The tag for the GraphicString type, UNIVERSAL 25.
    pub const GRAPHIC_STRING: Self = Self::new(Class::Universal, 25);

    /// The tag for the VisibleString type, UNIVERSAL 26.
    pub const VISIBLE_STRING: Self = Self::new(Class::Universal, 26);

    /// The tag for the GeneralString type, UNIVERSAL 27.
    pub const GENERAL_STRING: Self = Self::new(Class::Universal, 27);

    /// The tag for the UniversalString type, UNIVERSAL 28.
    pub const UNIVERSAL_STRING: Self = Self::new(Class::Universal, 28);

    /// The tag for the CHARACTER STRING type, UNIVERSAL 29.
    pub const CHARACTER_STRING: Self = Self::new(Class::Universal, 29);

    /// The tag for the BMPString type, UNIVERSAL 30.
    pub const BMP_STRING: Self = Self::new(Class::Universal, 30);
}

/// # Encoding and Decoding
///
impl Tag {
    /// Returns the number of octets of the encoded identifier octets.
    pub fn encoded_len(self) -> usize {
        if self.number <= 0x1e {
            1
        }
        else {
            // One octet for the class plus seven bits per octet after.
            let bits = 32 - self.number.leading_zeros() as usize;
            1 + (bits + 6) / 7
        }
    }

    /// Appends the encoded identifier octets to the end of `target`.
    pub fn append_encoded(self, target: &mut Vec<u8>) {
        let mut first = self.class.into_u8();
        if self.constructed {
            first |= 0x20
        }

        if self.number <= 0x1e {
            // five bits but not all of them one (so not 0x1f)
            target.push(first | self.number as u8);
            return
        }

        target.push(first | 0x1f);
        let groups = self.encoded_len() - 1;
        for idx in (0..groups).rev() {
            let group = ((self.number >> (idx * 7)) & 0x7F) as u8;
            if idx == 0 {
                target.push(group)
            }
            else {
                target.push(group | 0x80)
            }
        }
    }

    /// Parses the identifier octets at the start of `data`.
    ///
    /// The data is assumed to start at position `pos` for error reporting.
    /// Returns the tag and the number of octets it occupied.
    ///
    /// Under CER and DER, the long form must not be used for numbers that
    /// fit into the first octet and must not start with a zero group.
    /// Under BER, both are accepted.
    pub fn take_from(
        data: &[u8], pos: Pos, mode: Mode
    ) -> Result<(Self, usize), DecodeError> {
        let first = match data.first() {
            Some(first) => *first,
            None => return Err(DecodeError::truncated(pos))
        };
        let class = Class::from_u8(first);
        let constructed = first & 0x20 != 0;

        // If we have a single octet tag, we can already return.
        if (first & 0x1f) < 0x1f {
            return Ok((
                Tag { class, number: (first & 0x1f) as u32, constructed },
                1
            ))
        }

        let mut number = 0u32;
        for (idx, octet) in data.iter().copied().enumerate().skip(1) {
            if idx == 1 && octet == 0x80 && mode.is_restricted() {
                return Err(DecodeError::non_canonical(
                    pos.index() + idx, "leading zero in tag number"
                ))
            }
            if number > u32::MAX >> 7 {
                return Err(DecodeError::malformed_tag(
                    pos.index() + idx, "tag number too large"
                ))
            }
            number = (number << 7) | (octet & 0x7F) as u32;
            if octet & 0x80 == 0 {
                if number <= 0x1e && mode.is_restricted() {
                    return Err(DecodeError::non_canonical(
                        pos, "long form for short tag number"
                    ))
                }
                return Ok((Tag { class, number, constructed }, idx + 1))
            }
        }
        Err(DecodeError::malformed_tag(
            pos.index() + data.len(), "unterminated tag number"
        ))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.class == Class::Universal {
            let name = match self.number {
                0 => "end-of-contents",
                1 => "BOOLEAN",
                2 => "INTEGER",
                3 => "BIT STRING",
                4 => "OCTET STRING",
                5 => "NULL",
                6 => "OBJECT IDENTIFIER",
                7 => "ObjectDescriptor",
                8 => "EXTERNAL",
                9 => "REAL",
                10 => "ENUMERATED",
                11 => "EMBEDDED PDV",
                12 => "UTF8String",
                13 => "RELATIVE-OID",
                14 => "TIME",
                16 => "SEQUENCE",
                17 => "SET",
                18 => "NumericString",
                19 => "PrintableString",
                20 => "TeletexString",
                21 => "VideotexString",
                22 => "IA5String",
                23 => "UTCTime",
                24 => "GeneralizedTime",
                25 => "GraphicString",
                26 => "VisibleString",
                27 => "GeneralString",
                28 => "UniversalString",
                29 => "CHARACTER STRING",
                30 => "BMPString",
                _ => return write!(f, "[UNIVERSAL {}]", self.number)
            };
            return f.write_str(name)
        }
        match self.class {
            Class::Application => write!(f, "[APPLICATION ")?,
            Class::Private => write!(f, "[PRIVATE ")?,
            _ => write!(f, "[")?,
        }
        write!(f, "{}]", self.number)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut octets = Vec::new();
        self.append_encoded(&mut octets);
        write!(f, "Tag({} - {:?})", self, octets)
    }
}


//------------ Class ---------------------------------------------------------

/// The class of a tag.
///
/// The order of the variants is the canonical order of the classes.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    Universal,
    Application,
    Context,
    Private,
}

impl Class {
    const fn from_u8(octet: u8) -> Self {
        match octet {
            0x00..=0x3F => Self::Universal,
            0x40..=0x7F => Self::Application,
            0x80..=0xBF => Self::Context,
            0xC0..=0xFF => Self::Private
        }
    }

    const fn into_u8(self) -> u8 {
        match self {
            Self::Universal => 0x00,
            Self::Application => 0x40,
            Self::Context => 0x80,
            Self::Private => 0xC0,
        }
    }
}


//============ Tests =========================================================
