//! The reader.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::borrow::Cow;
use chrono::{DateTime, FixedOffset};
use num_bigint::BigInt;
use crate::{int, oid, time};
use crate::length::Length;
use crate::mode::Mode;
use crate::string::{CharSet, NamedBits};
use crate::string::bit;
use crate::tag::Tag;
use super::error::{ContentError, DecodeError, Pos};
use super::nested::Nested;
use super::options::ReaderOptions;
use super::scan;


//------------ Reader --------------------------------------------------------

/// A reader for BER, CER, or DER encoded data.
///
/// The reader walks a sequence of encoded values stored in a slice. The
/// `read_*` methods each consume exactly one value, checking that it has
/// the expected tag and that it is encoded correctly for the reader’s mode.
/// The tag argument of these methods replaces the natural universal tag of
/// the type for implicitly tagged values.
///
/// Constructed values are opened with [`read_sequence`][Self::read_sequence]
/// and friends. They return a [`Nested`] reader for the content of the
/// value. Once the nested reader is dropped, the parent continues after
/// the constructed value.
///
/// All errors carry the position in the data where they were found. After
/// an error, the position of the reader is unchanged but reading should
/// generally be abandoned.
///
/// # Example
///
/// ```
/// use berwire::{Mode, Tag};
/// use berwire::decode::Reader;
///
/// let data = b"\x30\x06\x02\x01\x02\x80\x01\xff";
/// let mut reader = Reader::new(data, Mode::Der);
/// let mut seq = reader.read_sequence(None).unwrap();
/// assert_eq!(seq.read_u8(None).unwrap(), 2);
/// assert!(seq.read_boolean(Some(Tag::ctx(0))).unwrap());
/// seq.finish().unwrap();
/// reader.check_exhausted().unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    /// All the data.
    ///
    /// Positions are always indexes into this slice.
    data: &'a [u8],

    /// The index of the next value.
    pos: usize,

    /// The index where the data of this reader ends.
    end: usize,

    /// The encoding rules.
    mode: Mode,

    /// The options.
    options: ReaderOptions,

    /// The number of constructed values around this reader.
    depth: usize,

    /// An error left behind by a nested reader.
    pending: Option<DecodeError>,
}

/// # Creation and Navigation
///
impl<'a> Reader<'a> {
    /// Creates a new reader with default options.
    pub fn new(data: &'a [u8], mode: Mode) -> Self {
        Self::with_options(data, mode, ReaderOptions::default())
    }

    /// Creates a new reader with the given options.
    pub fn with_options(
        data: &'a [u8], mode: Mode, options: ReaderOptions
    ) -> Self {
        Reader {
            data, pos: 0, end: data.len(), mode, options,
            depth: 0, pending: None
        }
    }

    /// Returns the mode of the reader.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the options of the reader.
    pub fn options(&self) -> ReaderOptions {
        self.options
    }

    /// Returns the position of the next value.
    pub fn pos(&self) -> Pos {
        self.pos.into()
    }

    /// Returns whether there are more values to read.
    ///
    /// For a nested reader, this only considers the content of the
    /// constructed value.
    pub fn has_data_remaining(&self) -> bool {
        self.pos < self.end
    }

    /// Returns the tag of the next value without advancing.
    pub fn peek_tag(&self) -> Result<Tag, DecodeError> {
        self.check_pending()?;
        Tag::take_from(
            &self.data[self.pos..self.end], self.pos.into(), self.mode
        ).map(|(tag, _)| tag)
    }

    /// Returns the complete encoding of the next value without advancing.
    pub fn peek_encoded_value(&self) -> Result<&'a [u8], DecodeError> {
        let header = self.peek_header()?;
        Ok(&self.data[header.start..header.end])
    }

    /// Returns the complete encoding of the next value.
    pub fn read_encoded_value(&mut self) -> Result<&'a [u8], DecodeError> {
        let header = self.peek_header()?;
        self.pos = header.end;
        Ok(&self.data[header.start..header.end])
    }

    /// Skips over the next value.
    pub fn skip_value(&mut self) -> Result<(), DecodeError> {
        self.read_encoded_value().map(|_| ())
    }

    /// Checks that all data has been read.
    ///
    /// Returns an error left behind by a nested reader or a trailing data
    /// error if there are values left.
    pub fn check_exhausted(&self) -> Result<(), DecodeError> {
        self.check_pending()?;
        if self.has_data_remaining() {
            Err(DecodeError::TrailingData { pos: self.pos.into() })
        }
        else {
            Ok(())
        }
    }
}

/// # Primitive Values
///
impl<'a> Reader<'a> {
    /// Reads a BOOLEAN value.
    ///
    /// In CER and DER, true must be encoded as 0xFF.
    pub fn read_boolean(
        &mut self, tag: Option<Tag>
    ) -> Result<bool, DecodeError> {
        let header = self.primitive_header(tag.unwrap_or(Tag::BOOLEAN))?;
        let value = match *self.content(&header) {
            [0] => false,
            [0xFF] => true,
            [_] if self.mode.is_restricted() => {
                return Err(DecodeError::non_canonical(
                    header.content_start, "invalid boolean"
                ))
            }
            [_] => true,
            _ => {
                return Err(DecodeError::invalid(
                    header.content_start,
                    "boolean must have exactly one content octet"
                ))
            }
        };
        self.pos = header.end;
        Ok(value)
    }

    /// Reads a NULL value.
    pub fn read_null(&mut self, tag: Option<Tag>) -> Result<(), DecodeError> {
        let header = self.primitive_header(tag.unwrap_or(Tag::NULL))?;
        if header.content_start != header.content_end {
            return Err(DecodeError::invalid(
                header.content_start, "null must be empty"
            ))
        }
        self.pos = header.end;
        Ok(())
    }

    /// Reads an INTEGER value of arbitrary size.
    pub fn read_integer(
        &mut self, tag: Option<Tag>
    ) -> Result<BigInt, DecodeError> {
        self.read_integer_bytes(tag).map(int::to_bigint)
    }

    /// Reads the content octets of an INTEGER value.
    ///
    /// The content is checked to be a valid integer for the mode and is
    /// returned as is, i.e., as big-endian two’s complement octets.
    pub fn read_integer_bytes(
        &mut self, tag: Option<Tag>
    ) -> Result<&'a [u8], DecodeError> {
        let header = self.integer_header(tag.unwrap_or(Tag::INTEGER))?;
        self.pos = header.end;
        Ok(self.content(&header))
    }

    /// Reads an ENUMERATED value.
    pub fn read_enumerated(
        &mut self, tag: Option<Tag>
    ) -> Result<i64, DecodeError> {
        let header = self.integer_header(tag.unwrap_or(Tag::ENUMERATED))?;
        let value = int::to_i128(self.content(&header)).and_then(|value| {
            i64::try_from(value).ok()
        }).ok_or_else(|| {
            DecodeError::invalid(header.content_start, "enumerated too large")
        })?;
        self.pos = header.end;
        Ok(value)
    }

    /// Reads a BIT STRING value.
    ///
    /// Returns the number of unused bits in the last octet and the octets
    /// of the bit string. A constructed bit string is only accepted in BER
    /// and CER and is reassembled.
    pub fn read_bit_string(
        &mut self, tag: Option<Tag>
    ) -> Result<(u8, Cow<'a, [u8]>), DecodeError> {
        let header = self.string_header(tag.unwrap_or(Tag::BIT_STRING))?;
        let (unused, data) = if !header.tag.is_constructed() {
            match self.content(&header).split_first() {
                Some((&unused, data)) => (unused, Cow::Borrowed(data)),
                None => {
                    return Err(DecodeError::invalid(
                        header.content_start, "empty bit string content"
                    ))
                }
            }
        }
        else {
            let segments = self.segments(&header, Tag::BIT_STRING)?;
            let mut unused = 0;
            let mut data = Vec::new();
            for (idx, &(start, content)) in segments.iter().enumerate() {
                let (&seg_unused, seg_data) = match content.split_first() {
                    Some(split) => split,
                    None => {
                        return Err(DecodeError::invalid(
                            start, "empty bit string segment"
                        ))
                    }
                };
                if seg_unused != 0 && idx + 1 < segments.len() {
                    return Err(DecodeError::invalid(
                        start, "unused bits before last segment"
                    ))
                }
                unused = seg_unused;
                data.extend_from_slice(seg_data);
            }
            (unused, Cow::Owned(data))
        };
        bit::check_content(unused, &data, self.mode).map_err(|err| {
            err.at(header.content_start.into())
        })?;
        self.pos = header.end;
        Ok((unused, data))
    }

    /// Reads a BIT STRING value with a named bit list.
    ///
    /// Bits beyond the bits defined by `F` must not be set. In CER and
    /// DER, the bit string must end with a set bit.
    pub fn read_named_bit_list<F: NamedBits>(
        &mut self, tag: Option<Tag>
    ) -> Result<F, DecodeError> {
        let start = self.pos;
        let (unused, data) = self.read_bit_string(tag)?;
        bit::named_bits_from(unused, &data, self.mode).map_err(|err| {
            self.pos = start;
            err.at(start.into())
        })
    }

    /// Reads an OCTET STRING value.
    ///
    /// A constructed octet string is only accepted in BER and CER and is
    /// reassembled.
    pub fn read_octet_string(
        &mut self, tag: Option<Tag>
    ) -> Result<Cow<'a, [u8]>, DecodeError> {
        let (header, content) = self.string_content(
            tag.unwrap_or(Tag::OCTET_STRING)
        )?;
        self.pos = header.end;
        Ok(content)
    }

    /// Opens an OCTET STRING value for reading encoded values from it.
    ///
    /// This only works for octet strings in primitive encoding.
    pub fn open_octet_string(
        &mut self, tag: Option<Tag>
    ) -> Result<Nested<'_, 'a>, DecodeError> {
        let header = self.string_header(tag.unwrap_or(Tag::OCTET_STRING))?;
        if header.tag.is_constructed() {
            return Err(DecodeError::invalid(
                header.start, "cannot open constructed octet string"
            ))
        }
        self.nested(header)
    }

    /// Reads an OBJECT IDENTIFIER value in dotted-decimal form.
    pub fn read_object_identifier(
        &mut self, tag: Option<Tag>
    ) -> Result<String, DecodeError> {
        let header = self.primitive_header(tag.unwrap_or(Tag::OID))?;
        let res = oid::decode_dotted(self.content(&header)).map_err(|err| {
            err.at(header.content_start.into())
        })?;
        self.pos = header.end;
        Ok(res)
    }

    /// Reads a restricted character string.
    ///
    /// The type parameter selects the string type. Its natural tag is
    /// expected if `tag` is `None`.
    pub fn read_character_string<C: CharSet>(
        &mut self, tag: Option<Tag>
    ) -> Result<String, DecodeError> {
        let (header, content) = self.string_content(tag.unwrap_or(C::TAG))?;
        let res = C::decode_slice(&content).map_err(|err| {
            ContentError::from(err).at(header.content_start.into())
        })?.into_owned();
        self.pos = header.end;
        Ok(res)
    }

    /// Reads a UTCTime value.
    ///
    /// Two-digit years are interpreted according to the reader’s options.
    pub fn read_utc_time(
        &mut self, tag: Option<Tag>
    ) -> Result<DateTime<FixedOffset>, DecodeError> {
        let (header, content) = self.string_content(
            tag.unwrap_or(Tag::UTC_TIME)
        )?;
        let res = time::parse_utc_time(
            &content, self.mode, self.options.utc_time_two_digit_year_max()
        ).map_err(|err| err.at(header.content_start.into()))?;
        self.pos = header.end;
        Ok(res)
    }

    /// Reads a GeneralizedTime value.
    pub fn read_generalized_time(
        &mut self, tag: Option<Tag>
    ) -> Result<DateTime<FixedOffset>, DecodeError> {
        let (header, content) = self.string_content(
            tag.unwrap_or(Tag::GENERALIZED_TIME)
        )?;
        let res = time::parse_generalized_time(
            &content, self.mode
        ).map_err(|err| err.at(header.content_start.into()))?;
        self.pos = header.end;
        Ok(res)
    }
}

macro_rules! read_builtin {
    ( $( $name:ident, $ty:ident, $conv:ident; )* ) => { $(
        #[doc = concat!(
            "Reads an INTEGER value into a `", stringify!($ty), "`."
        )]
        pub fn $name(
            &mut self, tag: Option<Tag>
        ) -> Result<$ty, DecodeError> {
            let header = self.integer_header(tag.unwrap_or(Tag::INTEGER))?;
            let value = int::$conv(self.content(&header)).and_then(|v| {
                $ty::try_from(v).ok()
            }).ok_or_else(|| {
                DecodeError::invalid(
                    header.content_start,
                    concat!("integer out of range for ", stringify!($ty))
                )
            })?;
            self.pos = header.end;
            Ok(value)
        }
    )* }
}

/// # Built-in Integers
///
impl Reader<'_> {
    read_builtin! {
        read_i8, i8, to_i128;
        read_i16, i16, to_i128;
        read_i32, i32, to_i128;
        read_i64, i64, to_i128;
        read_i128, i128, to_i128;
        read_u8, u8, to_u128;
        read_u16, u16, to_u128;
        read_u32, u32, to_u128;
        read_u64, u64, to_u128;
        read_u128, u128, to_u128;
    }
}

/// # Constructed Values
///
impl<'a> Reader<'a> {
    /// Opens a SEQUENCE or SEQUENCE OF value.
    ///
    /// With a context specific tag, this is also how the content of an
    /// explicitly tagged value is read.
    pub fn read_sequence(
        &mut self, tag: Option<Tag>
    ) -> Result<Nested<'_, 'a>, DecodeError> {
        let header = self.constructed_header(tag.unwrap_or(Tag::SEQUENCE))?;
        self.nested(header)
    }

    /// Opens a SET value.
    ///
    /// In CER and DER, the elements must be sorted by their tag.
    pub fn read_set(
        &mut self, tag: Option<Tag>
    ) -> Result<Nested<'_, 'a>, DecodeError> {
        let header = self.constructed_header(tag.unwrap_or(Tag::SET))?;
        if self.mode.is_restricted() {
            let mut elements = self.content_reader(&header);
            let mut prev: Option<Tag> = None;
            while elements.has_data_remaining() {
                let start = elements.pos;
                let tag = elements.peek_tag()?.with_constructed(false);
                if prev.is_some_and(|prev| prev > tag) {
                    return Err(DecodeError::non_canonical(
                        start, "set elements not sorted by tag"
                    ))
                }
                elements.skip_value()?;
                prev = Some(tag);
            }
        }
        self.nested(header)
    }

    /// Opens a SET OF value.
    ///
    /// In CER and DER, the elements must be sorted by their encoding.
    pub fn read_set_of(
        &mut self, tag: Option<Tag>
    ) -> Result<Nested<'_, 'a>, DecodeError> {
        let header = self.constructed_header(tag.unwrap_or(Tag::SET))?;
        if self.mode.is_restricted() {
            let mut elements = self.content_reader(&header);
            let mut prev: Option<&[u8]> = None;
            while elements.has_data_remaining() {
                let start = elements.pos;
                let value = elements.read_encoded_value()?;
                if prev.is_some_and(|prev| prev > value) {
                    return Err(DecodeError::non_canonical(
                        start, "set of elements not sorted"
                    ))
                }
                prev = Some(value);
            }
        }
        self.nested(header)
    }

    /// Creates the guard for reading the content of a value.
    fn nested(
        &mut self, header: Header
    ) -> Result<Nested<'_, 'a>, DecodeError> {
        if self.depth >= self.options.max_depth() {
            return Err(DecodeError::malformed_length(
                header.start, "nesting too deep"
            ))
        }
        log::trace!(
            "opened {} at {} with depth {}",
            header.tag, header.start, self.depth + 1
        );
        let inner = self.content_reader(&header);
        Ok(Nested::new(self, inner, header.end))
    }

    /// Returns a reader for the content of a value.
    fn content_reader(&self, header: &Header) -> Reader<'a> {
        Reader {
            data: self.data,
            pos: header.content_start,
            end: header.content_end,
            mode: self.mode,
            options: self.options,
            depth: self.depth + 1,
            pending: None,
        }
    }
}

/// # Internal Helpers
///
impl<'a> Reader<'a> {
    fn check_pending(&self) -> Result<(), DecodeError> {
        match self.pending {
            Some(ref err) => Err(err.clone()),
            None => Ok(())
        }
    }

    /// Parses the header of the next value.
    fn peek_header(&self) -> Result<Header, DecodeError> {
        self.check_pending()?;
        let data = &self.data[..self.end];
        let start = self.pos;
        let (tag, tag_len) = Tag::take_from(
            &data[start..], start.into(), self.mode
        )?;
        let len_pos = start + tag_len;
        let (length, len_len) = Length::take_from(
            &data[len_pos..], len_pos.into(), self.mode
        )?;
        let content_start = len_pos + len_len;
        match length {
            Length::Definite(len) => {
                if tag.is_constructed()
                    && !self.mode.allow_definite_constructed()
                {
                    return Err(DecodeError::non_canonical(
                        start, "definite length constructed value in CER"
                    ))
                }
                let content_end = match content_start.checked_add(len) {
                    Some(end) if end <= self.end => end,
                    _ => return Err(DecodeError::truncated(content_start))
                };
                Ok(Header {
                    tag, start, content_start, content_end,
                    end: content_end
                })
            }
            Length::Indefinite => {
                if !tag.is_constructed() {
                    return Err(DecodeError::malformed_length(
                        len_pos, "indefinite length for primitive value"
                    ))
                }
                let end = scan::indefinite_end(
                    data, content_start, self.mode,
                    self.options.max_depth().saturating_sub(self.depth)
                )?;
                Ok(Header {
                    tag, start, content_start,
                    content_end: end - 2,
                    end
                })
            }
        }
    }

    /// Parses the header of the next value and checks its tag.
    ///
    /// Only the class and number of the tag are compared.
    fn matching_header(&self, expected: Tag) -> Result<Header, DecodeError> {
        let header = self.peek_header()?;
        if !header.tag.matches(expected) {
            return Err(DecodeError::TagMismatch {
                expected, actual: header.tag, pos: header.start.into()
            })
        }
        Ok(header)
    }

    fn primitive_header(&self, expected: Tag) -> Result<Header, DecodeError> {
        let header = self.matching_header(expected)?;
        if header.tag.is_constructed() {
            return Err(DecodeError::invalid(
                header.start, "expected primitive value"
            ))
        }
        Ok(header)
    }

    fn constructed_header(
        &self, expected: Tag
    ) -> Result<Header, DecodeError> {
        let header = self.matching_header(expected)?;
        if !header.tag.is_constructed() {
            return Err(DecodeError::invalid(
                header.start, "expected constructed value"
            ))
        }
        Ok(header)
    }

    /// Returns the header of an integer value after checking its content.
    fn integer_header(&self, expected: Tag) -> Result<Header, DecodeError> {
        let header = self.primitive_header(expected)?;
        int::check_content(self.content(&header), self.mode).map_err(|err| {
            err.at(header.content_start.into())
        })?;
        Ok(header)
    }

    /// Returns the header of a value of a string type.
    ///
    /// Checks that the chosen encoding is allowed in the mode.
    fn string_header(&self, expected: Tag) -> Result<Header, DecodeError> {
        let header = self.matching_header(expected)?;
        if header.tag.is_constructed() {
            if !self.mode.allow_constructed_strings() {
                return Err(DecodeError::non_canonical(
                    header.start, "constructed string in DER"
                ))
            }
        }
        else if self.mode == Mode::Cer
            && header.content_len() > Mode::CER_SEGMENT_LEN
        {
            return Err(DecodeError::non_canonical(
                header.start, "unsegmented long string in CER"
            ))
        }
        Ok(header)
    }

    /// Returns the header and content octets of a string type value.
    fn string_content(
        &self, expected: Tag
    ) -> Result<(Header, Cow<'a, [u8]>), DecodeError> {
        let header = self.string_header(expected)?;
        if !header.tag.is_constructed() {
            return Ok((header, Cow::Borrowed(self.content(&header))))
        }
        let segments = self.segments(&header, Tag::OCTET_STRING)?;
        let mut res = Vec::new();
        for (_, content) in segments {
            res.extend_from_slice(content)
        }
        Ok((header, Cow::Owned(res)))
    }

    /// Returns the segments of a constructed string.
    ///
    /// Each segment must be a primitive value with the tag `expected`. The
    /// start of the segment content is returned along with the content.
    /// In CER, all segments but the last must have exactly 1000 octets.
    fn segments(
        &self, header: &Header, expected: Tag
    ) -> Result<Vec<(usize, &'a [u8])>, DecodeError> {
        let mut reader = self.content_reader(header);
        let mut res = Vec::new();
        while reader.has_data_remaining() {
            let segment = reader.matching_header(expected)?;
            if segment.tag.is_constructed() {
                return Err(DecodeError::invalid(
                    segment.start, "nested constructed string"
                ))
            }
            res.push((segment.content_start, reader.content(&segment)));
            reader.pos = segment.end;
        }
        if self.mode == Mode::Cer {
            let valid = match res.split_last() {
                Some((&(_, last), head)) => {
                    !head.is_empty()
                    && head.iter().all(|(_, segment)| {
                        segment.len() == Mode::CER_SEGMENT_LEN
                    })
                    && !last.is_empty()
                    && last.len() <= Mode::CER_SEGMENT_LEN
                }
                None => false
            };
            if !valid {
                return Err(DecodeError::non_canonical(
                    header.start, "invalid string segments in CER"
                ))
            }
        }
        Ok(res)
    }

    fn content(&self, header: &Header) -> &'a [u8] {
        &self.data[header.content_start..header.content_end]
    }

    pub(super) fn set_pending(&mut self, err: DecodeError) {
        if self.pending.is_none() {
            self.pending = Some(err)
        }
    }

    pub(super) fn take_pending(&mut self) -> Option<DecodeError> {
        self.pending.take()
    }

    pub(super) fn set_pos(&mut self, pos: usize) {
        self.pos = pos
    }
}


//------------ Header --------------------------------------------------------

/// The parsed header of a value.
///
/// All fields are indexes into the reader’s data.
#[derive(Clone, Copy, Debug)]
struct Header {
    /// The tag of the value.
    tag: Tag,

    /// The start of the identifier octets.
    start: usize,

    /// The start of the content octets.
    content_start: usize,

    /// The end of the content octets.
    ///
    /// For indefinite length values this excludes the end-of-contents.
    content_end: usize,

    /// The end of the complete value.
    end: usize,
}

impl Header {
    fn content_len(&self) -> usize {
        self.content_end - self.content_start
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::decode::ErrorKind;

    fn kind<T>(res: Result<T, DecodeError>) -> ErrorKind {
        match res {
            Ok(_) => panic!("unexpected success"),
            Err(err) => err.kind()
        }
    }

    #[test]
    fn boolean() {
        let mut reader = Reader::new(b"\x01\x01\xff\x01\x01\x00", Mode::Der);
        assert_eq!(reader.read_boolean(None), Ok(true));
        assert_eq!(reader.read_boolean(None), Ok(false));
        assert!(reader.check_exhausted().is_ok());

        let data = b"\x01\x01\x01";
        assert_eq!(Reader::new(data, Mode::Ber).read_boolean(None), Ok(true));
        assert_eq!(
            kind(Reader::new(data, Mode::Der).read_boolean(None)),
            ErrorKind::NonCanonical
        );
        assert_eq!(
            kind(
                Reader::new(b"\x01\x02\xff\xff", Mode::Ber)
                    .read_boolean(None)
            ),
            ErrorKind::InvalidValue
        );
    }

    #[test]
    fn tag_mismatch() {
        let mut reader = Reader::new(b"\x02\x01\x05", Mode::Der);
        assert_eq!(
            reader.read_boolean(None),
            Err(DecodeError::TagMismatch {
                expected: Tag::BOOLEAN, actual: Tag::INTEGER,
                pos: Pos::from(0)
            })
        );
        assert_eq!(kind(reader.read_sequence(None)), ErrorKind::TagMismatch);
        assert_eq!(
            kind(reader.read_i8(Some(Tag::ctx(2)))), ErrorKind::TagMismatch
        );
        assert_eq!(reader.pos().index(), 0);
        assert_eq!(reader.read_i8(None), Ok(5));
    }

    #[test]
    fn integers() {
        let data = b"\x02\x01\x80\x02\x02\x00\x80\x02\x09\x00\xff\xff\xff\
                     \xff\xff\xff\xff\xff";
        let mut reader = Reader::new(data, Mode::Der);
        assert_eq!(reader.read_i8(None), Ok(-128));
        assert_eq!(kind(reader.read_i8(None)), ErrorKind::InvalidValue);
        assert_eq!(reader.read_u8(None), Ok(128));
        assert_eq!(kind(reader.read_i64(None)), ErrorKind::InvalidValue);
        assert_eq!(reader.read_u64(None), Ok(u64::MAX));
        assert!(!reader.has_data_remaining());

        let mut reader = Reader::new(data, Mode::Der);
        assert_eq!(kind(reader.read_u8(None)), ErrorKind::InvalidValue);
        assert_eq!(reader.read_integer(None), Ok(BigInt::from(-128)));
        assert_eq!(reader.read_integer_bytes(None), Ok(&b"\x00\x80"[..]));
        assert_eq!(
            reader.read_integer(None), Ok(BigInt::from(u64::MAX))
        );

        let data = b"\x02\x02\x00\x05";
        assert_eq!(Reader::new(data, Mode::Ber).read_u32(None), Ok(5));
        assert_eq!(
            kind(Reader::new(data, Mode::Der).read_u32(None)),
            ErrorKind::NonCanonical
        );
        assert_eq!(
            kind(Reader::new(b"\x02\x00", Mode::Ber).read_integer(None)),
            ErrorKind::InvalidValue
        );

        let mut reader = Reader::new(b"\x0a\x01\x02", Mode::Der);
        assert_eq!(reader.read_enumerated(None), Ok(2));
    }

    #[test]
    fn null_and_oid() {
        let mut reader = Reader::new(
            b"\x05\x00\x06\x03\x55\x04\x03\x05\x01\x00", Mode::Der
        );
        assert_eq!(reader.read_null(None), Ok(()));
        assert_eq!(
            reader.read_object_identifier(None).as_deref(), Ok("2.5.4.3")
        );
        assert_eq!(kind(reader.read_null(None)), ErrorKind::InvalidValue);

        assert_eq!(
            kind(
                Reader::new(b"\x06\x02\x2a\x86", Mode::Ber)
                    .read_object_identifier(None)
            ),
            ErrorKind::InvalidValue
        );
    }

    #[test]
    fn bit_strings() {
        let mut reader = Reader::new(b"\x03\x03\x04\xab\xc0", Mode::Der);
        assert_eq!(
            reader.read_bit_string(None),
            Ok((4, Cow::Borrowed(&b"\xab\xc0"[..])))
        );
        assert_eq!(
            kind(Reader::new(b"\x03\x02\x04\xab", Mode::Der)
                .read_bit_string(None)),
            ErrorKind::NonCanonical
        );
        assert!(
            Reader::new(b"\x03\x02\x04\xab", Mode::Ber)
                .read_bit_string(None).is_ok()
        );
        assert_eq!(
            kind(Reader::new(b"\x03\x00", Mode::Ber).read_bit_string(None)),
            ErrorKind::InvalidValue
        );
        assert_eq!(
            kind(Reader::new(b"\x03\x01\x01", Mode::Ber)
                .read_bit_string(None)),
            ErrorKind::InvalidValue
        );

        // Constructed in BER.
        let data = b"\x23\x0a\x03\x02\x00\x0f\x03\x04\x02\xab\xcd\xe0";
        assert_eq!(
            Reader::new(data, Mode::Ber).read_bit_string(None),
            Ok((2, Cow::Owned(b"\x0f\xab\xcd\xe0".to_vec())))
        );
        assert_eq!(
            kind(Reader::new(data, Mode::Der).read_bit_string(None)),
            ErrorKind::NonCanonical
        );
        let data = b"\x23\x08\x03\x02\x01\x0e\x03\x02\x00\xab";
        assert_eq!(
            kind(Reader::new(data, Mode::Ber).read_bit_string(None)),
            ErrorKind::InvalidValue
        );
    }

    #[test]
    fn named_bits() {
        #[derive(Debug, PartialEq)]
        struct KeyUsage(u64);

        impl NamedBits for KeyUsage {
            const BIT_COUNT: usize = 9;

            fn to_bits(&self) -> u64 {
                self.0
            }

            fn from_bits(bits: u64) -> Self {
                KeyUsage(bits)
            }
        }

        let mut reader = Reader::new(
            b"\x03\x02\x05\xa0\x03\x01\x00\x03\x03\x06\x00\x40", Mode::Der
        );
        assert_eq!(reader.read_named_bit_list(None), Ok(KeyUsage(0b101)));
        assert_eq!(reader.read_named_bit_list(None), Ok(KeyUsage(0)));
        assert_eq!(
            kind(reader.read_named_bit_list::<KeyUsage>(None)),
            ErrorKind::InvalidValue
        );
        assert_eq!(reader.pos().index(), 7);
    }

    #[test]
    fn octet_strings() {
        let data = b"\x24\x80\x04\x02ab\x04\x01c\x00\x00";
        let mut reader = Reader::new(data, Mode::Ber);
        assert_eq!(
            reader.read_octet_string(None),
            Ok(Cow::Owned(b"abc".to_vec()))
        );
        assert!(reader.check_exhausted().is_ok());
        assert_eq!(
            kind(Reader::new(data, Mode::Der).read_octet_string(None)),
            ErrorKind::NonCanonical
        );
        // CER needs 1000 octet segments.
        assert_eq!(
            kind(Reader::new(data, Mode::Cer).read_octet_string(None)),
            ErrorKind::NonCanonical
        );
        // Nested constructed segments aren’t supported.
        assert_eq!(
            kind(
                Reader::new(b"\x24\x04\x24\x02\x04\x00", Mode::Ber)
                    .read_octet_string(None)
            ),
            ErrorKind::InvalidValue
        );
    }

    #[test]
    fn cer_strings() {
        let mut data = b"\x24\x80\x04\x82\x03\xe8".to_vec();
        data.extend_from_slice(&[b'x'; 1000]);
        data.extend_from_slice(b"\x04\x01y\x00\x00");
        let content = Reader::new(&data, Mode::Cer)
            .read_octet_string(None).unwrap();
        assert_eq!(content.len(), 1001);
        assert_eq!(content[1000], b'y');

        let mut data = b"\x04\x82\x03\xe9".to_vec();
        data.extend_from_slice(&[b'x'; 1001]);
        assert_eq!(
            kind(Reader::new(&data, Mode::Cer).read_octet_string(None)),
            ErrorKind::NonCanonical
        );
        assert!(
            Reader::new(&data, Mode::Der).read_octet_string(None).is_ok()
        );
    }

    #[test]
    fn character_strings() {
        use crate::string::{BmpString, PrintableString, Utf8String};

        let mut reader = Reader::new(
            b"\x13\x02US\x0c\x02\xc3\xbc\x1e\x02\x00A\x13\x01*", Mode::Der
        );
        assert_eq!(
            reader.read_character_string::<PrintableString>(None).as_deref(),
            Ok("US")
        );
        assert_eq!(
            reader.read_character_string::<Utf8String>(None).as_deref(),
            Ok("ü")
        );
        assert_eq!(
            reader.read_character_string::<BmpString>(None).as_deref(),
            Ok("A")
        );
        assert_eq!(
            kind(reader.read_character_string::<PrintableString>(None)),
            ErrorKind::InvalidValue
        );
    }

    #[test]
    fn times() {
        let mut reader = Reader::new(
            b"\x17\x0d491231235959Z\x17\x0d500101000000Z\
              \x18\x0f20191215190210Z",
            Mode::Der
        );
        assert_eq!(
            reader.read_utc_time(None),
            Ok(Utc.with_ymd_and_hms(2049, 12, 31, 23, 59, 59).unwrap()
                .fixed_offset())
        );
        assert_eq!(
            reader.read_utc_time(None),
            Ok(Utc.with_ymd_and_hms(1950, 1, 1, 0, 0, 0).unwrap()
                .fixed_offset())
        );
        assert_eq!(
            reader.read_generalized_time(None),
            Ok(Utc.with_ymd_and_hms(2019, 12, 15, 19, 2, 10).unwrap()
                .fixed_offset())
        );

        let options = ReaderOptions::default()
            .with_utc_time_two_digit_year_max(2050);
        let mut reader = Reader::with_options(
            b"\x17\x0d500101000000Z", Mode::Der, options
        );
        assert_eq!(
            reader.read_utc_time(None),
            Ok(Utc.with_ymd_and_hms(2050, 1, 1, 0, 0, 0).unwrap()
                .fixed_offset())
        );

        assert_eq!(
            kind(
                Reader::new(b"\x17\x0b4912312359Z", Mode::Der)
                    .read_utc_time(None)
            ),
            ErrorKind::NonCanonical
        );
    }

    #[test]
    fn sequences() {
        let data = b"\x30\x08\x02\x01\x01\xa0\x03\x01\x01\xff\x05\x00";
        let mut reader = Reader::new(data, Mode::Der);
        {
            let mut seq = reader.read_sequence(None).unwrap();
            assert_eq!(seq.read_u8(None), Ok(1));
            {
                let mut tagged = seq.read_sequence(
                    Some(Tag::ctx(0))
                ).unwrap();
                assert_eq!(tagged.read_boolean(None), Ok(true));
                tagged.finish().unwrap();
            }
            assert!(!seq.has_data_remaining());
            seq.finish().unwrap();
        }
        assert_eq!(reader.read_null(None), Ok(()));
        assert!(reader.check_exhausted().is_ok());
    }

    #[test]
    fn truncated() {
        let data = b"\x30\x06\x02\x01\x01\x02\x05\x01";
        let mut reader = Reader::new(data, Mode::Der);
        let mut seq = reader.read_sequence(None).unwrap();
        assert_eq!(seq.read_u8(None), Ok(1));
        assert_eq!(
            seq.read_u8(None),
            Err(DecodeError::Truncated { pos: Pos::from(7) })
        );

        assert_eq!(
            Reader::new(b"\x30\x06\x02\x01", Mode::Der).read_sequence(None)
                .err(),
            Some(DecodeError::Truncated { pos: Pos::from(2) })
        );
        assert_eq!(
            kind(Reader::new(b"", Mode::Der).read_null(None)),
            ErrorKind::Truncated
        );
    }

    #[test]
    fn unterminated_tag() {
        let mut reader = Reader::new(b"\x30\x03\x1f\x81\x82", Mode::Ber);
        let mut seq = reader.read_sequence(None).unwrap();
        assert_eq!(
            seq.peek_tag(),
            Err(DecodeError::MalformedTag {
                pos: Pos::from(5), msg: "unterminated tag number"
            })
        );
        assert_eq!(kind(seq.skip_value()), ErrorKind::MalformedTag);

        // The identifier may not continue past the end of its scope.
        let data = b"\x30\x03\x1f\x81\x82\x01\x05\x00";
        let mut reader = Reader::new(data, Mode::Ber);
        let mut seq = reader.read_sequence(None).unwrap();
        assert_eq!(kind(seq.peek_tag()), ErrorKind::MalformedTag);
    }

    #[test]
    fn trailing_data() {
        let data = b"\x30\x06\x02\x01\x01\x02\x01\x02\x05\x00";
        let mut reader = Reader::new(data, Mode::Der);
        {
            let mut seq = reader.read_sequence(None).unwrap();
            assert_eq!(seq.read_u8(None), Ok(1));
            assert_eq!(
                seq.check_exhausted(),
                Err(DecodeError::TrailingData { pos: Pos::from(5) })
            );
        }
        assert_eq!(
            reader.read_null(None),
            Err(DecodeError::TrailingData { pos: Pos::from(5) })
        );

        let mut reader = Reader::new(data, Mode::Der);
        {
            let mut seq = reader.read_sequence(None).unwrap();
            assert_eq!(seq.read_u8(None), Ok(1));
            seq.skip_rest().unwrap();
        }
        assert_eq!(reader.read_null(None), Ok(()));
        assert_eq!(reader.check_exhausted(), Ok(()));

        let mut reader = Reader::new(data, Mode::Der);
        reader.skip_value().unwrap();
        assert_eq!(
            reader.check_exhausted(),
            Err(DecodeError::TrailingData { pos: Pos::from(8) })
        );
    }

    #[test]
    fn indefinite() {
        let data = b"\x30\x80\x30\x80\x02\x01\x07\x00\x00\x04\x01\x41\
                     \x00\x00\x05\x00";
        let mut reader = Reader::new(data, Mode::Ber);
        {
            let mut seq = reader.read_sequence(None).unwrap();
            {
                let mut inner = seq.read_sequence(None).unwrap();
                assert_eq!(inner.read_u8(None), Ok(7));
                assert!(!inner.has_data_remaining());
            }
            assert_eq!(seq.read_octet_string(None).as_deref(), Ok(&b"A"[..]));
            assert!(!seq.has_data_remaining());
        }
        assert_eq!(reader.read_null(None), Ok(()));
        assert!(reader.check_exhausted().is_ok());

        assert_eq!(
            kind(Reader::new(data, Mode::Der).read_sequence(None)),
            ErrorKind::NonCanonical
        );
        assert_eq!(
            kind(Reader::new(b"\x04\x80\x00\x00", Mode::Ber).skip_value()),
            ErrorKind::MalformedLength
        );
    }

    #[test]
    fn cer_constructed() {
        let mut reader = Reader::new(b"\x30\x80\x05\x00\x00\x00", Mode::Cer);
        {
            let mut seq = reader.read_sequence(None).unwrap();
            assert_eq!(seq.read_null(None), Ok(()));
        }
        assert!(reader.check_exhausted().is_ok());
        assert_eq!(
            kind(Reader::new(b"\x30\x02\x05\x00", Mode::Cer).skip_value()),
            ErrorKind::NonCanonical
        );
    }

    #[test]
    fn depth_limit() {
        let data = b"\x30\x06\x30\x04\x30\x02\x05\x00";
        let options = ReaderOptions::default().with_max_depth(2);
        let mut reader = Reader::with_options(data, Mode::Der, options);
        let mut first = reader.read_sequence(None).unwrap();
        let mut second = first.read_sequence(None).unwrap();
        assert_eq!(
            kind(second.read_sequence(None)), ErrorKind::MalformedLength
        );
        assert!(second.skip_value().is_ok());

        let data = b"\x30\x80\x30\x80\x30\x80\x00\x00\x00\x00\x00\x00";
        let mut reader = Reader::with_options(data, Mode::Ber, options);
        assert_eq!(kind(reader.skip_value()), ErrorKind::MalformedLength);
    }

    #[test]
    fn sets() {
        let data = b"\x31\x06\x04\x01\x02\x04\x01\x01";
        assert!(Reader::new(data, Mode::Ber).read_set_of(None).is_ok());
        assert_eq!(
            kind(Reader::new(data, Mode::Der).read_set_of(None)),
            ErrorKind::NonCanonical
        );
        let data = b"\x31\x06\x04\x01\x01\x04\x01\x02";
        assert!(Reader::new(data, Mode::Der).read_set_of(None).is_ok());

        let data = b"\x31\x04\x81\x00\x80\x00";
        assert_eq!(
            kind(Reader::new(data, Mode::Der).read_set(None)),
            ErrorKind::NonCanonical
        );
        let data = b"\x31\x04\x80\x00\x81\x00";
        let mut reader = Reader::new(data, Mode::Der);
        let mut set = reader.read_set(None).unwrap();
        assert_eq!(set.read_null(Some(Tag::ctx(0))), Ok(()));
        assert_eq!(set.read_null(Some(Tag::ctx(1))), Ok(()));
    }

    #[test]
    fn encoded_values() {
        let data = b"\x30\x03\x02\x01\x01\x05\x00";
        let mut reader = Reader::new(data, Mode::Der);
        assert_eq!(reader.peek_tag(), Ok(Tag::SEQUENCE));
        assert_eq!(reader.peek_encoded_value(), Ok(&data[..5]));
        assert_eq!(reader.read_encoded_value(), Ok(&data[..5]));
        assert_eq!(reader.peek_tag(), Ok(Tag::NULL));
        reader.skip_value().unwrap();
        assert!(!reader.has_data_remaining());
        assert_eq!(kind(reader.peek_tag()), ErrorKind::Truncated);
    }

    #[test]
    fn open_octet_string() {
        let data = b"\x04\x05\x30\x03\x02\x01\x09\x05\x00";
        let mut reader = Reader::new(data, Mode::Der);
        {
            let mut ostr = reader.open_octet_string(None).unwrap();
            let mut seq = ostr.read_sequence(None).unwrap();
            assert_eq!(seq.read_u8(None), Ok(9));
        }
        assert_eq!(reader.read_null(None), Ok(()));

        assert_eq!(
            kind(
                Reader::new(b"\x24\x80\x04\x00\x00\x00", Mode::Ber)
                    .open_octet_string(None)
            ),
            ErrorKind::InvalidValue
        );
    }
}
