//! The writer.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use num_bigint::BigInt;
use smallvec::SmallVec;
use crate::{int, oid, time};
use crate::decode::Reader;
use crate::length::Length;
use crate::mode::Mode;
use crate::string::{CharSet, NamedBits};
use crate::string::bit;
use crate::tag::Tag;
use super::error::EncodeError;
use super::scope::Scope;


//------------ Writer --------------------------------------------------------

/// A writer for BER, CER, or DER encoded data.
///
/// The writer appends encoded values to an internal buffer. Constructed
/// values are opened with one of the `push_*` methods and stay open for as
/// long as the returned [`Scope`] lives. The content of the constructed
/// value is then written through that scope.
///
/// How values are encoded depends on the mode given when creating the
/// writer:
///
/// * In BER and DER mode, constructed values use definite length. The
///   header is added in front of the content once the scope is closed.
/// * In CER mode, constructed values use indefinite length. Octet strings,
///   bit strings, and character strings with more than 1000 content octets
///   are broken up into segments.
/// * In CER and DER mode, the elements of a SET OF are sorted by their
///   encoding and the elements of a SET by their tag.
///
/// # Example
///
/// ```
/// use berwire::{Mode, Tag};
/// use berwire::encode::Writer;
///
/// let mut writer = Writer::new(Mode::Der);
/// {
///     let mut seq = writer.push_sequence(None);
///     seq.write_u64(None, 2);
///     seq.write_boolean(Some(Tag::ctx(0)), true);
/// }
/// assert_eq!(
///     writer.encode().as_ref(),
///     b"\x30\x06\x02\x01\x02\x80\x01\xff"
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Writer {
    /// The encoding rules.
    mode: Mode,

    /// The encoded data so far.
    buf: Vec<u8>,

    /// The currently open constructed values, innermost last.
    scopes: SmallVec<[Pending; 4]>,
}

/// # Creation and Output
///
impl Writer {
    /// Creates a new, empty writer for the given mode.
    pub fn new(mode: Mode) -> Self {
        Writer { mode, buf: Vec::new(), scopes: SmallVec::new() }
    }

    /// Returns the mode of the writer.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the encoded data and resets the writer.
    ///
    /// The writer can be reused afterwards.
    ///
    /// # Panics
    ///
    /// The method panics if there are still open scopes.
    pub fn encode(&mut self) -> Bytes {
        self.assert_closed();
        log::trace!("encoded {} octets", self.buf.len());
        Bytes::from(std::mem::take(&mut self.buf))
    }

    /// Returns the length of the encoded data.
    ///
    /// # Panics
    ///
    /// The method panics if there are still open scopes.
    pub fn encoded_len(&self) -> usize {
        self.assert_closed();
        self.buf.len()
    }

    /// Returns whether the encoded data equals `other`.
    ///
    /// # Panics
    ///
    /// The method panics if there are still open scopes.
    pub fn encoded_value_equals(&self, other: &[u8]) -> bool {
        self.assert_closed();
        self.buf == other
    }

    /// Appends the encoded data to `target` without resetting the writer.
    ///
    /// # Panics
    ///
    /// The method panics if there are still open scopes.
    pub fn copy_encoded_value_to(&self, target: &mut Vec<u8>) {
        self.assert_closed();
        target.extend_from_slice(&self.buf)
    }

    fn assert_closed(&self) {
        assert!(
            self.scopes.is_empty(),
            "{} scopes still open", self.scopes.len()
        );
    }
}

/// # Primitive Values
///
impl Writer {
    /// Writes a BOOLEAN value.
    ///
    /// True is always encoded as 0xFF, false as 0x00.
    pub fn write_boolean(&mut self, tag: Option<Tag>, value: bool) {
        let tag = tag.unwrap_or(Tag::BOOLEAN);
        self.begin_value(tag);
        self.put_primitive(tag, if value { b"\xFF" } else { b"\x00" })
    }

    /// Writes a NULL value.
    pub fn write_null(&mut self, tag: Option<Tag>) {
        let tag = tag.unwrap_or(Tag::NULL);
        self.begin_value(tag);
        self.put_primitive(tag, b"")
    }

    /// Writes an INTEGER value of arbitrary size.
    pub fn write_integer(&mut self, tag: Option<Tag>, value: &BigInt) {
        self.write_integer_content(tag, &int::bigint_content(value))
    }

    /// Writes an INTEGER value from an `i64`.
    pub fn write_i64(&mut self, tag: Option<Tag>, value: i64) {
        self.write_i128(tag, value.into())
    }

    /// Writes an INTEGER value from an `i128`.
    pub fn write_i128(&mut self, tag: Option<Tag>, value: i128) {
        self.write_integer_content(tag, &int::i128_content(value))
    }

    /// Writes an INTEGER value from a `u64`.
    pub fn write_u64(&mut self, tag: Option<Tag>, value: u64) {
        self.write_u128(tag, value.into())
    }

    /// Writes an INTEGER value from a `u128`.
    pub fn write_u128(&mut self, tag: Option<Tag>, value: u128) {
        self.write_integer_content(tag, &int::u128_content(value))
    }

    /// Writes an INTEGER value from its two’s complement octets.
    ///
    /// The octets must already be in their minimal form.
    pub fn write_integer_bytes(
        &mut self, tag: Option<Tag>, content: &[u8]
    ) -> Result<(), EncodeError> {
        if content.is_empty() {
            return Err(EncodeError::invalid("empty integer"))
        }
        if int::trim_signed(content).len() != content.len() {
            return Err(EncodeError::invalid("integer not in shortest form"))
        }
        self.write_integer_content(tag, content);
        Ok(())
    }

    /// Writes an INTEGER value from a big-endian unsigned magnitude.
    ///
    /// Leading zero octets are dropped and a zero octet is added if
    /// necessary to keep the value positive.
    pub fn write_unsigned_integer_bytes(
        &mut self, tag: Option<Tag>, magnitude: &[u8]
    ) {
        self.write_integer_content(tag, &int::unsigned_content(magnitude))
    }

    /// Writes an ENUMERATED value.
    pub fn write_enumerated(&mut self, tag: Option<Tag>, value: i64) {
        let tag = tag.unwrap_or(Tag::ENUMERATED);
        self.begin_value(tag);
        self.put_primitive(tag, &int::i128_content(value.into()))
    }

    fn write_integer_content(&mut self, tag: Option<Tag>, content: &[u8]) {
        let tag = tag.unwrap_or(Tag::INTEGER);
        self.begin_value(tag);
        self.put_primitive(tag, content)
    }

    /// Writes a BIT STRING value.
    ///
    /// The number of unused bits in the last octet must be between 0 and 7
    /// and must be 0 if `data` is empty. If the unused bits aren’t zero,
    /// they are cleared.
    pub fn write_bit_string(
        &mut self, tag: Option<Tag>, unused: u8, data: &[u8]
    ) -> Result<(), EncodeError> {
        if unused > 7 {
            return Err(EncodeError::invalid(format!(
                "{unused} unused bits in bit string"
            )))
        }
        if data.is_empty() && unused != 0 {
            return Err(EncodeError::invalid(
                "unused bits in empty bit string"
            ))
        }
        let tag = tag.unwrap_or(Tag::BIT_STRING);
        self.begin_value(tag);
        self.put_bit_string(tag, unused, &bit::mask_unused(unused, data));
        Ok(())
    }

    /// Writes a set of named bits as a BIT STRING value.
    ///
    /// Trailing zero bits are removed. If no bit is set, the result is an
    /// empty bit string.
    pub fn write_named_bit_list<F: NamedBits>(
        &mut self, tag: Option<Tag>, flags: &F
    ) {
        let (unused, data) = bit::named_bits_content(flags.to_bits());
        let tag = tag.unwrap_or(Tag::BIT_STRING);
        self.begin_value(tag);
        self.put_bit_string(tag, unused, &data)
    }

    /// Writes an OCTET STRING value.
    pub fn write_octet_string(&mut self, tag: Option<Tag>, data: &[u8]) {
        let tag = tag.unwrap_or(Tag::OCTET_STRING);
        self.begin_value(tag);
        self.put_string(tag, data)
    }

    /// Writes an OBJECT IDENTIFIER value given in dotted-decimal form.
    pub fn write_object_identifier(
        &mut self, tag: Option<Tag>, dotted: &str
    ) -> Result<(), EncodeError> {
        let content = oid::encode_dotted(dotted).map_err(|msg| {
            EncodeError::InvalidOid { oid: dotted.into(), msg }
        })?;
        let tag = tag.unwrap_or(Tag::OID);
        self.begin_value(tag);
        self.put_primitive(tag, &content);
        Ok(())
    }

    /// Writes a restricted character string.
    ///
    /// The type parameter selects the string type. Its natural tag is used
    /// if `tag` is `None`.
    pub fn write_character_string<C: CharSet>(
        &mut self, tag: Option<Tag>, value: &str
    ) -> Result<(), EncodeError> {
        let content = C::encode_str(value)?;
        let tag = tag.unwrap_or(C::TAG);
        self.begin_value(tag);
        self.put_string(tag, &content);
        Ok(())
    }

    /// Writes a UTCTime value.
    ///
    /// The time is converted to UTC and must be between the years 1950 and
    /// 2049. Fractions of seconds are dropped.
    pub fn write_utc_time<Tz: TimeZone>(
        &mut self, tag: Option<Tag>, value: &DateTime<Tz>
    ) -> Result<(), EncodeError> {
        self.write_utc_time_with_max_year(
            tag, value, time::UTC_TIME_TWO_DIGIT_YEAR_MAX
        )
    }

    /// Writes a UTCTime value with a different two-digit year window.
    ///
    /// The year of the time must be within the one hundred years ending
    /// with `two_digit_year_max`.
    pub fn write_utc_time_with_max_year<Tz: TimeZone>(
        &mut self, tag: Option<Tag>, value: &DateTime<Tz>,
        two_digit_year_max: i32,
    ) -> Result<(), EncodeError> {
        let content = time::utc_time_string(
            &value.with_timezone(&Utc), two_digit_year_max
        ).map_err(EncodeError::InvalidValue)?;
        let tag = tag.unwrap_or(Tag::UTC_TIME);
        self.begin_value(tag);
        self.put_string(tag, content.as_bytes());
        Ok(())
    }

    /// Writes a GeneralizedTime value.
    ///
    /// The time is converted to UTC. Fractional seconds are included
    /// without trailing zeros unless `omit_fractional_seconds` is true.
    pub fn write_generalized_time<Tz: TimeZone>(
        &mut self, tag: Option<Tag>, value: &DateTime<Tz>,
        omit_fractional_seconds: bool,
    ) -> Result<(), EncodeError> {
        let content = time::generalized_time_string(
            &value.with_timezone(&Utc), omit_fractional_seconds
        ).map_err(EncodeError::InvalidValue)?;
        let tag = tag.unwrap_or(Tag::GENERALIZED_TIME);
        self.begin_value(tag);
        self.put_string(tag, content.as_bytes());
        Ok(())
    }

    /// Writes a complete, already encoded value.
    ///
    /// The data must contain exactly one value that is correctly encoded
    /// for the writer’s mode.
    pub fn write_encoded_value(
        &mut self, value: &[u8]
    ) -> Result<(), EncodeError> {
        let mut reader = Reader::new(value, self.mode);
        let tag = reader.peek_tag().map_err(|err| {
            EncodeError::invalid(err.to_string())
        })?;
        reader.skip_value().and_then(|_| {
            reader.check_exhausted()
        }).map_err(|err| EncodeError::invalid(err.to_string()))?;
        self.begin_value(tag);
        self.buf.extend_from_slice(value);
        Ok(())
    }
}

/// # Constructed Values
///
impl Writer {
    /// Opens a SEQUENCE or SEQUENCE OF value.
    ///
    /// With a context specific tag, this is also how an explicitly tagged
    /// value is written.
    pub fn push_sequence(&mut self, tag: Option<Tag>) -> Scope<'_> {
        self.push(tag.unwrap_or(Tag::SEQUENCE), ScopeKind::Sequence)
    }

    /// Opens a SET value.
    ///
    /// In CER and DER mode, the elements are sorted by their tag.
    pub fn push_set(&mut self, tag: Option<Tag>) -> Scope<'_> {
        self.push(tag.unwrap_or(Tag::SET), ScopeKind::Set)
    }

    /// Opens a SET OF value.
    ///
    /// In CER and DER mode, the elements are sorted by their encoding.
    pub fn push_set_of(&mut self, tag: Option<Tag>) -> Scope<'_> {
        self.push(tag.unwrap_or(Tag::SET), ScopeKind::SetOf)
    }

    /// Opens an OCTET STRING value whose content is written as values.
    ///
    /// This is used for wrapping an encoding in an octet string.
    pub fn push_octet_string(&mut self, tag: Option<Tag>) -> Scope<'_> {
        self.push(tag.unwrap_or(Tag::OCTET_STRING), ScopeKind::OctetString)
    }

    /// Opens a BIT STRING value whose content is written as values.
    ///
    /// The bit string will have no unused bits.
    pub fn push_bit_string(&mut self, tag: Option<Tag>) -> Scope<'_> {
        self.push(tag.unwrap_or(Tag::BIT_STRING), ScopeKind::BitString)
    }

    /// Opens a constructed value with indefinite length.
    ///
    /// # Panics
    ///
    /// Indefinite length can only be requested explicitly in BER mode.
    /// The method panics otherwise.
    pub fn push_indefinite_sequence(
        &mut self, tag: Option<Tag>
    ) -> Scope<'_> {
        assert_eq!(
            self.mode, Mode::Ber,
            "explicit indefinite length is only available in BER"
        );
        self.push(tag.unwrap_or(Tag::SEQUENCE), ScopeKind::Indefinite)
    }

    fn push(&mut self, tag: Tag, kind: ScopeKind) -> Scope<'_> {
        let tag = tag.with_constructed(true);
        self.begin_value(tag);
        let indefinite = match kind {
            ScopeKind::Indefinite => true,
            ScopeKind::OctetString | ScopeKind::BitString => false,
            _ => self.mode == Mode::Cer,
        };
        if indefinite {
            self.put_header(tag, Length::Indefinite);
        }
        self.scopes.push(Pending {
            tag, kind, indefinite,
            start: self.buf.len(),
            children: Vec::new(),
        });
        log::trace!("opened {tag} at depth {}", self.scopes.len());
        Scope::new(self, self.scopes.len())
    }

    /// Closes the innermost scope.
    ///
    /// This is called when a [`Scope`] is dropped.
    pub(super) fn close_scope(&mut self, depth: usize) {
        assert_eq!(self.scopes.len(), depth, "scopes closed out of order");
        let scope = match self.scopes.pop() {
            Some(scope) => scope,
            None => return
        };
        match scope.kind {
            ScopeKind::OctetString => {
                let content = self.buf.split_off(scope.start);
                self.put_string(
                    scope.tag.with_constructed(false), &content
                );
            }
            ScopeKind::BitString => {
                let content = self.buf.split_off(scope.start);
                self.put_bit_string(
                    scope.tag.with_constructed(false), 0, &content
                );
            }
            _ => {
                if self.mode.is_restricted() {
                    self.sort_children(&scope);
                }
                if scope.indefinite {
                    self.buf.extend_from_slice(b"\0\0");
                }
                else {
                    let content = self.buf.split_off(scope.start);
                    self.put_header(
                        scope.tag, Length::Definite(content.len())
                    );
                    self.buf.extend_from_slice(&content);
                }
            }
        }
        log::trace!("closed {} at depth {}", scope.tag, depth);
    }

    /// Puts the elements of a closing set into canonical order.
    fn sort_children(&mut self, scope: &Pending) {
        let end = self.buf.len();
        let sorted = {
            let mut children: Vec<(Tag, &[u8])> = scope.children.iter()
                .enumerate()
                .map(|(idx, &(start, tag))| {
                    let next = scope.children.get(idx + 1).map_or(
                        end, |&(next, _)| next
                    );
                    (tag, &self.buf[start..next])
                })
                .collect();
            match scope.kind {
                ScopeKind::Set => {
                    children.sort_by_key(|&(tag, _)| {
                        tag.with_constructed(false)
                    })
                }
                ScopeKind::SetOf => {
                    children.sort_by(|left, right| left.1.cmp(right.1))
                }
                _ => return
            }
            children.into_iter().flat_map(|(_, data)| {
                data.iter().copied()
            }).collect::<Vec<_>>()
        };
        self.buf.truncate(scope.start);
        self.buf.extend_from_slice(&sorted);
    }
}

/// # Internal Helpers
///
impl Writer {
    /// Registers the start of a new value in the current scope.
    fn begin_value(&mut self, tag: Tag) {
        let start = self.buf.len();
        if let Some(scope) = self.scopes.last_mut() {
            if matches!(scope.kind, ScopeKind::Set | ScopeKind::SetOf) {
                scope.children.push((start, tag))
            }
        }
    }

    fn put_header(&mut self, tag: Tag, length: Length) {
        tag.append_encoded(&mut self.buf);
        length.append_encoded(&mut self.buf);
    }

    fn put_primitive(&mut self, tag: Tag, content: &[u8]) {
        self.put_header(
            tag.with_constructed(false), Length::Definite(content.len())
        );
        self.buf.extend_from_slice(content);
    }

    /// Puts a string type value, segmenting it in CER if necessary.
    fn put_string(&mut self, tag: Tag, content: &[u8]) {
        if self.mode != Mode::Cer || content.len() <= Mode::CER_SEGMENT_LEN {
            return self.put_primitive(tag, content)
        }
        self.put_header(tag.with_constructed(true), Length::Indefinite);
        for chunk in content.chunks(Mode::CER_SEGMENT_LEN) {
            self.put_primitive(Tag::OCTET_STRING, chunk);
        }
        self.buf.extend_from_slice(b"\0\0");
    }

    /// Puts a bit string value, segmenting it in CER if necessary.
    fn put_bit_string(&mut self, tag: Tag, unused: u8, data: &[u8]) {
        let seg_len = Mode::CER_SEGMENT_LEN - 1;
        if self.mode != Mode::Cer || data.len() <= seg_len {
            self.put_header(
                tag.with_constructed(false),
                Length::Definite(data.len() + 1)
            );
            self.buf.push(unused);
            self.buf.extend_from_slice(data);
            return
        }
        self.put_header(tag.with_constructed(true), Length::Indefinite);
        let mut chunks = data.chunks(seg_len).peekable();
        while let Some(chunk) = chunks.next() {
            self.put_header(
                Tag::BIT_STRING, Length::Definite(chunk.len() + 1)
            );
            self.buf.push(if chunks.peek().is_some() { 0 } else { unused });
            self.buf.extend_from_slice(chunk);
        }
        self.buf.extend_from_slice(b"\0\0");
    }
}


//------------ Pending -------------------------------------------------------

/// A constructed value currently open.
#[derive(Clone, Debug)]
struct Pending {
    /// The tag of the value with the constructed bit set.
    tag: Tag,

    /// What kind of value this is.
    kind: ScopeKind,

    /// Whether the header with indefinite length has already been written.
    indefinite: bool,

    /// The index in the buffer where the content starts.
    start: usize,

    /// The start index and tag of each element of a SET or SET OF.
    children: Vec<(usize, Tag)>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ScopeKind {
    Sequence,
    Set,
    SetOf,
    OctetString,
    BitString,
    Indefinite,
}


//============ Tests =========================================================
