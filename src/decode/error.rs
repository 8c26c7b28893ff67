//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::fmt;
use std::borrow::Cow;
use crate::string::CharSetError;
use crate::tag::Tag;


//------------ Pos -----------------------------------------------------------

/// The position of an octet within the data handed to a reader.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pos(usize);

impl Pos {
    /// Returns the position as an index into the data.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}


//------------ ErrorKind -----------------------------------------------------

/// The kind of a decoding error.
///
/// The kinds allow callers to react differently to different problems,
/// for instance retrying data rejected as non-canonical in BER mode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// The length octets violate the structural rules.
    MalformedLength,

    /// The identifier octets violate the structural rules.
    MalformedTag,

    /// The data ended before a value did.
    Truncated,

    /// A value had a different tag than expected.
    TagMismatch,

    /// The encoding is valid BER but not canonical under CER or DER.
    NonCanonical,

    /// The content is structurally fine but not a valid value of the type.
    InvalidValue,

    /// There was content left over that nobody read.
    TrailingData,
}


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding data.
///
/// Each error carries the position in the data where it was detected.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed length at {pos}: {msg}")]
    MalformedLength { pos: Pos, msg: &'static str },

    #[error("malformed tag at {pos}: {msg}")]
    MalformedTag { pos: Pos, msg: &'static str },

    #[error("unexpected end of data at {pos}")]
    Truncated { pos: Pos },

    #[error("expected {expected} but found {actual} at {pos}")]
    TagMismatch { expected: Tag, actual: Tag, pos: Pos },

    #[error("non-canonical encoding at {pos}: {msg}")]
    NonCanonical { pos: Pos, msg: &'static str },

    #[error("invalid value at {pos}: {msg}")]
    InvalidValue { pos: Pos, msg: Cow<'static, str> },

    #[error("trailing data at {pos}")]
    TrailingData { pos: Pos },
}

impl DecodeError {
    pub(crate) fn malformed_length(
        pos: impl Into<Pos>, msg: &'static str
    ) -> Self {
        DecodeError::MalformedLength { pos: pos.into(), msg }
    }

    pub(crate) fn malformed_tag(
        pos: impl Into<Pos>, msg: &'static str
    ) -> Self {
        DecodeError::MalformedTag { pos: pos.into(), msg }
    }

    pub(crate) fn truncated(pos: impl Into<Pos>) -> Self {
        DecodeError::Truncated { pos: pos.into() }
    }

    pub(crate) fn non_canonical(
        pos: impl Into<Pos>, msg: &'static str
    ) -> Self {
        let pos = pos.into();
        log::debug!("rejecting non-canonical encoding at {pos}: {msg}");
        DecodeError::NonCanonical { pos, msg }
    }

    pub(crate) fn invalid(
        pos: impl Into<Pos>, msg: impl Into<Cow<'static, str>>
    ) -> Self {
        DecodeError::InvalidValue { pos: pos.into(), msg: msg.into() }
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        match *self {
            DecodeError::MalformedLength { .. } => ErrorKind::MalformedLength,
            DecodeError::MalformedTag { .. } => ErrorKind::MalformedTag,
            DecodeError::Truncated { .. } => ErrorKind::Truncated,
            DecodeError::TagMismatch { .. } => ErrorKind::TagMismatch,
            DecodeError::NonCanonical { .. } => ErrorKind::NonCanonical,
            DecodeError::InvalidValue { .. } => ErrorKind::InvalidValue,
            DecodeError::TrailingData { .. } => ErrorKind::TrailingData,
        }
    }

    /// Returns the position where the error was detected.
    pub fn pos(&self) -> Pos {
        match *self {
            DecodeError::MalformedLength { pos, .. } => pos,
            DecodeError::MalformedTag { pos, .. } => pos,
            DecodeError::Truncated { pos } => pos,
            DecodeError::TagMismatch { pos, .. } => pos,
            DecodeError::NonCanonical { pos, .. } => pos,
            DecodeError::InvalidValue { pos, .. } => pos,
            DecodeError::TrailingData { pos } => pos,
        }
    }
}


//------------ ContentError --------------------------------------------------

/// A problem found in the content octets of a value.
///
/// The helpers that interpret content octets don’t know where the content
/// lives in the data. They return this type and the reader turns it into a
/// [`DecodeError`] with the right position.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum ContentError {
    /// The content isn’t in its canonical form.
    NonCanonical(&'static str),

    /// The content isn’t a valid value.
    Invalid(Cow<'static, str>),
}

impl ContentError {
    pub(crate) fn invalid(msg: impl Into<Cow<'static, str>>) -> Self {
        ContentError::Invalid(msg.into())
    }

    /// Converts the error into a decoding error at the given position.
    pub(crate) fn at(self, pos: Pos) -> DecodeError {
        match self {
            ContentError::NonCanonical(msg) => {
                DecodeError::non_canonical(pos, msg)
            }
            ContentError::Invalid(msg) => DecodeError::invalid(pos, msg),
        }
    }
}

impl From<CharSetError> for ContentError {
    fn from(err: CharSetError) -> Self {
        ContentError::Invalid(err.to_string().into())
    }
}
