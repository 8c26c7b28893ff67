//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::borrow::Cow;
use crate::string::CharSetError;


//------------ EncodeError ---------------------------------------------------

/// A value handed to the writer cannot be encoded.
///
/// Only operations that need to validate their input return this error.
/// Using the writer itself incorrectly, such as encoding while scopes are
/// still open, is a bug in the caller and causes a panic instead.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum EncodeError {
    /// The string isn’t a valid object identifier in dotted form.
    #[error("invalid object identifier {oid:?}: {msg}")]
    InvalidOid { oid: String, msg: &'static str },

    /// The value cannot be represented by the requested type.
    #[error("invalid value: {0}")]
    InvalidValue(Cow<'static, str>),
}

impl EncodeError {
    pub(crate) fn invalid(msg: impl Into<Cow<'static, str>>) -> Self {
        EncodeError::InvalidValue(msg.into())
    }
}

impl From<CharSetError> for EncodeError {
    fn from(err: CharSetError) -> Self {
        EncodeError::InvalidValue(err.to_string().into())
    }
}
