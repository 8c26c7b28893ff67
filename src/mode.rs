//! The encoding rules.
//!
//! This is a private module. Its public items are re-exported by the parent.


//------------ Mode ----------------------------------------------------------

/// The BER mode.
///
/// X.690 defines three related sets of encoding rules. The basic rules
/// allow several ways to encode the same value, while the canonical and
/// distinguished rules restrict them so that each value has exactly one
/// encoding. Both the [`Writer`] and the [`Reader`] are created with one
/// of these modes and apply its restrictions throughout.
///
/// [`Writer`]: crate::encode::Writer
/// [`Reader`]: crate::decode::Reader
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Basic Encoding Rules.
    ///
    /// These are the most flexible rules, allowing alternative encodings
    /// for some types as well as indefinite length values.
    #[default]
    Ber,

    /// Canonical Encoding Rules.
    ///
    /// These rules always employ indefinite length encoding for
    /// constructed values and the shortest possible form for primitive
    /// values. String types longer than 1000 octets are broken up into
    /// segments of exactly 1000 octets.
    Cer,

    /// Distinguished Encoding Rules.
    ///
    /// These rules always employ definite length values and require the
    /// shortest possible encoding. String types are always primitive.
    Der,
}

impl Mode {
    /// The maximum number of content octets of a primitive string in CER.
    pub const CER_SEGMENT_LEN: usize = 1000;

    /// Returns whether this mode is one of the restricted modes CER or DER.
    pub fn is_restricted(self) -> bool {
        !matches!(self, Mode::Ber)
    }

    /// Returns whether the mode allows definite length constructed values.
    pub fn allow_definite_constructed(self) -> bool {
        !matches!(self, Mode::Cer)
    }

    /// Returns whether the mode allows indefinite length constructed values.
    pub fn allow_indefinite_constructed(self) -> bool {
        !matches!(self, Mode::Der)
    }

    /// Returns whether string types may be encoded as constructed values.
    pub fn allow_constructed_strings(self) -> bool {
        !matches!(self, Mode::Der)
    }
}


//============ Tests =========================================================
