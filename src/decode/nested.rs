//! Readers for the content of constructed values.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::ops;
use super::error::DecodeError;
use super::reader::Reader;


//------------ Nested --------------------------------------------------------

/// A reader for the content of a constructed value.
///
/// A nested reader is returned by the reader’s methods for opening
/// constructed values such as [`Reader::read_sequence`]. It dereferences
/// to a [`Reader`] limited to the content of the value.
///
/// Once the nested reader is dropped, the parent reader continues after
/// the end of the constructed value. All content should have been read by
/// then. Use [`finish`][Self::finish] to check for this and receive an
/// error if content is left. If the nested reader is simply dropped with
/// content left, the next operation on the parent returns the trailing
/// data error instead. Use [`skip_rest`][Self::skip_rest] to explicitly
/// ignore any remaining content.
pub struct Nested<'p, 'a> {
    /// The reader of the enclosing value.
    parent: &'p mut Reader<'a>,

    /// The reader for the content.
    inner: Reader<'a>,

    /// The index where the parent continues.
    end: usize,

    /// Whether the content has been dealt with explicitly.
    done: bool,
}

impl<'p, 'a> Nested<'p, 'a> {
    pub(super) fn new(
        parent: &'p mut Reader<'a>, inner: Reader<'a>, end: usize
    ) -> Self {
        Nested { parent, inner, end, done: false }
    }

    /// Finishes reading the content.
    ///
    /// Returns an error if there is content left.
    pub fn finish(mut self) -> Result<(), DecodeError> {
        self.done = true;
        self.inner.check_exhausted()
    }

    /// Skips any remaining content.
    ///
    /// This only fails if a reader nested in this one has left an error.
    pub fn skip_rest(mut self) -> Result<(), DecodeError> {
        self.done = true;
        match self.inner.take_pending() {
            Some(err) => Err(err),
            None => Ok(())
        }
    }
}


//--- Deref and DerefMut

impl<'a> ops::Deref for Nested<'_, 'a> {
    type Target = Reader<'a>;

    fn deref(&self) -> &Reader<'a> {
        &self.inner
    }
}

impl<'a> ops::DerefMut for Nested<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Reader<'a> {
        &mut self.inner
    }
}


//--- Drop

impl Drop for Nested<'_, '_> {
    fn drop(&mut self) {
        if !self.done {
            if let Err(err) = self.inner.check_exhausted() {
                log::debug!("nested value dropped early: {err}");
                self.parent.set_pending(err);
            }
        }
        self.parent.set_pos(self.end);
    }
}


//============ Tests =========================================================
