//! Guards for constructed values under construction.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::ops;
use super::writer::Writer;


//------------ Scope ---------------------------------------------------------

/// A constructed value currently being written.
///
/// A scope is returned by the writer’s `push_*` methods. It dereferences
/// to the [`Writer`] so that the content of the constructed value can be
/// written through it. When the scope is dropped, the value is closed,
/// i.e., its header is completed and, for sets, its elements are put into
/// canonical order. The [`close`][Self::close] method can be used to make
/// this explicit.
///
/// Because the scope holds on to the writer mutably, scopes are always
/// closed in reverse order of opening and the writer can’t be used for
/// anything else while a scope is open.
#[must_use = "the scope is closed immediately if not bound to a variable"]
pub struct Scope<'w> {
    /// The writer.
    writer: &'w mut Writer,

    /// The number of open scopes including this one.
    depth: usize,
}

impl<'w> Scope<'w> {
    pub(super) fn new(writer: &'w mut Writer, depth: usize) -> Self {
        Scope { writer, depth }
    }

    /// Closes the scope.
    pub fn close(self) { }
}


//--- Deref and DerefMut

impl ops::Deref for Scope<'_> {
    type Target = Writer;

    fn deref(&self) -> &Writer {
        self.writer
    }
}

impl ops::DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut Writer {
        self.writer
    }
}


//--- Drop

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.writer.close_scope(self.depth)
    }
}
