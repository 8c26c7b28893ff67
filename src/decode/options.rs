//! Reader configuration.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::time::UTC_TIME_TWO_DIGIT_YEAR_MAX;


//------------ ReaderOptions -------------------------------------------------

/// Options for a [`Reader`][super::Reader].
///
/// The default options limit nesting to 32 levels and interpret two-digit
/// years of UTCTime values as the years 1950 to 2049.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReaderOptions {
    /// The maximum number of nested constructed values.
    max_depth: usize,

    /// The last year of the hundred years covered by UTCTime.
    utc_time_two_digit_year_max: i32,
}

impl ReaderOptions {
    /// The default maximum nesting depth.
    pub const DEFAULT_MAX_DEPTH: usize = 32;

    /// Returns the maximum nesting depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Sets the maximum nesting depth.
    ///
    /// Opening a constructed value beyond this depth or encountering
    /// indefinite length values nested deeper results in an error.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the last year of the UTCTime window.
    pub fn utc_time_two_digit_year_max(&self) -> i32 {
        self.utc_time_two_digit_year_max
    }

    /// Sets the last year of the UTCTime window.
    ///
    /// A two-digit year is interpreted as the year within the one hundred
    /// years ending with `year`.
    pub fn with_utc_time_two_digit_year_max(mut self, year: i32) -> Self {
        self.utc_time_two_digit_year_max = year;
        self
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            utc_time_two_digit_year_max: UTC_TIME_TWO_DIGIT_YEAR_MAX,
        }
    }
}
