//! UTCTime and GeneralizedTime.
//!
//! This is a private module. It converts between [`chrono`] date-times and
//! the content octets of the two ASN.1 time types.
//!
//! # BER Encoding
//!
//! Both types are encoded as a string of ASCII characters. A UTCTime has
//! the form `YYMMDDhhmm[ss]` followed by either `Z` or a time zone offset
//! `+hhmm` or `-hhmm`. A GeneralizedTime has the form
//! `YYYYMMDDhh[mm[ss[.fff]]]` followed by the same suffixes. In CER and
//! DER, seconds are mandatory, the suffix must be `Z`, and fractional
//! seconds must use a full stop and no trailing zeros.

use std::borrow::Cow;
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeZone,
    Timelike, Utc,
};
use crate::decode::ContentError;
use crate::mode::Mode;


//------------ Formatting ----------------------------------------------------

/// The default last year of the two-digit year window of UTCTime.
pub const UTC_TIME_TWO_DIGIT_YEAR_MAX: i32 = 2049;

/// Returns the content of a UTCTime value.
///
/// The year must be within the hundred years ending at `two_digit_year_max`.
/// Fractions of seconds are dropped.
pub(crate) fn utc_time_string(
    dt: &DateTime<Utc>, two_digit_year_max: i32
) -> Result<String, Cow<'static, str>> {
    let year = dt.year();
    if year < two_digit_year_max - 99 || year > two_digit_year_max {
        return Err(format!("year {year} outside of UTCTime range").into())
    }
    Ok(format!(
        "{:02}{:02}{:02}{:02}{:02}{:02}Z",
        year.rem_euclid(100), dt.month(), dt.day(),
        dt.hour(), dt.minute(), dt.second()
    ))
}

/// Returns the content of a GeneralizedTime value.
///
/// Fractional seconds are added without trailing zeros unless
/// `omit_fractional_seconds` is true or there are none.
pub(crate) fn generalized_time_string(
    dt: &DateTime<Utc>, omit_fractional_seconds: bool
) -> Result<String, Cow<'static, str>> {
    let year = dt.year();
    if !(0..=9999).contains(&year) {
        return Err(
            format!("year {year} outside of GeneralizedTime range").into()
        )
    }
    let mut res = format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}",
        year, dt.month(), dt.day(), dt.hour(), dt.minute(), dt.second()
    );
    // Leap seconds are kept in the nanoseconds.
    let nanos = dt.nanosecond() % 1_000_000_000;
    if !omit_fractional_seconds && nanos != 0 {
        let fraction = format!("{nanos:09}");
        res.push('.');
        res.push_str(fraction.trim_end_matches('0'));
    }
    res.push('Z');
    Ok(res)
}


//------------ Parsing -------------------------------------------------------

/// Parses the content of a UTCTime value.
pub(crate) fn parse_utc_time(
    content: &[u8], mode: Mode, two_digit_year_max: i32
) -> Result<DateTime<FixedOffset>, ContentError> {
    let mut parser = Parser(content);
    let year = parser.digits(2)? as i32;
    let month = parser.digits(2)?;
    let day = parser.digits(2)?;
    let hour = parser.digits(2)?;
    let minute = parser.digits(2)?;
    let second = if parser.peek_digit() {
        parser.digits(2)?
    }
    else if mode.is_restricted() {
        return Err(ContentError::NonCanonical("UTCTime without seconds"))
    }
    else {
        0
    };
    let offset = parser.zone(mode)?;
    parser.finish()?;

    let base = two_digit_year_max - 99;
    let mut year = base - base.rem_euclid(100) + year;
    if year < base {
        year += 100
    }
    build(year, month, day, (hour, minute, second, 0), offset)
}

/// Parses the content of a GeneralizedTime value.
pub(crate) fn parse_generalized_time(
    content: &[u8], mode: Mode
) -> Result<DateTime<FixedOffset>, ContentError> {
    let mut parser = Parser(content);
    let year = parser.digits(4)? as i32;
    let month = parser.digits(2)?;
    let day = parser.digits(2)?;
    let hour = parser.digits(2)?;
    let mut minute = None;
    let mut second = None;
    if parser.peek_digit() {
        minute = Some(parser.digits(2)?);
        if parser.peek_digit() {
            second = Some(parser.digits(2)?);
        }
    }
    if second.is_none() && mode.is_restricted() {
        return Err(ContentError::NonCanonical(
            "GeneralizedTime without seconds"
        ))
    }

    let mut nanos = 0;
    if let Some(sep @ (b'.' | b',')) = parser.peek() {
        if second.is_none() {
            return Err(ContentError::invalid(
                "fractional time without seconds"
            ))
        }
        if sep == b',' && mode.is_restricted() {
            return Err(ContentError::NonCanonical(
                "comma as decimal separator"
            ))
        }
        parser.advance(1);
        nanos = parser.fraction(mode)?;
    }
    let offset = parser.zone(mode)?;
    parser.finish()?;

    build(
        year, month, day,
        (hour, minute.unwrap_or(0), second.unwrap_or(0), nanos),
        offset
    )
}

/// Assembles the parsed fields into a date-time.
fn build(
    year: i32, month: u32, day: u32,
    (hour, minute, second, nanos): (u32, u32, u32, u32),
    offset: i32,
) -> Result<DateTime<FixedOffset>, ContentError> {
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ContentError::invalid(format!("invalid date {year}-{month}-{day}"))
    })?;
    let time = NaiveTime::from_hms_nano_opt(
        hour, minute, second, nanos
    ).ok_or_else(|| {
        ContentError::invalid(format!(
            "invalid time {hour}:{minute}:{second}"
        ))
    })?;
    let offset = FixedOffset::east_opt(offset).ok_or_else(|| {
        ContentError::invalid("invalid time zone offset")
    })?;
    offset.from_local_datetime(&date.and_time(time)).single().ok_or_else(
        || ContentError::invalid("invalid local time")
    )
}


//------------ Parser --------------------------------------------------------

/// A simple cursor over the characters of a time value.
struct Parser<'a>(&'a [u8]);

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.0.first().copied()
    }

    fn peek_digit(&self) -> bool {
        self.peek().is_some_and(|ch| ch.is_ascii_digit())
    }

    fn advance(&mut self, len: usize) {
        self.0 = self.0.get(len..).unwrap_or_default();
    }

    /// Takes exactly `len` digits and returns their value.
    fn digits(&mut self, len: usize) -> Result<u32, ContentError> {
        let digits = match self.0.get(..len) {
            Some(digits) if digits.iter().all(u8::is_ascii_digit) => digits,
            _ => return Err(ContentError::invalid("malformed time value"))
        };
        self.advance(len);
        Ok(digits.iter().fold(0, |res, ch| res * 10 + u32::from(ch - b'0')))
    }

    /// Takes the digits of a fraction of a second and returns nanoseconds.
    fn fraction(&mut self, mode: Mode) -> Result<u32, ContentError> {
        let len = self.0.iter().take_while(|ch| ch.is_ascii_digit()).count();
        if len == 0 {
            return Err(ContentError::invalid("empty fractional seconds"))
        }
        if len > 9 {
            return Err(ContentError::invalid(
                "fractional seconds beyond nanoseconds"
            ))
        }
        if mode.is_restricted() && self.0[len - 1] == b'0' {
            return Err(ContentError::NonCanonical(
                "trailing zeros in fractional seconds"
            ))
        }
        let value = self.digits(len)?;
        Ok(value * 10u32.pow(9 - len as u32))
    }

    /// Takes the time zone suffix and returns the offset in seconds.
    fn zone(&mut self, mode: Mode) -> Result<i32, ContentError> {
        let sign = match self.peek() {
            Some(b'Z') => {
                self.advance(1);
                return Ok(0)
            }
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Err(ContentError::invalid("missing time zone"))
        };
        if mode.is_restricted() {
            return Err(ContentError::NonCanonical(
                "time zone offset instead of Z"
            ))
        }
        self.advance(1);
        let hours = self.digits(2)?;
        let minutes = self.digits(2)?;
        if hours > 23 || minutes > 59 {
            return Err(ContentError::invalid("invalid time zone offset"))
        }
        Ok(sign * (hours * 3600 + minutes * 60) as i32)
    }

    fn finish(&self) -> Result<(), ContentError> {
        if self.0.is_empty() {
            Ok(())
        }
        else {
            Err(ContentError::invalid("trailing characters in time value"))
        }
    }
}


//============ Tests =========================================================
