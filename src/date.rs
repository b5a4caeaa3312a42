//! Bank exports write dates as `MM/DD/YY`. The layout is positional:
//!
//! ```text
//! MM/DD/YY
//! 01234567
//! ```
//!
//! Month sits at offsets 0-1, day at 3-4 and the two digit year at 6-7. The delimiters
//! are never looked at, so `06-13-22` converts as well, while an input without delimiters
//! puts the digits at the wrong offsets and is rejected.
//!
//! Two digit years always land in 2000-2099. There is no century inference: `99` is 2099.

use crate::LedgerError;
use chrono::NaiveDate;

/// Total ordered calendar day used as the ledger key.
pub type CalendarDate = NaiveDate;

/// Date reported by extremum queries on an empty ledger, `1970-01-01`.
pub fn epoch() -> CalendarDate {
    NaiveDate::default()
}

/// The century every two digit year is mapped into.
pub const CENTURY: i32 = 2000;

const DATE_LENGTH: usize = 8;

/// Convert a `MM/DD/YY` string into a [`CalendarDate`].
///
/// Fails with [`LedgerError::MalformedDate`] when the input is shorter than 8 bytes,
/// when any of the month/day/year slices is not made of ASCII digits, or when the
/// digits do not name a real day (e.g. `02/30/22`).
pub fn parse_date(s: &str) -> Result<CalendarDate, LedgerError> {
    let malformed = || LedgerError::MalformedDate(s.to_string());

    if s.len() < DATE_LENGTH {
        return Err(malformed());
    }

    let month = two_digits(s, 0).ok_or_else(malformed)?;
    let day = two_digits(s, 3).ok_or_else(malformed)?;
    let year = two_digits(s, 6).ok_or_else(malformed)?;

    NaiveDate::from_ymd_opt(CENTURY + year as i32, month, day).ok_or_else(malformed)
}

fn two_digits(s: &str, at: usize) -> Option<u32> {
    let digits = s.get(at..at + 2)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
