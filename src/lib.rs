//! Passbook - A date ordered ledger for bank statement records
//! ---
//!
//! Passbook keeps every transaction of a bank export in a ledger indexed by calendar date,
//! tracks the first and last booked day, and answers the questions one usually asks
//! a statement: biggest deposit, lowest balance, what happened between two dates, and so on.
//!
//! Amounts and balances are plain signed integers in minor currency units.
//!

extern crate pest;
#[macro_use]
extern crate pest_derive;

/// Conversion of `MM/DD/YY` strings into calendar dates.
pub mod date;

/// Ledger representation.
///
/// The main structure is [`Ledger`][ledger::Ledger], an ordered multi-map from
/// calendar date to [`Statement`][statement::Statement]. Statements sharing a date
/// are kept side by side in a [`DayBook`][ledger::DayBook], never merged.
pub mod ledger;

/// Our ingestion entrypoints for bank CSV exports.
pub mod parser;

mod record;
pub mod statement;
mod summary;

pub use date::{parse_date, CalendarDate};
pub use ledger::Ledger;
pub use parser::parse;
pub use record::{Record, TransactionKind};
pub use statement::Statement;
pub use summary::{Extremum, Report, Summary};

use thiserror::Error;

/// Failures raised by the ledger core.
#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("input `{0}' is not a valid MM/DD/YY date")]
    MalformedDate(String),
    #[error("invalid date range: `{start}' is after `{end}'")]
    InvalidRange {
        start: CalendarDate,
        end: CalendarDate,
    },
}
