use crate::date::{parse_date, CalendarDate};
use crate::LedgerError;

/// One booked transaction.
///
/// A statement owns all of its data and is never modified once built. It deliberately
/// has no notion of equality or ordering; ordering only comes from the ledger key.
#[derive(Clone, Debug)]
pub struct Statement {
    amount: i64,
    balance: i64,
    date: CalendarDate,
    description: Option<String>,
}

impl Statement {
    pub fn new(amount: i64, balance: i64, date: CalendarDate, description: Option<String>) -> Self {
        Statement {
            amount,
            balance,
            date,
            description,
        }
    }

    /// Build a statement from the raw scalars of a bank record, `date` being `MM/DD/YY`.
    ///
    /// The description is trimmed; an empty or blank description is treated as no description.
    pub fn from_raw(
        amount: i64,
        balance: i64,
        date: &str,
        description: Option<&str>,
    ) -> Result<Self, LedgerError> {
        Ok(Self::new(
            amount,
            balance,
            parse_date(date)?,
            description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        ))
    }

    /// Signed amount; negative amounts are withdrawals.
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Account balance right after this transaction.
    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn date(&self) -> CalendarDate {
        self.date
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_deposit(&self) -> bool {
        self.amount >= 0
    }

    pub fn is_withdrawal(&self) -> bool {
        !self.is_deposit()
    }
}
