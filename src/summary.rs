//! Statistics over every entry of a [`Ledger`].
//!
//! Each query is a plain scan in ascending date order. Extremum dates report the first
//! entry reaching the extremum, so ties resolve to the earliest date. On an empty ledger
//! the values fall back to the integer sentinel opposite to the query's direction
//! (`i64::MIN` for a maximum, `i64::MAX` for a minimum) and the dates to [`epoch`].

use crate::date::{epoch, CalendarDate};
use crate::ledger::Ledger;
use crate::statement::Statement;
use std::fmt;

#[derive(Clone, Copy)]
enum Direction {
    Max,
    Min,
}

impl Direction {
    fn sentinel(self) -> i64 {
        match self {
            Direction::Max => i64::MIN,
            Direction::Min => i64::MAX,
        }
    }

    fn beats(self, candidate: i64, best: i64) -> bool {
        match self {
            Direction::Max => candidate > best,
            Direction::Min => candidate < best,
        }
    }
}

impl Ledger {
    fn extremum<F: Fn(&Statement) -> i64>(
        &self,
        direction: Direction,
        field: F,
    ) -> (i64, CalendarDate) {
        let mut best: Option<(i64, CalendarDate)> = None;
        for (date, statement) in self {
            let value = field(statement);
            match best {
                Some((current, _)) if !direction.beats(value, current) => {}
                _ => best = Some((value, *date)),
            }
        }
        best.unwrap_or((direction.sentinel(), epoch()))
    }

    /// Largest amount booked.
    pub fn max_deposit(&self) -> i64 {
        self.extremum(Direction::Max, Statement::amount).0
    }

    pub fn max_deposit_date(&self) -> CalendarDate {
        self.extremum(Direction::Max, Statement::amount).1
    }

    /// Most negative amount booked.
    pub fn max_withdrawal(&self) -> i64 {
        self.extremum(Direction::Min, Statement::amount).0
    }

    pub fn max_withdrawal_date(&self) -> CalendarDate {
        self.extremum(Direction::Min, Statement::amount).1
    }

    pub fn max_balance(&self) -> i64 {
        self.extremum(Direction::Max, Statement::balance).0
    }

    pub fn max_balance_date(&self) -> CalendarDate {
        self.extremum(Direction::Max, Statement::balance).1
    }

    pub fn min_balance(&self) -> i64 {
        self.extremum(Direction::Min, Statement::balance).0
    }

    pub fn min_balance_date(&self) -> CalendarDate {
        self.extremum(Direction::Min, Statement::balance).1
    }

    /// Number of entries with a non-negative amount.
    pub fn num_deposits(&self) -> usize {
        self.iter().filter(|(_, s)| s.is_deposit()).count()
    }

    /// Number of entries with a negative amount.
    pub fn num_withdrawals(&self) -> usize {
        self.iter().filter(|(_, s)| s.is_withdrawal()).count()
    }

    /// Sum of all non-negative amounts. Accumulated in `i128` so no `i64` input overflows.
    pub fn total_deposits(&self) -> i128 {
        self.iter()
            .filter(|(_, s)| s.is_deposit())
            .map(|(_, s)| i128::from(s.amount()))
            .sum()
    }

    /// Sum of all negative amounts, see [`Ledger::total_deposits`].
    pub fn total_withdrawals(&self) -> i128 {
        self.iter()
            .filter(|(_, s)| s.is_withdrawal())
            .map(|(_, s)| i128::from(s.amount()))
            .sum()
    }

    pub fn summary(&self) -> Summary {
        let extremum = |direction, field: fn(&Statement) -> i64| {
            let (value, date) = self.extremum(direction, field);
            Extremum { value, date }
        };

        Summary {
            statements: self.num_statements(),
            start_date: self.start_date(),
            end_date: self.end_date(),
            deposits: self.num_deposits(),
            total_deposits: self.total_deposits(),
            withdrawals: self.num_withdrawals(),
            total_withdrawals: self.total_withdrawals(),
            max_deposit: extremum(Direction::Max, Statement::amount),
            max_withdrawal: extremum(Direction::Min, Statement::amount),
            max_balance: extremum(Direction::Max, Statement::balance),
            min_balance: extremum(Direction::Min, Statement::balance),
        }
    }

    /// Statistics block followed by every entry, see [`Report`].
    pub fn report(&self) -> Report<'_> {
        Report {
            summary: self.summary(),
            ledger: self,
        }
    }
}

/// An extremum value and the earliest date it was reached on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extremum {
    pub value: i64,
    pub date: CalendarDate,
}

/// Deposit/withdrawal breakdown of a ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub statements: usize,
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
    pub deposits: usize,
    pub total_deposits: i128,
    pub withdrawals: usize,
    pub total_withdrawals: i128,
    pub max_deposit: Extremum,
    pub max_withdrawal: Extremum,
    pub max_balance: Extremum,
    pub min_balance: Extremum,
}

fn average(total: i128, count: usize) -> f64 {
    if count == 0 {
        return 0f64;
    }
    total as f64 / count as f64
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} statements from {} to {}",
            self.statements, self.start_date, self.end_date
        )?;
        writeln!(f, "Breakdown:")?;
        writeln!(
            f,
            "\t{} deposits for a total of {} ({:.2} per deposit)",
            self.deposits,
            self.total_deposits,
            average(self.total_deposits, self.deposits)
        )?;
        writeln!(
            f,
            "\t{} withdrawals for a total of {} ({:.2} per withdrawal)",
            self.withdrawals,
            self.total_withdrawals,
            average(self.total_withdrawals, self.withdrawals)
        )
    }
}

/// Printable statement report: a framed statistics block, then the serialized ledger.
///
/// ```text
/// ======  2022-06-13 - 2022-06-15 ======
/// Number of statements: 3
/// Number of deposits: 1  Number of withdrawals: 2
/// Max deposit: 200 happened on 2022-06-13
/// ...
/// ===================================================
/// #Date Amount Balance Description
/// ...
/// ```
pub struct Report<'l> {
    summary: Summary,
    ledger: &'l Ledger,
}

impl<'l> Report<'l> {
    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

impl<'l> fmt::Display for Report<'l> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = &self.summary;
        writeln!(
            f,
            "======  {} - {} ======",
            summary.start_date, summary.end_date
        )?;
        writeln!(f, "Number of statements: {}", summary.statements)?;
        writeln!(
            f,
            "Number of deposits: {}  Number of withdrawals: {}",
            summary.deposits, summary.withdrawals
        )?;

        let extrema = [
            ("Max deposit", summary.max_deposit),
            ("Max withdrawal", summary.max_withdrawal),
            ("Max balance", summary.max_balance),
            ("Min balance", summary.min_balance),
        ];
        for (label, extremum) in extrema {
            writeln!(
                f,
                "{}: {} happened on {}",
                label, extremum.value, extremum.date
            )?;
        }

        writeln!(f, "===================================================")?;
        write!(f, "{}", self.ledger)
    }
}


#[cfg(test)]
mod props {
    use crate::ledger::Ledger;
    use crate::statement::Statement;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn date_strategy() -> impl Strategy<Value = NaiveDate> {
        (2000i32..=2099, 1u32..=12, 1u32..=28)
            .prop_map(|(year, month, day)| NaiveDate::from_ymd_opt(year, month, day).unwrap())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_max_deposit_reports_earliest_date(
            entries in prop::collection::vec((date_strategy(), -20i64..20), 1..40)
        ) {
            let ledger: Ledger = entries
                .iter()
                .map(|(date, amount)| Statement::new(*amount, 0, *date, None))
                .collect();

            let max = entries.iter().map(|(_, amount)| *amount).max().unwrap();
            let earliest = entries
                .iter()
                .filter(|(_, amount)| *amount == max)
                .map(|(date, _)| *date)
                .min()
                .unwrap();

            prop_assert_eq!(ledger.max_deposit(), max);
            prop_assert_eq!(ledger.max_deposit_date(), earliest);
            prop_assert_eq!(ledger.num_deposits() + ledger.num_withdrawals(), entries.len());
        }
    }
}
