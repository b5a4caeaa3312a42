use crate::date::CalendarDate;
use crate::statement::Statement;
use crate::LedgerError;
use chrono::naive::NaiveDate;
use std::collections::{btree_map, BTreeMap};
use std::fmt;
use std::slice;

/// All statements booked on a single day, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct DayBook {
    statements: Vec<Statement>,
}

impl DayBook {
    fn new() -> DayBook {
        DayBook {
            statements: Vec::new(),
        }
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Fold the day into a single entry: amounts are summed and the balance of the
    /// first statement booked that day is kept. The sum is widened to `i128`.
    pub fn total(&self) -> DailyTotal {
        DailyTotal {
            amount: self
                .statements
                .iter()
                .map(|s| i128::from(s.amount()))
                .sum(),
            balance: self
                .statements
                .first()
                .map(Statement::balance)
                .unwrap_or_default(),
            statements: self.statements.len(),
        }
    }
}

/// Merged view of one day, see [`Ledger::daily_totals`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DailyTotal {
    pub amount: i128,
    pub balance: i64,
    pub statements: usize,
}

/// Date ordered collection of statements.
///
/// Several statements may share a date; each one is kept as its own entry.
/// `start_date` and `end_date` track the earliest and latest booked day and only
/// ever widen. On an empty ledger they hold the sentinels `NaiveDate::MAX` and
/// `NaiveDate::MIN` respectively.
#[derive(Clone, Debug)]
pub struct Ledger {
    bookings: BTreeMap<NaiveDate, DayBook>,
    start_date: CalendarDate,
    end_date: CalendarDate,
    len: usize,
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger {
            bookings: BTreeMap::new(),
            start_date: NaiveDate::MAX,
            end_date: NaiveDate::MIN,
            len: 0,
        }
    }
}

impl Ledger {
    pub fn new() -> Ledger {
        Ledger::default()
    }

    /// Append a statement under its date. Statements sharing a date are never merged.
    pub fn insert(&mut self, statement: Statement) {
        let date = statement.date();
        self.start_date = self.start_date.min(date);
        self.end_date = self.end_date.max(date);

        tracing::trace!(
            %date,
            amount = statement.amount(),
            balance = statement.balance(),
            "booking statement"
        );

        self.bookings
            .entry(date)
            .or_insert_with(DayBook::new)
            .statements
            .push(statement);
        self.len += 1;
    }

    /// Insert a statement from validated record scalars, `date` being `MM/DD/YY`.
    pub fn ingest(
        &mut self,
        amount: i64,
        balance: i64,
        date: &str,
        description: Option<&str>,
    ) -> Result<(), LedgerError> {
        self.insert(Statement::from_raw(amount, balance, date, description)?);
        Ok(())
    }

    /// Alias of [`Ledger::num_statements`].
    pub fn len(&self) -> usize {
        self.num_statements()
    }

    /// Number of entries, counting every statement of a shared date.
    pub fn num_statements(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn start_date(&self) -> CalendarDate {
        self.start_date
    }

    pub fn end_date(&self) -> CalendarDate {
        self.end_date
    }

    pub fn get_at(&self, date: &NaiveDate) -> Option<&DayBook> {
        self.bookings.get(date)
    }

    /// Day book for `date`, clamped to the booked days.
    ///
    /// A date before the first booked day yields the first day, a date after the last
    /// yields the last day, and a date between two booked days yields the earlier one.
    /// `None` only on an empty ledger.
    pub fn at_or_nearest(&self, date: &NaiveDate) -> Option<&DayBook> {
        self.bookings
            .range(..=*date)
            .next_back()
            .or_else(|| self.bookings.iter().next())
            .map(|(_, daybook)| daybook)
    }

    /// Statements booked on `date`, empty when there are none.
    pub fn statements_on(&self, date: &NaiveDate) -> &[Statement] {
        self.get_at(date).map(DayBook::statements).unwrap_or(&[])
    }

    /// Every entry in ascending date order; same day entries keep their insertion order.
    pub fn iter(&self) -> Entries<'_> {
        Entries {
            books: self.bookings.iter(),
            current: None,
        }
    }

    /// One merged entry per booked day, see [`DayBook::total`].
    pub fn daily_totals(&self) -> impl Iterator<Item = (CalendarDate, DailyTotal)> + '_ {
        self.bookings.iter().map(|(date, book)| (*date, book.total()))
    }

    /// Entries booked within `[start, end]`, both ends inclusive.
    ///
    /// The bounds are clamped to this ledger's own `[start_date, end_date]` first. The
    /// returned ledger is an independent copy whose bounds only reflect what was copied.
    pub fn try_date_range(
        &self,
        start: CalendarDate,
        end: CalendarDate,
    ) -> Result<Ledger, LedgerError> {
        if start > end {
            return Err(LedgerError::InvalidRange { start, end });
        }

        let start = start.max(self.start_date);
        let end = end.min(self.end_date);
        if start > end {
            return Ok(Ledger::new());
        }

        Ok(self
            .bookings
            .range(start..=end)
            .flat_map(|(_, book)| book.statements.iter().cloned())
            .collect())
    }

    /// Same as [`Ledger::try_date_range`], but an inverted range is logged and
    /// answered with an empty ledger.
    pub fn date_range(&self, start: CalendarDate, end: CalendarDate) -> Ledger {
        self.try_date_range(start, end).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "date range query yields an empty ledger");
            Ledger::new()
        })
    }

    /// Entries whose amount lies within `[min, max]`.
    pub fn amount_range(&self, min: i64, max: i64) -> Ledger {
        self.filtered(|statement| (min..=max).contains(&statement.amount()))
    }

    /// Entries whose balance lies within `[min, max]`.
    pub fn balance_range(&self, min: i64, max: i64) -> Ledger {
        self.filtered(|statement| (min..=max).contains(&statement.balance()))
    }

    fn filtered<P: Fn(&Statement) -> bool>(&self, predicate: P) -> Ledger {
        self.iter()
            .map(|(_, statement)| statement)
            .filter(|statement| predicate(statement))
            .cloned()
            .collect()
    }

    /// Render the ledger as text, see the [`fmt::Display`] implementation.
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

/// Iterator over `(date, statement)` pairs, created by [`Ledger::iter`].
pub struct Entries<'l> {
    books: btree_map::Iter<'l, NaiveDate, DayBook>,
    current: Option<(&'l NaiveDate, slice::Iter<'l, Statement>)>,
}

impl<'l> Iterator for Entries<'l> {
    type Item = (&'l CalendarDate, &'l Statement);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((date, statements)) = self.current.as_mut() {
                if let Some(statement) = statements.next() {
                    return Some((*date, statement));
                }
            }
            let (date, book) = self.books.next()?;
            self.current = Some((date, book.statements.iter()));
        }
    }
}

impl<'l> IntoIterator for &'l Ledger {
    type Item = (&'l CalendarDate, &'l Statement);
    type IntoIter = Entries<'l>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<Statement> for Ledger {
    fn extend<I: IntoIterator<Item = Statement>>(&mut self, iter: I) {
        for statement in iter {
            self.insert(statement);
        }
    }
}

impl FromIterator<Statement> for Ledger {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        let mut ledger = Ledger::new();
        ledger.extend(iter);
        ledger
    }
}

/// A `#Date Amount Balance[ Description]` header, then one space separated line per
/// entry in ascending date order. The description column only appears when at least
/// one entry carries a description.
///
/// Descriptions are written verbatim; embedded spaces are not escaped, so the output
/// is meant for reading and plotting, not for parsing back.
impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let described = self.iter().any(|(_, s)| s.description().is_some());

        write!(f, "#Date Amount Balance")?;
        if described {
            write!(f, " Description")?;
        }
        writeln!(f)?;

        for (date, statement) in self {
            write!(f, "{} {} {}", date, statement.amount(), statement.balance())?;
            if let Some(description) = statement.description() {
                write!(f, " {}", description)?;
            }
            writeln!(f)?;
        }

        Ok(())
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

    fn statements_strategy() -> impl Strategy<Value = Vec<Statement>> {
        prop::collection::vec(
            (date_strategy(), -500i64..500, -5_000i64..5_000)
                .prop_map(|(date, amount, balance)| Statement::new(amount, balance, date, None)),
            0..40,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_bounds_track_extreme_dates(statements in statements_strategy()) {
            let ledger: Ledger = statements.iter().cloned().collect();
            prop_assert_eq!(ledger.num_statements(), statements.len());
            match (
                statements.iter().map(Statement::date).min(),
                statements.iter().map(Statement::date).max(),
            ) {
                (Some(min), Some(max)) => {
                    prop_assert_eq!(ledger.start_date(), min);
                    prop_assert_eq!(ledger.end_date(), max);
                }
                _ => {
                    prop_assert_eq!(ledger.start_date(), NaiveDate::MAX);
                    prop_assert_eq!(ledger.end_date(), NaiveDate::MIN);
                }
            }
        }

        #[test]
        fn prop_date_range_is_subset(
            statements in statements_strategy(),
            a in date_strategy(),
            b in date_strategy()
        ) {
            let ledger: Ledger = statements.iter().cloned().collect();
            let (start, end) = if a <= b { (a, b) } else { (b, a) };
            let sub = ledger.date_range(start, end);

            let expected = statements
                .iter()
                .filter(|s| s.date() >= start && s.date() <= end)
                .count();
            prop_assert_eq!(sub.num_statements(), expected);
            for (date, _) in &sub {
                prop_assert!(*date >= start && *date <= end);
            }
            if a != b {
                prop_assert!(ledger.date_range(end, start).is_empty());
            }
        }

        #[test]
        fn prop_wide_date_range_is_identity(statements in statements_strategy()) {
            let ledger: Ledger = statements.into_iter().collect();
            let sub = ledger.date_range(NaiveDate::MIN, NaiveDate::MAX);
            prop_assert_eq!(sub.num_statements(), ledger.num_statements());
            prop_assert_eq!(sub.serialize(), ledger.serialize());
        }

        #[test]
        fn prop_amount_range_is_exact_and_idempotent(
            statements in statements_strategy(),
            min in -600i64..600,
            max in -600i64..600
        ) {
            let ledger: Ledger = statements.iter().cloned().collect();
            let once = ledger.amount_range(min, max);
            let expected = statements
                .iter()
                .filter(|s| s.amount() >= min && s.amount() <= max)
                .count();
            prop_assert_eq!(once.num_statements(), expected);

            let twice = once.amount_range(min, max);
            prop_assert_eq!(twice.serialize(), once.serialize());
        }
    }
}
