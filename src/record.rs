use crate::parser::{inner_str, Rule};
use crate::statement::Statement;
use crate::LedgerError;
use anyhow::{anyhow, Result};
use pest::iterators::Pair;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransactionKind {
    Debit,
    Credit,
}

/// One bank export row, borrowing from the input it was parsed from.
///
/// Only `amount`, `balance`, `date` and `description` reach the ledger; the rest is
/// kept for callers that want to inspect the raw row.
#[derive(Debug, PartialEq)]
pub struct Record<'r> {
    pub account: &'r str,
    pub date: &'r str,
    pub amount: i64,
    pub kind: TransactionKind,
    pub description: Option<&'r str>,
    pub balance: i64,
}

macro_rules! next_token {
    ($pairs:ident, $expected:literal) => {
        $pairs.next().ok_or(anyhow!(concat!(
            "invalid next token, expected ",
            $expected
        )))?
    };
}

impl<'r> TryFrom<Pair<'r, Rule>> for Record<'r> {
    type Error = anyhow::Error;

    fn try_from(pair: Pair<'r, Rule>) -> Result<Self, Self::Error> {
        Self::parse(pair)
    }
}

impl<'r> Record<'r> {
    pub fn parse(token: Pair<'r, Rule>) -> Result<Record<'r>> {
        let mut fields = token.into_inner();

        let account = next_token!(fields, "account").as_str();
        let date = next_token!(fields, "date").as_str();
        let amount = inner_str(next_token!(fields, "amount"))?.parse::<i64>()?;
        let kind = match next_token!(fields, "transaction kind").as_str() {
            "Debit" => TransactionKind::Debit,
            "Credit" => TransactionKind::Credit,
            other => return Err(anyhow!("invalid transaction kind `{}'", other)),
        };

        let description = next_token!(fields, "description")
            .into_inner()
            .next()
            .ok_or(anyhow!("invalid next token, expected description text"))?;
        let description = match description.as_rule() {
            Rule::quoted => inner_str(description)?,
            _ => description.as_str(),
        }
        .trim();

        let balance = inner_str(next_token!(fields, "balance"))?.parse::<i64>()?;

        Ok(Record {
            account,
            date,
            amount,
            kind,
            description: Some(description).filter(|d| !d.is_empty()),
            balance,
        })
    }

    /// Convert into an owned [`Statement`], checking the date on the way.
    pub fn to_statement(&self) -> Result<Statement, LedgerError> {
        Statement::from_raw(self.amount, self.balance, self.date, self.description)
    }
}
