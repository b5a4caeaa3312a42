use crate::ledger::Ledger;
use crate::record::Record;
use anyhow::{anyhow, Context, Result};
use pest::iterators::Pair;
use pest::Parser;

use std::fs;
use std::path::Path;

#[derive(Parser)]
#[grammar = "statements.pest"]
pub struct StatementParser;

/// Ingestion switches, set with [`Options::set`] from `key`/`value` pairs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Options {
    /// Ignore the first non-blank line, bank exports usually start with a header row.
    pub skip_header: bool,
    /// Log and skip bad records instead of failing the whole input.
    pub lenient: bool,
}

impl Options {
    pub fn set(&mut self, key: &str, val: &str) -> Result<()> {
        let flag = match val {
            "true" => true,
            "false" => false,
            _ => return Err(anyhow!("invalid value `{}' for option `{}'", val, key)),
        };

        match key {
            "skip_header" => self.skip_header = flag,
            "lenient" => self.lenient = flag,
            _ => return Err(anyhow!("unknown option `{}'", key)),
        }

        Ok(())
    }
}

pub fn parse_file(path: &Path, carried_ledger: Option<Ledger>) -> Result<Ledger> {
    parse_file_with(path, &Options::default(), carried_ledger)
}

pub fn parse_file_with(
    path: &Path,
    options: &Options,
    carried_ledger: Option<Ledger>,
) -> Result<Ledger> {
    let fcontent = fs::read_to_string(path)
        .with_context(|| format!("cannot read statements from `{}'", path.display()))?;
    parse_with(&fcontent, options, carried_ledger)
}

/// Parse every record of `input` into `carried_ledger`, or into a new ledger.
///
/// Carrying the ledger returned by a previous call merges several exports together.
pub fn parse(input: &str, carried_ledger: Option<Ledger>) -> Result<Ledger> {
    parse_with(input, &Options::default(), carried_ledger)
}

pub fn parse_with(
    input: &str,
    options: &Options,
    carried_ledger: Option<Ledger>,
) -> Result<Ledger> {
    let mut ledger = carried_ledger.unwrap_or_default();

    let records = input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .skip(usize::from(options.skip_header));

    for (idx, line) in records {
        let lineno = idx + 1;
        let ingested = ingest_line(&mut ledger, line)
            .with_context(|| format!("invalid record at line {}", lineno));
        if let Err(err) = ingested {
            if !options.lenient {
                return Err(err);
            }
            tracing::warn!(line = lineno, "skipping record: {:#}", err);
        }
    }

    tracing::debug!(
        statements = ledger.num_statements(),
        "parsed statement records"
    );
    Ok(ledger)
}

fn ingest_line(ledger: &mut Ledger, line: &str) -> Result<()> {
    let mut ast = StatementParser::parse(Rule::record, line)?;
    let token = ast
        .next()
        .ok_or(anyhow!("unexpected token: `{}'", line))?;
    let record = Record::try_from(token)?;
    ledger.ingest(record.amount, record.balance, record.date, record.description)?;
    Ok(())
}

pub fn inner_str<'i>(token: Pair<'i, Rule>) -> Result<&'i str> {
    let token_str = token.as_str();
    Ok(token
        .into_inner()
        .next()
        .ok_or(anyhow!("invalid next token: `{}'", token_str))?
        .as_str())
}
