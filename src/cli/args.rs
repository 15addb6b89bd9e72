use std::collections::HashMap;

use chrono::NaiveDate;
use fintrack_core::{import::IMPORT_DATE_FORMAT, FilterCriteria, PeriodFilter};
use fintrack_domain::TransactionKind;

use crate::errors::CliError;

const VALUE_FLAGS: [&str; 8] = [
    "period", "from", "to", "category", "type", "search", "month", "dir",
];

/// Command line split into the command word, positional arguments and flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    pub command: Option<String>,
    pub positional: Vec<String>,
    options: HashMap<String, String>,
    pub assume_yes: bool,
}

impl ParsedArgs {
    pub fn parse<I, S>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.into_iter().map(Into::into);
        while let Some(arg) = iter.next() {
            if arg == "--yes" || arg == "-y" {
                parsed.assume_yes = true;
                continue;
            }
            if let Some(flag) = arg.strip_prefix("--") {
                let (name, inline) = match flag.split_once('=') {
                    Some((name, value)) => (name.to_string(), Some(value.to_string())),
                    None => (flag.to_string(), None),
                };
                if !VALUE_FLAGS.contains(&name.as_str()) {
                    return Err(CliError::Input(format!("unknown flag `--{name}`")));
                }
                let value = match inline {
                    Some(value) => value,
                    None => iter
                        .next()
                        .ok_or_else(|| CliError::Input(format!("`--{name}` expects a value")))?,
                };
                parsed.options.insert(name, value);
                continue;
            }
            if parsed.command.is_none() {
                parsed.command = Some(arg);
            } else {
                parsed.positional.push(arg);
            }
        }
        Ok(parsed)
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }

    pub fn require(&self, index: usize, what: &str) -> Result<&str, CliError> {
        self.positional(index)
            .ok_or_else(|| CliError::Input(format!("missing {what}")))
    }

    /// Builds filter criteria from `--period/--from/--to/--category/--type/--search`.
    pub fn filter_criteria(&self) -> Result<FilterCriteria, CliError> {
        let mut criteria = FilterCriteria::new();
        if let Some(period) = self.option("period") {
            criteria = criteria.with_period(period.parse::<PeriodFilter>().map_err(CliError::Input)?);
        }
        let start = self.option("from").map(parse_date).transpose()?;
        let end = self.option("to").map(parse_date).transpose()?;
        if start.is_some() || end.is_some() {
            criteria = criteria.with_range(start, end);
        }
        if let Some(category) = self.option("category") {
            criteria = criteria.with_category(category);
        }
        if let Some(kind) = self.option("type") {
            criteria = criteria.with_kind(kind.parse::<TransactionKind>().map_err(CliError::Input)?);
        }
        if let Some(search) = self.option("search") {
            criteria = criteria.with_search(search);
        }
        Ok(criteria)
    }
}

/// Accepts `dd/mm/yyyy` (the import format) or ISO `yyyy-mm-dd`.
pub fn parse_date(raw: &str) -> Result<NaiveDate, CliError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, IMPORT_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|_| CliError::Input(format!("invalid date `{raw}` (use dd/mm/yyyy)")))
}

/// Decimal amount with either `,` or `.` as separator.
pub fn parse_amount(raw: &str) -> Result<f64, CliError> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| CliError::Input(format!("invalid amount `{raw}`")))
}
