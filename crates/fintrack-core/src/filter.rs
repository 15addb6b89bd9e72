//! Pure filtering over transaction snapshots.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate};
use fintrack_domain::{Transaction, TransactionKind};

/// Named period selector. `All` and `Custom` defer to explicit start/end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodFilter {
    #[default]
    All,
    CurrentMonth,
    CurrentYear,
    Last30Days,
    Last90Days,
    Custom,
}

impl PeriodFilter {
    pub const ALL: [PeriodFilter; 6] = [
        PeriodFilter::All,
        PeriodFilter::CurrentMonth,
        PeriodFilter::CurrentYear,
        PeriodFilter::Last30Days,
        PeriodFilter::Last90Days,
        PeriodFilter::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PeriodFilter::All => "all",
            PeriodFilter::CurrentMonth => "current-month",
            PeriodFilter::CurrentYear => "current-year",
            PeriodFilter::Last30Days => "last-30-days",
            PeriodFilter::Last90Days => "last-90-days",
            PeriodFilter::Custom => "custom",
        }
    }

    /// Inclusive date window of a named period, ending today.
    /// `All` and `Custom` have no window of their own.
    pub fn window(self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let start = match self {
            PeriodFilter::All | PeriodFilter::Custom => return None,
            PeriodFilter::CurrentMonth => today.with_day(1)?,
            PeriodFilter::CurrentYear => today.with_ordinal(1)?,
            PeriodFilter::Last30Days => today - Duration::days(30),
            PeriodFilter::Last90Days => today - Duration::days(90),
        };
        Some((start, today))
    }

    fn uses_explicit_dates(self) -> bool {
        matches!(self, PeriodFilter::All | PeriodFilter::Custom)
    }
}

impl fmt::Display for PeriodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        PeriodFilter::ALL
            .into_iter()
            .find(|period| period.as_str() == needle)
            .ok_or_else(|| {
                format!(
                    "unknown period `{value}` (expected one of: {})",
                    PeriodFilter::ALL.map(PeriodFilter::as_str).join(", ")
                )
            })
    }
}

/// Every criterion is optional; active criteria combine with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub period: PeriodFilter,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub kind: Option<TransactionKind>,
    pub search: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_period(mut self, period: PeriodFilter) -> Self {
        self.period = period;
        self
    }

    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Returns the matching subsequence, keeping relative order.
    pub fn apply(&self, transactions: &[Transaction], today: NaiveDate) -> Vec<Transaction> {
        let window = self.period.window(today);
        let category = active_text(&self.category);
        let search = active_text(&self.search).map(str::to_lowercase);

        transactions
            .iter()
            .filter(|txn| match window {
                Some((start, end)) => txn.date >= start && txn.date <= end,
                None => true,
            })
            .filter(|txn| {
                if !self.period.uses_explicit_dates() {
                    return true;
                }
                self.start_date.map_or(true, |start| txn.date >= start)
                    && self.end_date.map_or(true, |end| txn.date <= end)
            })
            .filter(|txn| category.map_or(true, |category| txn.category == category))
            .filter(|txn| self.kind.map_or(true, |kind| txn.kind == kind))
            .filter(|txn| {
                search
                    .as_deref()
                    .map_or(true, |needle| txn.description.to_lowercase().contains(needle))
            })
            .cloned()
            .collect()
    }

    /// Number of criteria set away from their defaults (the filter badge).
    pub fn active_count(&self) -> usize {
        [
            self.period != PeriodFilter::All,
            self.start_date.is_some(),
            self.end_date.is_some(),
            active_text(&self.category).is_some(),
            self.kind.is_some(),
            active_text(&self.search).is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn is_active(&self) -> bool {
        self.active_count() > 0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn active_text(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Up to `limit` transactions, newest date first. Same-day entries keep
/// their stored order.
pub fn recent(transactions: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(limit);
    sorted
}
