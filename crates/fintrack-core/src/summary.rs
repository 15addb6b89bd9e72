//! Aggregation helpers for dashboard cards, calendar cells and chart series.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, Duration, NaiveDate};
use fintrack_domain::{Transaction, TransactionKind, YearMonth};

/// Income and expense sums for a group of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub income_count: usize,
    pub expense_count: usize,
}

impl Totals {
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }

    pub fn count(&self) -> usize {
        self.income_count + self.expense_count
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn add(&mut self, txn: &Transaction) {
        match txn.kind {
            TransactionKind::Income => {
                self.income += txn.amount;
                self.income_count += 1;
            }
            TransactionKind::Expense => {
                self.expense += txn.amount;
                self.expense_count += 1;
            }
        }
    }

    pub fn merge(&mut self, other: &Totals) {
        self.income += other.income;
        self.expense += other.expense;
        self.income_count += other.income_count;
        self.expense_count += other.expense_count;
    }
}

impl<'a> FromIterator<&'a Transaction> for Totals {
    fn from_iter<I: IntoIterator<Item = &'a Transaction>>(iter: I) -> Self {
        let mut totals = Totals::default();
        for txn in iter {
            totals.add(txn);
        }
        totals
    }
}

/// Sums over the whole slice.
pub fn totals(transactions: &[Transaction]) -> Totals {
    transactions.iter().collect()
}

/// Granularity used by [`aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Day,
    Month,
    Category,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Day(NaiveDate),
    Month(YearMonth),
    Category(String),
}

impl GroupKey {
    fn of(txn: &Transaction, grouping: Grouping) -> Self {
        match grouping {
            Grouping::Day => GroupKey::Day(txn.date),
            Grouping::Month => GroupKey::Month(YearMonth::of(txn.date)),
            Grouping::Category => GroupKey::Category(txn.category.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: GroupKey,
    pub totals: Totals,
}

/// Groups by an arbitrary key, ordered by that key.
pub fn group_by<K, F>(transactions: &[Transaction], key_fn: F) -> BTreeMap<K, Totals>
where
    K: Ord,
    F: Fn(&Transaction) -> K,
{
    let mut groups: BTreeMap<K, Totals> = BTreeMap::new();
    for txn in transactions {
        groups.entry(key_fn(txn)).or_default().add(txn);
    }
    groups
}

/// Groups present in `transactions`, ordered by key. Empty groups are not emitted.
pub fn aggregate(transactions: &[Transaction], grouping: Grouping) -> Vec<Group> {
    group_by(transactions, |txn| GroupKey::of(txn, grouping))
        .into_iter()
        .map(|(key, totals)| Group { key, totals })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthTotals {
    pub month: YearMonth,
    pub totals: Totals,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayTotals {
    pub date: NaiveDate,
    pub totals: Totals,
}

/// Totals for one month: the dashboard summary cards.
pub fn month_overview(transactions: &[Transaction], month: YearMonth) -> Totals {
    transactions
        .iter()
        .filter(|txn| month.contains(txn.date))
        .collect()
}

fn series_for_months(
    transactions: &[Transaction],
    months: impl Iterator<Item = YearMonth>,
) -> Vec<MonthTotals> {
    let grouped = group_by(transactions, |txn| YearMonth::of(txn.date));
    months
        .map(|month| MonthTotals {
            month,
            totals: grouped.get(&month).copied().unwrap_or_default(),
        })
        .collect()
}

fn series_for_days(
    transactions: &[Transaction],
    days: impl Iterator<Item = NaiveDate>,
) -> Vec<DayTotals> {
    let grouped = group_by(transactions, |txn| txn.date);
    days.map(|date| DayTotals {
        date,
        totals: grouped.get(&date).copied().unwrap_or_default(),
    })
    .collect()
}

/// January through December of `year`; months without activity are zero.
pub fn monthly_series(transactions: &[Transaction], year: i32) -> Vec<MonthTotals> {
    let months = (1..=12).filter_map(|month| YearMonth::new(year, month));
    series_for_months(transactions, months)
}

/// One entry per calendar day of `month`.
pub fn daily_series(transactions: &[Transaction], month: YearMonth) -> Vec<DayTotals> {
    series_for_days(transactions, month.days())
}

/// `count` months ending with the month of `today`, oldest first.
pub fn trailing_months(
    transactions: &[Transaction],
    today: NaiveDate,
    count: usize,
) -> Vec<MonthTotals> {
    let current = YearMonth::of(today);
    let count = i32::try_from(count).unwrap_or(i32::MAX);
    let months = (0..count).rev().map(|back| current.shift(-back));
    series_for_months(transactions, months)
}

/// `count` days ending with `today`, oldest first.
pub fn trailing_days(transactions: &[Transaction], today: NaiveDate, count: usize) -> Vec<DayTotals> {
    let days = (0..count as i64)
        .rev()
        .filter_map(|back| today.checked_sub_signed(Duration::days(back)));
    series_for_days(transactions, days)
}

/// Per-date totals for the given selection, in date order.
pub fn cash_flow_by_day(transactions: &[Transaction]) -> Vec<DayTotals> {
    group_by(transactions, |txn| txn.date)
        .into_iter()
        .map(|(date, totals)| DayTotals { date, totals })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotals {
    pub category: String,
    pub income: f64,
    pub expense: f64,
}

impl CategoryTotals {
    /// Combined volume (income plus expense).
    pub fn total(&self) -> f64 {
        self.income + self.expense
    }
}

/// Category rows in first-seen order plus the grand total used for shares.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown {
    pub rows: Vec<CategoryTotals>,
    pub total_sum: f64,
}

impl CategoryBreakdown {
    /// Percentage of the grand total carried by `row`; zero when nothing was spent or earned.
    pub fn share(&self, row: &CategoryTotals) -> f64 {
        if self.total_sum == 0.0 {
            0.0
        } else {
            row.total() / self.total_sum * 100.0
        }
    }

    pub fn expense_rows(&self) -> impl Iterator<Item = &CategoryTotals> {
        self.rows.iter().filter(|row| row.expense > 0.0)
    }

    pub fn income_rows(&self) -> impl Iterator<Item = &CategoryTotals> {
        self.rows.iter().filter(|row| row.income > 0.0)
    }
}

pub fn category_breakdown(transactions: &[Transaction]) -> CategoryBreakdown {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<CategoryTotals> = Vec::new();
    for txn in transactions {
        let slot = *index.entry(txn.category.as_str()).or_insert_with(|| {
            rows.push(CategoryTotals {
                category: txn.category.clone(),
                income: 0.0,
                expense: 0.0,
            });
            rows.len() - 1
        });
        match txn.kind {
            TransactionKind::Income => rows[slot].income += txn.amount,
            TransactionKind::Expense => rows[slot].expense += txn.amount,
        }
    }
    let total_sum = rows.iter().map(CategoryTotals::total).sum();
    CategoryBreakdown { rows, total_sum }
}

/// Expense categories by amount, largest first. Ties keep first-seen order.
pub fn top_expense_categories(transactions: &[Transaction], limit: usize) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = category_breakdown(transactions)
        .rows
        .into_iter()
        .filter(|row| row.expense > 0.0)
        .map(|row| (row.category, row.expense))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

/// Year-level figures derived from a monthly series.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSummary {
    pub totals: Totals,
    pub average_income: f64,
    pub average_expense: f64,
    pub average_balance: f64,
    pub best_month: Option<MonthTotals>,
}

impl YearSummary {
    /// Averages divide by the number of months in the series and are zero
    /// for an empty series. The best month is the first one with the highest balance.
    pub fn from_series(series: &[MonthTotals]) -> Self {
        let mut totals = Totals::default();
        for entry in series {
            totals.merge(&entry.totals);
        }
        let months = series.len() as f64;
        let average = |value: f64| if series.is_empty() { 0.0 } else { value / months };

        let best_month = series.iter().fold(None::<&MonthTotals>, |best, current| {
            match best {
                Some(best) if current.totals.balance() <= best.totals.balance() => Some(best),
                _ => Some(current),
            }
        });

        Self {
            average_income: average(totals.income),
            average_expense: average(totals.expense),
            average_balance: average(totals.balance()),
            totals,
            best_month: best_month.copied(),
        }
    }
}

/// Years that have transactions, newest first; the current year when there are none.
pub fn years_with_data(transactions: &[Transaction], today: NaiveDate) -> Vec<i32> {
    if transactions.is_empty() {
        return vec![today.year()];
    }
    transactions
        .iter()
        .map(|txn| txn.date.year())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect()
}
