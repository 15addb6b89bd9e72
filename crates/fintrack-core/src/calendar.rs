//! Month calendar projection and per-day detail view.

use chrono::{Datelike, NaiveDate};
use fintrack_domain::{Transaction, YearMonth};

use crate::summary::{daily_series, Totals};

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub totals: Totals,
    pub is_today: bool,
}

impl CalendarDay {
    pub fn has_transactions(&self) -> bool {
        !self.totals.is_empty()
    }
}

/// One month laid out for a Sunday-first week grid.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub month: YearMonth,
    /// Empty cells before the 1st (Sunday = 0).
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

impl MonthGrid {
    pub fn build(transactions: &[Transaction], month: YearMonth, today: NaiveDate) -> Self {
        let days = daily_series(transactions, month)
            .into_iter()
            .map(|entry| CalendarDay {
                date: entry.date,
                totals: entry.totals,
                is_today: entry.date == today,
            })
            .collect();
        Self {
            month,
            leading_blanks: month.first_day().weekday().num_days_from_sunday(),
            days,
        }
    }

    pub fn prev(&self) -> YearMonth {
        self.month.pred()
    }

    pub fn next(&self) -> YearMonth {
        self.month.succ()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.days.iter().find(|day| day.date == date)
    }

    /// Sum over every day of the month.
    pub fn month_totals(&self) -> Totals {
        let mut totals = Totals::default();
        for day in &self.days {
            totals.merge(&day.totals);
        }
        totals
    }

    /// Rows of seven cells, `None` for padding before the 1st and after the last day.
    pub fn weeks(&self) -> Vec<Vec<Option<&CalendarDay>>> {
        let mut cells: Vec<Option<&CalendarDay>> = (0..self.leading_blanks).map(|_| None).collect();
        cells.extend(self.days.iter().map(Some));
        while cells.len() % 7 != 0 {
            cells.push(None);
        }
        cells.chunks(7).map(<[_]>::to_vec).collect()
    }
}

/// Everything recorded on one date, split by type.
#[derive(Debug, Clone, PartialEq)]
pub struct DayDetails {
    pub date: NaiveDate,
    pub income: Vec<Transaction>,
    pub expenses: Vec<Transaction>,
    pub totals: Totals,
}

impl DayDetails {
    pub fn for_date(transactions: &[Transaction], date: NaiveDate) -> Self {
        let (income, expenses): (Vec<Transaction>, Vec<Transaction>) = transactions
            .iter()
            .filter(|txn| txn.date == date)
            .cloned()
            .partition(Transaction::is_income);
        let totals = income.iter().chain(expenses.iter()).collect();
        Self {
            date,
            income,
            expenses,
            totals,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.expenses.is_empty()
    }
}
