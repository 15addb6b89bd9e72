//! Chart series for the analytics view and the typed tooltip formatter.

use chrono::{Datelike, NaiveDate};
use fintrack_domain::{Language, Transaction};

use crate::{
    format::{format_currency, format_display_date},
    summary::{
        cash_flow_by_day, category_breakdown, monthly_series, top_expense_categories,
        trailing_days, trailing_months, CategoryBreakdown, DayTotals, GroupKey, MonthTotals,
        Totals, YearSummary,
    },
};

pub const TREND_MONTHS: usize = 6;
pub const CASH_FLOW_DAYS: usize = 30;
pub const TOP_EXPENSE_CATEGORIES: usize = 8;

/// Year and optional month the category and cash-flow charts are scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSelection {
    pub year: i32,
    pub month: Option<u32>,
}

impl ChartSelection {
    pub fn new(year: i32, month: Option<u32>) -> Self {
        Self { year, month }
    }

    /// Whole current year.
    pub fn for_today(today: NaiveDate) -> Self {
        Self::new(today.year(), None)
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        date.year() == self.year && self.month.map_or(true, |month| date.month() == month)
    }

    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|txn| self.matches(txn.date))
            .cloned()
            .collect()
    }
}

/// Every series the analytics view draws.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartsReport {
    pub selection: ChartSelection,
    /// Twelve months of the selected year.
    pub evolution: Vec<MonthTotals>,
    /// Trailing months ending at today's month, independent of the selection.
    pub trend: Vec<MonthTotals>,
    pub categories: CategoryBreakdown,
    pub top_expenses: Vec<(String, f64)>,
    /// Per-day totals inside the selection.
    pub daily_cash_flow: Vec<DayTotals>,
    /// Trailing days ending today, zero-filled.
    pub recent_days: Vec<DayTotals>,
    pub year_summary: YearSummary,
    pub has_data: bool,
}

impl ChartsReport {
    pub fn build(transactions: &[Transaction], selection: ChartSelection, today: NaiveDate) -> Self {
        let selected = selection.apply(transactions);
        let evolution = monthly_series(transactions, selection.year);
        let year_summary = YearSummary::from_series(&evolution);
        Self {
            selection,
            trend: trailing_months(transactions, today, TREND_MONTHS),
            categories: category_breakdown(&selected),
            top_expenses: top_expense_categories(&selected, TOP_EXPENSE_CATEGORIES),
            daily_cash_flow: cash_flow_by_day(&selected),
            recent_days: trailing_days(transactions, today, CASH_FLOW_DAYS),
            evolution,
            year_summary,
            has_data: !transactions.is_empty(),
        }
    }
}

/// Closed set of series a tooltip can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Evolution,
    Trend,
    CategoryPie,
    DailyCashFlow,
}

/// Renders the hover text for one data point.
pub trait TooltipFormatter {
    fn format(&self, kind: SeriesKind, key: &GroupKey, totals: &Totals) -> String;
}

/// Plain-text tooltips with localized labels and currency.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTooltip {
    pub language: Language,
}

impl DefaultTooltip {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    fn labels(&self) -> [&'static str; 4] {
        match self.language {
            Language::Portuguese => ["Ganhos", "Gastos", "Saldo", "Total"],
            Language::English => ["Income", "Expenses", "Balance", "Total"],
        }
    }

    fn title(&self, kind: SeriesKind, key: &GroupKey) -> String {
        match key {
            GroupKey::Day(date) => format_display_date(*date, self.language),
            GroupKey::Month(month) => match kind {
                SeriesKind::Trend => format!(
                    "{}/{:02}",
                    self.language.short_month_name(month.month()),
                    month.year().rem_euclid(100)
                ),
                _ => self.language.short_month_name(month.month()).to_string(),
            },
            GroupKey::Category(name) => name.clone(),
        }
    }
}

impl TooltipFormatter for DefaultTooltip {
    fn format(&self, kind: SeriesKind, key: &GroupKey, totals: &Totals) -> String {
        let [income, expense, balance, total] = self.labels();
        let money = |value: f64| format_currency(value, self.language);
        let mut lines = vec![self.title(kind, key)];
        match kind {
            SeriesKind::CategoryPie => {
                lines.push(format!("{total}: {}", money(totals.income + totals.expense)));
                if totals.income > 0.0 {
                    lines.push(format!("{income}: {}", money(totals.income)));
                }
                if totals.expense > 0.0 {
                    lines.push(format!("{expense}: {}", money(totals.expense)));
                }
            }
            SeriesKind::Evolution | SeriesKind::Trend | SeriesKind::DailyCashFlow => {
                lines.push(format!("{income}: {}", money(totals.income)));
                lines.push(format!("{expense}: {}", money(totals.expense)));
                lines.push(format!("{balance}: {}", money(totals.balance())));
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_domain::{NewTransaction, TransactionKind, YearMonth};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(on: NaiveDate, amount: f64, category: &str, kind: TransactionKind) -> Transaction {
        NewTransaction::new(on, amount, "entry", category, kind).into_transaction(Uuid::new_v4())
    }

    #[test]
    fn report_scopes_category_charts_to_selection() {
        let txns = vec![
            txn(date(2025, 3, 2), 500.0, "Trabalho", TransactionKind::Income),
            txn(date(2025, 3, 9), 40.0, "Comida", TransactionKind::Expense),
            txn(date(2025, 4, 1), 70.0, "Lazer", TransactionKind::Expense),
            txn(date(2024, 3, 1), 99.0, "Casa", TransactionKind::Expense),
        ];
        let report = ChartsReport::build(&txns, ChartSelection::new(2025, Some(3)), date(2025, 4, 15));
        assert!(report.has_data);
        assert_eq!(report.evolution.len(), 12);
        assert_eq!(report.evolution[3].totals.expense, 70.0);
        assert_eq!(report.trend.len(), TREND_MONTHS);
        assert_eq!(report.trend[5].month, YearMonth::new(2025, 4).unwrap());
        assert_eq!(report.recent_days.len(), CASH_FLOW_DAYS);
        assert_eq!(report.categories.rows.len(), 2);
        assert_eq!(report.top_expenses, vec![("Comida".to_string(), 40.0)]);
        assert_eq!(report.daily_cash_flow.len(), 2);
        assert_eq!(
            report.year_summary.best_month.unwrap().month,
            YearMonth::new(2025, 3).unwrap()
        );
    }

    #[test]
    fn whole_year_selection() {
        let selection = ChartSelection::for_today(date(2025, 8, 1));
        assert!(selection.matches(date(2025, 1, 1)));
        assert!(!selection.matches(date(2024, 12, 31)));
        let empty = ChartsReport::build(&[], selection, date(2025, 8, 1));
        assert!(!empty.has_data);
        assert!(empty.year_summary.totals.is_empty());
    }

    #[test]
    fn tooltips_vary_by_series() {
        let tooltip = DefaultTooltip::new(Language::Portuguese);
        let totals = Totals {
            income: 1500.0,
            expense: 250.5,
            income_count: 1,
            expense_count: 2,
        };
        let month = GroupKey::Month(YearMonth::new(2025, 3).unwrap());
        assert_eq!(
            tooltip.format(SeriesKind::Evolution, &month, &totals),
            "mar\nGanhos: R$ 1.500,00\nGastos: R$ 250,50\nSaldo: R$ 1.249,50"
        );
        assert!(tooltip
            .format(SeriesKind::Trend, &month, &totals)
            .starts_with("mar/25\n"));

        let food = GroupKey::Category("Comida".into());
        let expense_only = Totals {
            expense: 80.0,
            expense_count: 1,
            ..Totals::default()
        };
        assert_eq!(
            DefaultTooltip::new(Language::English).format(SeriesKind::CategoryPie, &food, &expense_only),
            "Comida\nTotal: $80.00\nExpenses: $80.00"
        );
    }
}
