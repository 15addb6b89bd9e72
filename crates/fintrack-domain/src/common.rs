//! Shared enums and calendar helpers used across the tracker.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
/// Interface language. Drives every user-facing label, including the CSV
/// type labels and header token recognised by the importer.
pub enum Language {
    #[default]
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "en")]
    English,
}

const MONTHS_PT: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const SHORT_MONTHS_PT: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

const SHORT_MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Portuguese => "pt",
            Language::English => "en",
        }
    }

    pub fn income_label(self) -> &'static str {
        match self {
            Language::Portuguese => "Ganho",
            Language::English => "Income",
        }
    }

    pub fn expense_label(self) -> &'static str {
        match self {
            Language::Portuguese => "Gasto",
            Language::English => "Expense",
        }
    }

    /// Lowercase token whose presence marks the first CSV line as a header.
    pub fn date_header_token(self) -> &'static str {
        match self {
            Language::Portuguese => "data",
            Language::English => "date",
        }
    }

    pub fn csv_header(self) -> [&'static str; 5] {
        match self {
            Language::Portuguese => ["Data", "Descrição", "Categoria", "Tipo", "Valor"],
            Language::English => ["Date", "Description", "Category", "Type", "Amount"],
        }
    }

    pub fn export_file_stem(self) -> &'static str {
        match self {
            Language::Portuguese => "transacoes",
            Language::English => "transactions",
        }
    }

    pub fn template_file_name(self) -> &'static str {
        match self {
            Language::Portuguese => "modelo_importacao.csv",
            Language::English => "import_template.csv",
        }
    }

    /// `chrono` format string for displaying a calendar date.
    pub fn date_format(self) -> &'static str {
        match self {
            Language::Portuguese => "%d/%m/%Y",
            Language::English => "%m/%d/%Y",
        }
    }

    /// Full month name for a 1-based month; empty for out-of-range input.
    pub fn month_name(self, month: u32) -> &'static str {
        let table = match self {
            Language::Portuguese => &MONTHS_PT,
            Language::English => &MONTHS_EN,
        };
        month_lookup(table, month)
    }

    pub fn short_month_name(self, month: u32) -> &'static str {
        let table = match self {
            Language::Portuguese => &SHORT_MONTHS_PT,
            Language::English => &SHORT_MONTHS_EN,
        };
        month_lookup(table, month)
    }
}

fn month_lookup(table: &[&'static str; 12], month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| table.get(idx as usize))
        .copied()
        .unwrap_or("")
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Language::Portuguese => "Português",
            Language::English => "English",
        };
        f.write_str(label)
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pt" | "pt-br" | "portuguese" => Ok(Language::Portuguese),
            "en" | "en-us" | "english" => Ok(Language::English),
            other => Err(format!("unsupported language `{other}`")),
        }
    }
}

/// A calendar month, anchored on its first day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    /// Builds a month from its year and 1-based month number.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// Month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(self) -> i32 {
        self.first.year()
    }

    pub fn month(self) -> u32 {
        self.first.month()
    }

    pub fn first_day(self) -> NaiveDate {
        self.first
    }

    pub fn last_day(self) -> NaiveDate {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(self.first)
    }

    pub fn days_in_month(self) -> u32 {
        self.last_day().day()
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Following month; saturates at the end of the supported calendar.
    pub fn succ(self) -> Self {
        self.shift(1)
    }

    /// Previous month; saturates at the start of the supported calendar.
    pub fn pred(self) -> Self {
        self.shift(-1)
    }

    pub fn shift(self, months: i32) -> Self {
        let magnitude = Months::new(months.unsigned_abs());
        let moved = if months >= 0 {
            self.first.checked_add_months(magnitude)
        } else {
            self.first.checked_sub_months(magnitude)
        };
        moved.map(|first| Self { first }).unwrap_or(self)
    }

    /// Iterates every date of the month in order.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let last = self.last_day();
        self.first.iter_days().take_while(move |date| *date <= last)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (year, month) = value
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got `{value}`"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in `{value}`"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month in `{value}`"))?;
        YearMonth::new(year, month).ok_or_else(|| format!("invalid month `{value}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn year_month_bounds_handle_leap_years() {
        let feb = YearMonth::new(2024, 2).unwrap();
        assert_eq!(feb.last_day(), date(2024, 2, 29));
        assert_eq!(YearMonth::new(2025, 2).unwrap().days_in_month(), 28);
        assert_eq!(feb.days().count(), 29);
    }

    #[test]
    fn year_month_shift_crosses_year_boundaries() {
        let jan = YearMonth::new(2025, 1).unwrap();
        assert_eq!(jan.pred(), YearMonth::new(2024, 12).unwrap());
        assert_eq!(jan.shift(-5), YearMonth::new(2024, 8).unwrap());
        assert_eq!(YearMonth::new(2024, 12).unwrap().succ(), jan);
    }

    #[test]
    fn year_month_of_date_and_parse() {
        let ym = YearMonth::of(date(2025, 3, 17));
        assert_eq!(ym.to_string(), "2025-03");
        assert_eq!("2025-03".parse::<YearMonth>().unwrap(), ym);
        assert!("2025-13".parse::<YearMonth>().is_err());
        assert!(ym.contains(date(2025, 3, 31)));
        assert!(!ym.contains(date(2025, 4, 1)));
    }

    #[test]
    fn language_labels_and_months() {
        assert_eq!(Language::default(), Language::Portuguese);
        assert_eq!(Language::Portuguese.income_label(), "Ganho");
        assert_eq!(Language::English.expense_label(), "Expense");
        assert_eq!(Language::Portuguese.month_name(3), "Março");
        assert_eq!(Language::English.short_month_name(12), "Dec");
        assert_eq!(Language::English.month_name(0), "");
        assert_eq!("EN".parse::<Language>().unwrap(), Language::English);
    }
}
