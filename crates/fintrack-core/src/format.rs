//! Locale-aware presentation helpers for amounts and dates.

use chrono::NaiveDate;
use fintrack_domain::Language;

struct NumberStyle {
    symbol: &'static str,
    thousands: char,
    decimal: char,
}

fn style(language: Language) -> NumberStyle {
    match language {
        Language::Portuguese => NumberStyle {
            symbol: "R$ ",
            thousands: '.',
            decimal: ',',
        },
        Language::English => NumberStyle {
            symbol: "$",
            thousands: ',',
            decimal: '.',
        },
    }
}

fn group_thousands(mut value: u64, separator: char) -> String {
    let mut groups = Vec::new();
    loop {
        if value < 1000 {
            groups.push(value.to_string());
            break;
        }
        groups.push(format!("{:03}", value % 1000));
        value /= 1000;
    }
    groups.reverse();
    groups.join(&separator.to_string())
}

/// `R$ 1.234,56` in Portuguese, `$1,234.56` in English. Negatives get a leading `-`.
pub fn format_currency(amount: f64, language: Language) -> String {
    let style = style(language);
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{sign}{}{}{}{:02}",
        style.symbol,
        group_thousands(cents / 100, style.thousands),
        style.decimal,
        cents % 100
    )
}

/// Compact axis label in thousands, e.g. `R$ 12k`.
pub fn format_axis_thousands(amount: f64, language: Language) -> String {
    let thousands = (amount / 1000.0).round();
    let thousands = if thousands == 0.0 { 0.0 } else { thousands };
    format!("{}{thousands:.0}k", style(language).symbol)
}

pub fn format_display_date(date: NaiveDate, language: Language) -> String {
    date.format(language.date_format()).to_string()
}

/// One-decimal percentage such as `12.5%`.
pub fn format_share(percent: f64) -> String {
    format!("{percent:.1}%")
}
