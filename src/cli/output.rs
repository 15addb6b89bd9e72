use std::{
    fmt,
    io::{self, IsTerminal},
};

use colored::Colorize;
use fintrack_core::{format_currency, format_display_date};
use fintrack_domain::{Language, Transaction, TransactionKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

/// Turns colors off unless the user enabled them and stdout is a terminal.
/// `NO_COLOR` is honoured by `colored` itself.
pub fn configure(color_enabled: bool) {
    if !color_enabled || !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

fn style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()).bold().to_string(),
        MessageKind::Info => text,
        MessageKind::Success => format!("[ok] {text}").bright_green().to_string(),
        MessageKind::Warning => format!("[!] {text}").bright_yellow().to_string(),
        MessageKind::Error => format!("[x] {text}").bright_red().to_string(),
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    match kind {
        MessageKind::Section => println!("\n{}", style(kind, message)),
        MessageKind::Error => eprintln!("{}", style(kind, message)),
        _ => println!("{}", style(kind, message)),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Signed, colored amount: green for income, red for expenses.
pub fn signed_amount(amount: f64, kind: TransactionKind, language: Language) -> String {
    let text = format_currency(amount, language);
    match kind {
        TransactionKind::Income => format!("+{text}").green().to_string(),
        TransactionKind::Expense => format!("-{text}").red().to_string(),
    }
}

/// Balance colored by sign.
pub fn balance(amount: f64, language: Language) -> String {
    let text = format_currency(amount, language);
    if amount < 0.0 {
        text.red().to_string()
    } else {
        text.green().to_string()
    }
}

pub fn transaction_row(txn: &Transaction, language: Language) -> String {
    let id = txn.id.to_string();
    format!(
        "{}  {}  {:<8} {:<16} {}  {}",
        &id[..8],
        format_display_date(txn.date, language),
        txn.kind.label(language),
        txn.category,
        txn.description,
        signed_amount(txn.amount, txn.kind, language)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_styles_carry_markers() {
        colored::control::set_override(false);
        assert_eq!(style(MessageKind::Warning, "careful"), "[!] careful");
        assert_eq!(style(MessageKind::Section, " Summary "), "=== Summary ===");
        assert_eq!(
            signed_amount(10.0, TransactionKind::Expense, Language::English),
            "-$10.00"
        );
    }
}
