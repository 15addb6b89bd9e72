mod common;

use std::fs;

use common::{date, expense, income, temp_base, tracker_at};
use fintrack_core::{ImportProgress, RowError};

const MIXED_FILE: &str = "\
Data,Descrição,Categoria,Tipo,Valor
05/01/2025,Salário,Trabalho,Ganho,\"5000,00\"
06/01/2025,Mercado,Comida,Gasto,\"320,45\"
31/02/2025,Data impossível,Comida,Gasto,10
07/01/2025,Presente,Outros,Doação,50
08/01/2025,,Outros,Gasto,50
09/01/2025,Cinema,Lazer,Gasto,-20
10/01/2025,Curto
";

#[test]
fn file_import_reports_every_bad_line_and_keeps_good_rows() {
    let base = temp_base();
    let path = base.join("extrato.csv");
    fs::write(&path, MIXED_FILE).expect("write csv");

    let mut tracker = tracker_at(&base, date(2025, 1, 31));
    let pending = tracker.preview_import(&path);
    let result = pending.result().clone();

    assert_eq!(result.success(), 2);
    assert_eq!(result.duplicates, 0);
    let lines: Vec<Option<usize>> = result.errors.iter().map(|issue| issue.line).collect();
    assert_eq!(lines, vec![Some(4), Some(5), Some(6), Some(7), Some(8)]);
    assert!(matches!(result.errors[0].error, RowError::InvalidDate(_)));
    assert!(matches!(result.errors[1].error, RowError::InvalidType { .. }));
    assert_eq!(result.errors[2].error, RowError::MissingDescription);
    assert!(matches!(result.errors[3].error, RowError::InvalidAmount(_)));
    assert!(matches!(result.errors[4].error, RowError::InsufficientFields { .. }));
    assert!(result.messages()[0].starts_with("Line 4:"));

    assert!(tracker.store().is_empty());
    let added = tracker.confirm_import(pending).expect("confirm");
    assert_eq!(added.len(), 2);
    assert_eq!(tracker_at(&base, date(2025, 1, 31)).store().len(), 2);
}

#[test]
fn reimporting_an_export_only_finds_duplicates() {
    let base = temp_base();
    let mut tracker = tracker_at(&base, date(2025, 2, 1));
    tracker
        .add(income(date(2025, 1, 5), 5000.0, "Salário", "Trabalho"))
        .expect("add");
    tracker
        .add(expense(date(2025, 1, 6), 320.45, "Mercado, feira", "Comida"))
        .expect("add");

    let exported = tracker.export_csv().expect("export");
    let pending = tracker.preview_import_text(&exported);
    let result = pending.result();
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(result.success(), 0);
    assert_eq!(result.duplicates, 2);
}

#[test]
fn repeated_rows_within_one_file_count_as_duplicates() {
    let base = temp_base();
    let mut tracker = tracker_at(&base, date(2025, 2, 1));
    let content = "01/01/2025,Café,Comida,Gasto,5\n01/01/2025,Café,Comida,Gasto,5\n01/01/2025,Café,Comida,Ganho,5\n";
    let pending = tracker.preview_import_text(content);
    assert_eq!(pending.result().success(), 2);
    assert_eq!(pending.result().duplicates, 1);
    tracker.confirm_import(pending).expect("confirm");

    let again = tracker.preview_import_text(content);
    assert_eq!(again.result().success(), 0);
    assert_eq!(again.result().duplicates, 3);
}

#[test]
fn progress_reaches_the_total() {
    let base = temp_base();
    let tracker = tracker_at(&base, date(2025, 2, 1));
    let content: String = (1..=60)
        .map(|day| format!("{:02}/01/2025,Item {day},Outros,Gasto,1\n", (day % 28) + 1))
        .collect();

    let mut updates: Vec<ImportProgress> = Vec::new();
    let pending = tracker.preview_import_text_with_progress(&content, |progress| updates.push(progress));

    assert_eq!(pending.result().success(), 60);
    let last = updates.last().expect("final progress update");
    assert_eq!(last.processed, last.total);
    assert_eq!(last.percent(), 100.0);
    assert!(updates.windows(2).all(|pair| pair[0].processed <= pair[1].processed));
}

#[test]
fn discarded_preview_leaves_store_untouched() {
    let base = temp_base();
    let tracker = tracker_at(&base, date(2025, 2, 1));
    let pending = tracker.preview_import_text("01/01/2025,Café,Comida,Gasto,5");
    assert_eq!(pending.result().success(), 1);
    pending.discard();
    assert!(tracker_at(&base, date(2025, 2, 1)).store().is_empty());
}

#[test]
fn missing_file_is_a_file_level_error() {
    let base = temp_base();
    let tracker = tracker_at(&base, date(2025, 2, 1));
    let pending = tracker.preview_import(&base.join("absent.csv"));
    let result = pending.result();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].line, None);
    assert!(matches!(result.errors[0].error, RowError::Unreadable(_)));
}
