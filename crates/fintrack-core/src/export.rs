//! CSV export of stored transactions and the downloadable import template.

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use fintrack_domain::{Language, Transaction};

use crate::{import::IMPORT_DATE_FORMAT, CoreError, CoreResult};

/// Renders `transactions` as CSV in the layout the importer reads back.
///
/// The header line is written verbatim; every data field is quoted so the
/// comma decimal separator survives a re-import.
pub fn export_csv(transactions: &[Transaction], language: Language) -> CoreResult<String> {
    let mut buffer = Vec::new();
    buffer.extend_from_slice(language.csv_header().join(",").as_bytes());
    buffer.push(b'\n');

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);
    for txn in transactions {
        writer.write_record([
            txn.date.format(IMPORT_DATE_FORMAT).to_string().as_str(),
            txn.description.as_str(),
            txn.category.as_str(),
            txn.kind.label(language),
            format_export_amount(txn.amount).as_str(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| CoreError::Csv(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| CoreError::Csv(err.to_string()))
}

/// `transacoes_2025-01-31.csv` style name stamped with the export date.
pub fn export_file_name(language: Language, today: NaiveDate) -> String {
    format!(
        "{}_{}.csv",
        language.export_file_stem(),
        today.format("%Y-%m-%d")
    )
}

/// Header plus two sample rows.
pub fn template_csv(language: Language) -> String {
    let rows: [&str; 2] = match language {
        Language::Portuguese => [
            r#"01/01/2025,"Exemplo de ganho",Trabalho,Ganho,1000.00"#,
            r#"02/01/2025,"Exemplo de gasto",Comida,Gasto,50.00"#,
        ],
        Language::English => [
            r#"01/01/2025,"Income example",Work,Income,1000.00"#,
            r#"02/01/2025,"Expense example",Food,Expense,50.00"#,
        ],
    };
    let mut lines = vec![language.csv_header().join(",")];
    lines.extend(rows.iter().map(|row| row.to_string()));
    lines.join("\n")
}

pub fn template_file_name(language: Language) -> &'static str {
    language.template_file_name()
}

fn format_export_amount(amount: f64) -> String {
    format!("{amount:.2}").replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::CsvImporter;
    use fintrack_domain::{NewTransaction, TransactionKind};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            NewTransaction::new(
                date(2025, 1, 5),
                1000.0,
                "Salary",
                "Trabalho",
                TransactionKind::Income,
            )
            .into_transaction(Uuid::new_v4()),
            NewTransaction::new(
                date(2025, 1, 9),
                42.5,
                "Dinner, with friends",
                "Lazer",
                TransactionKind::Expense,
            )
            .into_transaction(Uuid::new_v4()),
        ]
    }

    #[test]
    fn export_writes_header_and_quoted_rows() {
        let csv = export_csv(&sample(), Language::Portuguese).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "Data,Descrição,Categoria,Tipo,Valor");
        assert_eq!(
            lines[1],
            r#""05/01/2025","Salary","Trabalho","Ganho","1000,00""#
        );
        assert_eq!(
            lines[2],
            r#""09/01/2025","Dinner, with friends","Lazer","Gasto","42,50""#
        );
    }

    #[test]
    fn exported_rows_reimport_identically() {
        for language in [Language::Portuguese, Language::English] {
            let txns = sample();
            let csv = export_csv(&txns, language).unwrap();
            let result = CsvImporter::new(language).run(&csv, &[]);
            assert!(result.errors.is_empty(), "{:?}", result.messages());
            let expected: Vec<NewTransaction> = txns.iter().map(NewTransaction::from).collect();
            assert_eq!(result.imported, expected);
        }
    }

    #[test]
    fn template_is_importable() {
        let result = CsvImporter::new(Language::Portuguese).run(&template_csv(Language::Portuguese), &[]);
        assert_eq!(result.success(), 2);
        assert_eq!(template_csv(Language::English).lines().count(), 3);
        assert_eq!(template_file_name(Language::Portuguese), "modelo_importacao.csv");
    }

    #[test]
    fn file_name_carries_export_date() {
        assert_eq!(
            export_file_name(Language::Portuguese, date(2025, 3, 7)),
            "transacoes_2025-03-07.csv"
        );
        assert_eq!(
            export_file_name(Language::English, date(2025, 3, 7)),
            "transactions_2025-03-07.csv"
        );
    }
}
