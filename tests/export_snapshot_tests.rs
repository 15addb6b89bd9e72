mod common;

use common::{date, expense, income, temp_base, tracker_at};
use fintrack::FinanceTracker;
use fintrack_config::Config;
use fintrack_core::template_csv;
use fintrack_domain::Language;
use insta::assert_snapshot;
use regex::Regex;

#[test]
fn portuguese_export_layout() {
    let base = temp_base();
    let mut tracker = tracker_at(&base, date(2025, 5, 10));
    tracker
        .add(income(date(2025, 5, 1), 4200.0, "Salary", "Trabalho"))
        .expect("add");
    tracker
        .add(expense(date(2025, 5, 2), 1234.5, "Rent, May", "Casa"))
        .expect("add");

    let csv = tracker.export_csv().expect("export");
    assert_snapshot!(csv.trim_end(), @r###"
    Data,Descrição,Categoria,Tipo,Valor
    "01/05/2025","Salary","Trabalho","Ganho","4200,00"
    "02/05/2025","Rent, May","Casa","Gasto","1234,50"
    "###);
}

#[test]
fn english_template_layout() {
    assert_snapshot!(template_csv(Language::English), @r###"
    Date,Description,Category,Type,Amount
    01/01/2025,"Income example",Work,Income,1000.00
    02/01/2025,"Expense example",Food,Expense,50.00
    "###);
}

#[test]
fn export_file_is_stamped_with_todays_date() {
    let base = temp_base();
    let config = Config {
        export_dir: Some(base.join("exports")),
        ..Config::default()
    };
    let tracker = FinanceTracker::open(config, &base).expect("open tracker");

    let path = tracker.export_to(&tracker.export_dir()).expect("export");
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .expect("utf-8 file name");
    let pattern = Regex::new(r"^transacoes_\d{4}-\d{2}-\d{2}\.csv$").expect("valid regex");
    assert!(pattern.is_match(name), "unexpected export name {name}");
    assert!(path.starts_with(base.join("exports")));
}
