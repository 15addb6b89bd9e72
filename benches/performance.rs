use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fintrack_core::{
    monthly_series, CsvImporter, FilterCriteria, KeyValueStore, PeriodFilter, TransactionStore,
    STORAGE_KEY,
};
use fintrack_domain::{Language, NewTransaction, Transaction, TransactionKind};
use fintrack_storage_json::JsonFileStore;
use tempfile::tempdir;
use uuid::Uuid;

const CATEGORIES: [&str; 5] = ["Comida", "Casa", "Transporte", "Lazer", "Trabalho"];

fn sample_transactions(count: usize) -> Vec<Transaction> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    (0..count)
        .map(|idx| {
            let kind = if idx % 5 == 0 {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            NewTransaction::new(
                start + Duration::days((idx % 365) as i64),
                10.0 + (idx % 100) as f64,
                format!("Entry {idx}"),
                CATEGORIES[idx % CATEGORIES.len()],
                kind,
            )
            .into_transaction(Uuid::new_v4())
        })
        .collect()
}

fn sample_csv(rows: usize) -> String {
    let mut content = String::from("Data,Descrição,Categoria,Tipo,Valor\n");
    for idx in 0..rows {
        let day = idx % 28 + 1;
        let month = idx % 12 + 1;
        content.push_str(&format!(
            "{day:02}/{month:02}/2025,Entry {idx},{},Gasto,\"{},50\"\n",
            CATEGORIES[idx % CATEGORIES.len()],
            idx % 500 + 1
        ));
    }
    content
}

fn bench_import(c: &mut Criterion) {
    let content = sample_csv(10_000);
    let existing = sample_transactions(1_000);
    let importer = CsvImporter::new(Language::Portuguese);

    c.bench_function("import_10k_rows", |b| {
        b.iter(|| black_box(importer.run(black_box(&content), &existing)))
    });
}

fn bench_aggregation(c: &mut Criterion) {
    let transactions = sample_transactions(10_000);
    let today = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
    let criteria = FilterCriteria::new()
        .with_period(PeriodFilter::Last90Days)
        .with_search("entry 1");

    c.bench_function("monthly_series_10k", |b| {
        b.iter(|| black_box(monthly_series(&transactions, 2025)))
    });
    c.bench_function("filter_10k", |b| {
        b.iter(|| black_box(criteria.apply(&transactions, today)))
    });
}

fn bench_store_load(c: &mut Criterion) {
    let dir = tempdir().expect("tempdir");
    let backend = JsonFileStore::new(dir.path()).expect("json store");
    let payload = serde_json::to_string(&sample_transactions(10_000)).expect("serialize");
    backend.write(STORAGE_KEY, &payload).expect("seed");

    c.bench_function("store_load_10k", |b| {
        b.iter(|| {
            let store = TransactionStore::load(Box::new(backend.clone()));
            black_box(store.len())
        })
    });
}

criterion_group!(benches, bench_import, bench_aggregation, bench_store_load);
criterion_main!(benches);
