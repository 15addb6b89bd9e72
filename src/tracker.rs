//! Application facade wiring configuration, storage, the clock and the core
//! engines behind one handle.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use fintrack_config::{default_base_dir, Config, ConfigManager};
use fintrack_core::{
    export_csv, export_file_name, recent, template_csv, template_file_name, ChartSelection,
    ChartsReport, Clock, CsvImporter, DayDetails, FilterCriteria, ImportProgress, KeyValueStore,
    MonthGrid, PendingImport, SystemClock, Totals, TransactionStore,
};
use fintrack_domain::{Language, NewTransaction, Transaction, TransactionPatch, YearMonth};
use fintrack_storage_json::JsonFileStore;
use tracing::info;
use uuid::Uuid;

use crate::errors::Result;

/// Dashboard cards plus the recent-transactions list.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub month: YearMonth,
    /// Totals for the current month within the filtered view.
    pub overview: Totals,
    pub recent: Vec<Transaction>,
    /// Size of the filtered view.
    pub visible: usize,
    pub active_filters: usize,
}

pub struct FinanceTracker {
    config: Config,
    store: TransactionStore,
    clock: Box<dyn Clock>,
}

impl FinanceTracker {
    /// Loads preferences from `$FINTRACK_HOME` (or `~/.fintrack`) and opens the
    /// data directory they point at.
    pub fn open_default() -> Result<Self> {
        let base = default_base_dir();
        let manager = ConfigManager::with_base_dir(base.clone())?;
        let config = manager.load()?;
        Self::open(config, &base)
    }

    /// Opens the JSON file store under `config`'s data directory.
    pub fn open(config: Config, base_dir: &Path) -> Result<Self> {
        let data_dir = config.resolve_data_dir(base_dir);
        let backend = JsonFileStore::new(data_dir)?;
        Ok(Self::with_backend(
            config,
            Box::new(backend),
            Box::new(SystemClock),
        ))
    }

    pub fn with_backend(
        config: Config,
        backend: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let store = TransactionStore::load(backend);
        info!(transactions = store.len(), "finance tracker ready");
        Self {
            config,
            store,
            clock,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn language(&self) -> Language {
        self.config.language
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub fn add(&mut self, candidate: NewTransaction) -> Result<Transaction> {
        Ok(self.store.add(candidate)?)
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Option<Transaction>> {
        Ok(self.store.remove(id)?)
    }

    pub fn update(&mut self, id: Uuid, patch: TransactionPatch) -> Result<Option<Transaction>> {
        Ok(self.store.update(id, patch)?)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.clear()?;
        info!("all transactions cleared");
        Ok(())
    }

    pub fn filtered(&self, criteria: &FilterCriteria) -> Vec<Transaction> {
        criteria.apply(self.store.transactions(), self.today())
    }

    pub fn dashboard(&self, criteria: &FilterCriteria) -> Dashboard {
        let visible = self.filtered(criteria);
        let month = YearMonth::of(self.today());
        Dashboard {
            month,
            overview: fintrack_core::month_overview(&visible, month),
            recent: recent(&visible, self.config.recent_limit),
            visible: visible.len(),
            active_filters: criteria.active_count(),
        }
    }

    pub fn calendar(&self, month: YearMonth, criteria: &FilterCriteria) -> MonthGrid {
        MonthGrid::build(&self.filtered(criteria), month, self.today())
    }

    pub fn day_details(&self, date: NaiveDate, criteria: &FilterCriteria) -> DayDetails {
        DayDetails::for_date(&self.filtered(criteria), date)
    }

    pub fn charts(&self, selection: ChartSelection, criteria: &FilterCriteria) -> ChartsReport {
        ChartsReport::build(&self.filtered(criteria), selection, self.today())
    }

    pub fn years(&self) -> Vec<i32> {
        self.store.years(self.today())
    }

    pub fn importer(&self) -> CsvImporter {
        CsvImporter::new(self.config.language).with_progress_batch(self.config.progress_batch)
    }

    /// Runs the pipeline over a file without touching the store.
    pub fn preview_import(&self, path: &Path) -> PendingImport {
        PendingImport::new(self.importer().import_file(path, self.store.transactions()))
    }

    pub fn preview_import_text(&self, content: &str) -> PendingImport {
        PendingImport::new(self.importer().run(content, self.store.transactions()))
    }

    pub fn preview_import_text_with_progress<F>(
        &self,
        content: &str,
        on_progress: F,
    ) -> PendingImport
    where
        F: FnMut(ImportProgress),
    {
        PendingImport::new(self.importer().run_with_progress(
            content,
            self.store.transactions(),
            on_progress,
        ))
    }

    pub fn confirm_import(&mut self, pending: PendingImport) -> Result<Vec<Transaction>> {
        Ok(pending.confirm(&mut self.store)?)
    }

    pub fn export_csv(&self) -> Result<String> {
        Ok(export_csv(self.store.transactions(), self.config.language)?)
    }

    /// Writes every stored transaction to a dated CSV in `dir`.
    pub fn export_to(&self, dir: &Path) -> Result<PathBuf> {
        let content = self.export_csv()?;
        let path = dir.join(export_file_name(self.config.language, self.today()));
        write_file(&path, &content)?;
        info!(path = %path.display(), rows = self.store.len(), "transactions exported");
        Ok(path)
    }

    pub fn write_template(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(template_file_name(self.config.language));
        write_file(&path, &template_csv(self.config.language))?;
        info!(path = %path.display(), "import template written");
        Ok(path)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.config.resolve_export_dir()
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

impl std::fmt::Debug for FinanceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceTracker")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_core::{FixedClock, MemoryStore, PeriodFilter};
    use fintrack_domain::TransactionKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tracker(today: NaiveDate) -> FinanceTracker {
        FinanceTracker::with_backend(
            Config::default(),
            Box::new(MemoryStore::new()),
            Box::new(FixedClock::new(today)),
        )
    }

    #[test]
    fn dashboard_reflects_current_month_of_filtered_view() {
        let mut app = tracker(date(2025, 1, 20));
        app.add(NewTransaction::new(date(2025, 1, 2), 3000.0, "Salary", "Trabalho", TransactionKind::Income))
            .unwrap();
        app.add(NewTransaction::new(date(2025, 1, 3), 500.0, "Rent", "Casa", TransactionKind::Expense))
            .unwrap();
        app.add(NewTransaction::new(date(2024, 12, 3), 50.0, "Old", "Casa", TransactionKind::Expense))
            .unwrap();

        let board = app.dashboard(&FilterCriteria::default());
        assert_eq!(board.overview.income, 3000.0);
        assert_eq!(board.overview.balance(), 2500.0);
        assert_eq!(board.recent.first().unwrap().description, "Rent");
        assert_eq!(board.visible, 3);

        let casa = FilterCriteria::new().with_category("Casa");
        let board = app.dashboard(&casa);
        assert_eq!(board.overview.income, 0.0);
        assert_eq!(board.active_filters, 1);
    }

    #[test]
    fn import_preview_then_confirm() {
        let mut app = tracker(date(2025, 1, 20));
        let pending = app.preview_import_text("01/01/2025,Salary,Work,Ganho,\"1000,00\"");
        assert_eq!(app.store().len(), 0);
        let added = app.confirm_import(pending).unwrap();
        assert_eq!(added.len(), 1);
        assert_eq!(app.store().len(), 1);

        let again = app.preview_import_text("01/01/2025,Salary,Work,Ganho,\"1000,00\"");
        assert_eq!(again.result().duplicates, 1);
    }

    #[test]
    fn export_and_template_land_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = tracker(date(2025, 3, 7));
        app.add(NewTransaction::new(date(2025, 3, 1), 9.9, "Coffee", "Comida", TransactionKind::Expense))
            .unwrap();
        let path = app.export_to(dir.path()).unwrap();
        assert!(path.ends_with("transacoes_2025-03-07.csv"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"9,90\""));

        let template = app.write_template(dir.path()).unwrap();
        assert!(template.ends_with("modelo_importacao.csv"));
    }

    #[test]
    fn calendar_and_charts_use_filtered_view() {
        let mut app = tracker(date(2025, 1, 20));
        app.add(NewTransaction::new(date(2025, 1, 2), 10.0, "A", "X", TransactionKind::Expense))
            .unwrap();
        app.add(NewTransaction::new(date(2024, 1, 2), 10.0, "B", "X", TransactionKind::Expense))
            .unwrap();
        let criteria = FilterCriteria::new().with_period(PeriodFilter::CurrentYear);
        let grid = app.calendar(YearMonth::new(2024, 1).unwrap(), &criteria);
        assert!(grid.days.iter().all(|day| !day.has_transactions()));
        let report = app.charts(ChartSelection::new(2025, None), &criteria);
        assert_eq!(report.year_summary.totals.expense, 10.0);
        assert_eq!(app.years(), vec![2025, 2024]);
        assert_eq!(app.day_details(date(2025, 1, 2), &criteria).expenses.len(), 1);
    }
}
