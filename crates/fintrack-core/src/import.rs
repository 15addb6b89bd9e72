//! CSV import pipeline: line parsing, row validation, duplicate detection and
//! the structured result shown to the user before anything is committed.

use std::{collections::HashSet, fmt, fs, path::Path};

use chrono::NaiveDate;
use fintrack_domain::{DuplicateKey, Language, NewTransaction, Transaction, TransactionKind};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{store::TransactionStore, CoreResult};

/// Date layout of imported rows.
pub const IMPORT_DATE_FORMAT: &str = "%d/%m/%Y";
const DEFAULT_PROGRESS_BATCH: usize = 25;

/// Why a row (or the whole document) was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("insufficient data (expected 5 columns, found {found})")]
    InsufficientFields { found: usize },
    #[error("invalid date \"{0}\"")]
    InvalidDate(String),
    #[error("invalid type \"{raw}\" (must be \"{income}\" or \"{expense}\")")]
    InvalidType {
        raw: String,
        income: &'static str,
        expense: &'static str,
    },
    #[error("invalid amount \"{0}\"")]
    InvalidAmount(String),
    #[error("description is required")]
    MissingDescription,
    #[error("category is required")]
    MissingCategory,
    #[error("empty file")]
    EmptyFile,
    #[error("error processing file: {0}")]
    Unreadable(String),
}

/// A rejected row, or a file-level failure when `line` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportIssue {
    pub line: Option<usize>,
    pub error: RowError,
}

impl ImportIssue {
    pub fn at_line(line: usize, error: RowError) -> Self {
        Self {
            line: Some(line),
            error,
        }
    }

    pub fn file_level(error: RowError) -> Self {
        Self { line: None, error }
    }
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "Line {line}: {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Outcome of one import run. Nothing in it has touched the store yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportResult {
    pub errors: Vec<ImportIssue>,
    pub duplicates: usize,
    pub imported: Vec<NewTransaction>,
}

impl ImportResult {
    fn failed(error: RowError) -> Self {
        Self {
            errors: vec![ImportIssue::file_level(error)],
            ..Self::default()
        }
    }

    /// Number of accepted rows.
    pub fn success(&self) -> usize {
        self.imported.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// `true` when the run accepted nothing, so there is nothing to confirm.
    pub fn is_empty(&self) -> bool {
        self.imported.is_empty()
    }

    /// Rendered error lines in the order they were found.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// First `limit` accepted rows.
    pub fn preview(&self, limit: usize) -> &[NewTransaction] {
        &self.imported[..limit.min(self.imported.len())]
    }

    pub fn remaining_after_preview(&self, limit: usize) -> usize {
        self.imported.len().saturating_sub(limit)
    }
}

/// Progress notification emitted while lines are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportProgress {
    pub processed: usize,
    pub total: usize,
}

impl ImportProgress {
    /// Completion percentage in `0..=100`.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.processed as f64 * 100.0 / self.total as f64
        }
    }
}

/// Parses and validates CSV documents for one interface language.
#[derive(Debug, Clone, Copy)]
pub struct CsvImporter {
    language: Language,
    progress_batch: usize,
}

impl Default for CsvImporter {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl CsvImporter {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            progress_batch: DEFAULT_PROGRESS_BATCH,
        }
    }

    pub fn with_progress_batch(mut self, batch: usize) -> Self {
        self.progress_batch = batch.max(1);
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Splits one line into trimmed fields. A double quote toggles the
    /// quoted state and is dropped; commas inside quotes stay in the field.
    pub fn parse_line(line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        for ch in line.chars() {
            match ch {
                '"' => in_quotes = !in_quotes,
                ',' if !in_quotes => {
                    fields.push(current.trim().to_string());
                    current.clear();
                }
                other => current.push(other),
            }
        }
        fields.push(current.trim().to_string());
        fields
    }

    /// Checks one parsed row. The first failing check wins; fields past the
    /// fifth are ignored.
    pub fn validate_row(&self, fields: &[String]) -> Result<NewTransaction, RowError> {
        let [date_raw, description, category, type_raw, amount_raw, ..] = fields else {
            return Err(RowError::InsufficientFields {
                found: fields.len(),
            });
        };

        let date = NaiveDate::parse_from_str(date_raw.trim(), IMPORT_DATE_FORMAT)
            .map_err(|_| RowError::InvalidDate(date_raw.clone()))?;

        let kind = TransactionKind::from_label(type_raw, self.language).ok_or_else(|| {
            RowError::InvalidType {
                raw: type_raw.clone(),
                income: self.language.income_label(),
                expense: self.language.expense_label(),
            }
        })?;

        let amount = parse_amount(amount_raw)
            .ok_or_else(|| RowError::InvalidAmount(amount_raw.clone()))?;

        let description = description.trim().trim_matches('"').trim();
        if description.is_empty() {
            return Err(RowError::MissingDescription);
        }
        let category = category.trim();
        if category.is_empty() {
            return Err(RowError::MissingCategory);
        }

        Ok(NewTransaction::new(date, amount, description, category, kind))
    }

    /// Runs the pipeline over `content` without progress reporting.
    pub fn run(&self, content: &str, existing: &[Transaction]) -> ImportResult {
        self.run_with_progress(content, existing, |_| {})
    }

    /// Runs the pipeline over `content`, calling `on_progress` after every
    /// batch of lines and once at the end.
    pub fn run_with_progress<F>(
        &self,
        content: &str,
        existing: &[Transaction],
        mut on_progress: F,
    ) -> ImportResult
    where
        F: FnMut(ImportProgress),
    {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let lines: Vec<(usize, &str)> = content
            .split('\n')
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .collect();

        let Some((_, first)) = lines.first() else {
            warn!("import rejected: empty file");
            return ImportResult::failed(RowError::EmptyFile);
        };
        let skip = usize::from(self.is_header(first));
        let data = &lines[skip..];

        let mut seen: HashSet<DuplicateKey> =
            existing.iter().map(Transaction::duplicate_key).collect();
        let mut result = ImportResult::default();
        let total = data.len();

        for (processed, (line_no, line)) in data.iter().enumerate() {
            let fields = Self::parse_line(line);
            match self.validate_row(&fields) {
                Ok(candidate) => {
                    if seen.insert(candidate.duplicate_key()) {
                        result.imported.push(candidate);
                    } else {
                        result.duplicates += 1;
                    }
                }
                Err(error) => {
                    debug!(line = *line_no, %error, "import row rejected");
                    result.errors.push(ImportIssue::at_line(*line_no, error));
                }
            }
            let processed = processed + 1;
            if processed % self.progress_batch == 0 && processed < total {
                on_progress(ImportProgress { processed, total });
            }
        }
        on_progress(ImportProgress {
            processed: total,
            total,
        });

        info!(
            accepted = result.success(),
            duplicates = result.duplicates,
            errors = result.errors.len(),
            "import run finished"
        );
        result
    }

    /// Reads `path` and runs the pipeline. Read failures become a single
    /// file-level issue instead of an error.
    pub fn import_file(&self, path: &Path, existing: &[Transaction]) -> ImportResult {
        match read_text(path) {
            Ok(content) => self.run(&content, existing),
            Err(reason) => {
                warn!(path = %path.display(), %reason, "import file unreadable");
                ImportResult::failed(RowError::Unreadable(reason))
            }
        }
    }

    fn is_header(&self, line: &str) -> bool {
        line.to_lowercase()
            .contains(self.language.date_header_token())
    }
}

fn read_text(path: &Path) -> Result<String, String> {
    let bytes = fs::read(path).map_err(|err| err.to_string())?;
    String::from_utf8(bytes).map_err(|_| "file is not valid UTF-8 text".to_string())
}

/// Accepts `,` or `.` as the decimal separator. Only finite values above zero pass.
fn parse_amount(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount > 0.0)
}

/// An import awaiting the user's decision. Dropping it discards the rows.
#[derive(Debug, Clone)]
pub struct PendingImport {
    result: ImportResult,
}

impl PendingImport {
    pub fn new(result: ImportResult) -> Self {
        Self { result }
    }

    pub fn result(&self) -> &ImportResult {
        &self.result
    }

    /// Hands every accepted row to the store, in the order accepted.
    pub fn confirm(self, store: &mut TransactionStore) -> CoreResult<Vec<Transaction>> {
        if self.result.is_empty() {
            return Ok(Vec::new());
        }
        let added = store.add_all(self.result.imported)?;
        info!(count = added.len(), "import confirmed");
        Ok(added)
    }

    pub fn discard(self) {
        debug!(rows = self.result.success(), "import discarded");
    }
}
