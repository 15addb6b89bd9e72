//! fintrack-core
//!
//! Business logic for the finance tracker: the transaction store, the CSV
//! import pipeline, export, filtering, aggregation, calendar and chart series.
//! Depends on fintrack-domain. No CLI, no terminal I/O; persistence goes
//! through the [`storage::KeyValueStore`] trait.

pub mod calendar;
pub mod charts;
pub mod error;
pub mod export;
pub mod filter;
pub mod format;
pub mod import;
pub mod storage;
pub mod store;
pub mod summary;
pub mod time;

pub use calendar::{CalendarDay, DayDetails, MonthGrid};
pub use charts::{ChartSelection, ChartsReport, DefaultTooltip, SeriesKind, TooltipFormatter};
pub use error::{CoreError, CoreResult};
pub use export::{export_csv, export_file_name, template_csv, template_file_name};
pub use filter::{recent, FilterCriteria, PeriodFilter};
pub use format::{format_axis_thousands, format_currency, format_display_date, format_share};
pub use import::{CsvImporter, ImportIssue, ImportProgress, ImportResult, PendingImport, RowError};
pub use storage::{KeyValueStore, MemoryStore, STORAGE_KEY};
pub use store::TransactionStore;
pub use summary::*;
pub use time::{Clock, FixedClock, SystemClock};
