#![doc(test(attr(deny(warnings))))]

//! fintrack ties the transaction store, CSV import/export and the
//! aggregation engine together behind [`FinanceTracker`] and a small CLI.

pub mod cli;
pub mod errors;
pub mod tracker;
pub mod utils;

pub use tracker::{Dashboard, FinanceTracker};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!(version = utils::build_info::CLI_VERSION, "fintrack tracing initialized");
    });
}
