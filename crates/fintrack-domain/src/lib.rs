//! fintrack-domain
//!
//! Pure domain models for the finance tracker (transactions, candidates, patches,
//! localized labels and calendar months).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod category;
pub mod common;
pub mod transaction;

pub use category::*;
pub use common::*;
pub use transaction::*;
