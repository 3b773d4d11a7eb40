#![doc(test(attr(deny(warnings))))]

//! Hearth Budget turns income, expense and allocation records into
//! per-category, per-currency month figures with carry-over and debt.
//!
//! The math lives in `hearth-core`; this crate adds snapshot storage, the
//! [`engine::BudgetEngine`] facade, currency display and text reports.

pub mod currency;
pub mod engine;
pub mod errors;
pub mod report;
pub mod storage;
pub mod utils;

pub use hearth_config;
pub use hearth_core;
pub use hearth_domain;

pub use engine::{BudgetEngine, Diagnostics, MonthReport};
pub use errors::{EngineError, Result};
pub use storage::{load_snapshot, save_snapshot, BudgetSnapshot};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Hearth Budget tracing initialized.");
    });
}
