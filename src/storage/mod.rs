pub mod json_backend;

use std::path::Path;

use hearth_domain::{Category, Expense, Income, IncomeSource, Period};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Everything the engine reads for one household: the data-access side's
/// handoff. Category records may use either funding schema on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    #[serde(default, alias = "incomeSources")]
    pub income_sources: Vec<IncomeSource>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub incomes: Vec<Income>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl BudgetSnapshot {
    /// Incomes dated inside `period`.
    pub fn incomes_in(&self, period: Period) -> Vec<Income> {
        period.select(&self.incomes)
    }

    /// Expenses dated inside `period`.
    pub fn expenses_in(&self, period: Period) -> Vec<Expense> {
        period.select(&self.expenses)
    }
}

/// Abstraction over places a snapshot can be read from and written to.
pub trait SnapshotStore {
    fn load(&self, path: &Path) -> Result<BudgetSnapshot>;
    fn save(&self, snapshot: &BudgetSnapshot, path: &Path) -> Result<()>;
}

pub use json_backend::{load_snapshot, save_snapshot, JsonSnapshotStore};
