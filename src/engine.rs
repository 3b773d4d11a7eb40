//! One-call month report over a snapshot.
//!
//! The engine wires the pure `hearth-core` aggregators together in the order
//! every screen needs them: prior-month rollovers first, then each category
//! and each source against the current month, then the allocation check.

use std::collections::{BTreeMap, HashSet};

use chrono::Local;
use hearth_config::Config;
use hearth_core::{
    spend_by_category, sum_by_currency, BudgetConsistencyValidator, CategoryBudget,
    CategoryBudgetAggregator, FundingContext, PeriodRolloverCalculator, Rollovers, SourceSummary,
    SourceSummaryAggregator, ValidationReport, ValidationThresholds,
};
use hearth_domain::{CurrencyCode, Expense, Income, Period};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::Result, storage::BudgetSnapshot};

/// An allocation rule whose income source no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrphanedAllocation {
    pub category_id: Uuid,
    pub category_name: String,
    pub source_id: Uuid,
}

/// Reference problems found while building a report. None of them stop the
/// report; they explain numbers that look too small.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Month incomes pointing at a deleted source.
    pub orphaned_incomes: Vec<Uuid>,
    /// Month incomes with no source at all.
    pub unlinked_incomes: usize,
    /// Month expenses pointing at a deleted category.
    pub orphaned_expenses: Vec<Uuid>,
    /// Month expenses without a category (manual balance corrections).
    pub balance_corrections: usize,
    pub orphaned_allocations: Vec<OrphanedAllocation>,
}

impl Diagnostics {
    pub fn has_issues(&self) -> bool {
        !self.orphaned_incomes.is_empty()
            || !self.orphaned_expenses.is_empty()
            || !self.orphaned_allocations.is_empty()
    }
}

/// Month totals for one currency. Never mixed with other currencies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencyTotals {
    pub income: f64,
    pub allocated: f64,
    pub spent: f64,
    pub remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthReport {
    pub period: Period,
    pub currency: CurrencyCode,
    pub totals: BTreeMap<CurrencyCode, CurrencyTotals>,
    pub categories: Vec<CategoryBudget>,
    pub sources: Vec<SourceSummary>,
    pub rollovers: Rollovers,
    pub validation: ValidationReport,
    pub diagnostics: Diagnostics,
}

impl MonthReport {
    pub fn category(&self, id: Uuid) -> Option<&CategoryBudget> {
        self.categories.iter().find(|budget| budget.category_id == id)
    }

    pub fn source(&self, id: Uuid) -> Option<&SourceSummary> {
        self.sources.iter().find(|summary| summary.source_id == id)
    }

    pub fn over_budget(&self) -> impl Iterator<Item = &CategoryBudget> {
        self.categories.iter().filter(|budget| budget.is_over_budget())
    }
}

#[derive(Debug, Clone, Default)]
pub struct BudgetEngine {
    currency: CurrencyCode,
    validator: BudgetConsistencyValidator,
}

impl BudgetEngine {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            currency: config.currency.clone(),
            validator: BudgetConsistencyValidator::new(config.validation_thresholds()?),
        })
    }

    pub fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_thresholds(mut self, thresholds: ValidationThresholds) -> Self {
        self.validator = BudgetConsistencyValidator::new(thresholds);
        self
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn month_report(&self, snapshot: &BudgetSnapshot, period: Period) -> MonthReport {
        let currency = &self.currency;
        let sources = &snapshot.income_sources;
        let categories = &snapshot.categories;

        let prior = period.previous();
        let rollovers = PeriodRolloverCalculator::compute(
            categories,
            &snapshot.incomes_in(prior),
            &snapshot.expenses_in(prior),
            sources,
            currency,
        );

        let incomes = snapshot.incomes_in(period);
        let expenses = snapshot.expenses_in(period);
        let ctx = FundingContext::new(sources, &incomes, currency);

        let category_budgets: Vec<CategoryBudget> = categories
            .iter()
            .map(|category| {
                CategoryBudgetAggregator::compute_with_context(&ctx, category, &expenses, &rollovers)
            })
            .collect();

        let spend = spend_by_category(&expenses, currency);
        let source_summaries: Vec<SourceSummary> = sources
            .iter()
            .map(|source| {
                SourceSummaryAggregator::compute_with_context(
                    &ctx, source, &incomes, categories, &spend,
                )
            })
            .collect();

        let validation = self.validator.validate(categories, sources, &incomes, currency);
        let diagnostics = self.diagnose(snapshot, &incomes, &expenses);

        let mut totals: BTreeMap<CurrencyCode, CurrencyTotals> = BTreeMap::new();
        for (code, income) in sum_by_currency(&incomes, currency) {
            totals.entry(code).or_default().income += income;
        }
        for budget in &category_budgets {
            for (code, bucket) in &budget.currencies {
                let entry = totals.entry(code.clone()).or_default();
                entry.allocated += bucket.allocated;
                entry.spent += bucket.spent;
                entry.remaining += bucket.remaining;
            }
        }

        tracing::info!(
            period = %period,
            categories = category_budgets.len(),
            sources = source_summaries.len(),
            valid = validation.is_valid,
            "month report built"
        );

        MonthReport {
            period,
            currency: currency.clone(),
            totals,
            categories: category_budgets,
            sources: source_summaries,
            rollovers,
            validation,
            diagnostics,
        }
    }

    /// Report for the month containing today's local date.
    pub fn current_month_report(&self, snapshot: &BudgetSnapshot) -> MonthReport {
        self.month_report(snapshot, Period::containing(Local::now().date_naive()))
    }

    fn diagnose(
        &self,
        snapshot: &BudgetSnapshot,
        incomes: &[Income],
        expenses: &[Expense],
    ) -> Diagnostics {
        let source_ids: HashSet<Uuid> = snapshot.income_sources.iter().map(|s| s.id).collect();
        let category_ids: HashSet<Uuid> = snapshot.categories.iter().map(|c| c.id).collect();
        let mut diagnostics = Diagnostics::default();

        for income in incomes {
            match income.source_id {
                Some(id) if !source_ids.contains(&id) => diagnostics.orphaned_incomes.push(income.id),
                Some(_) => {}
                None => diagnostics.unlinked_incomes += 1,
            }
        }
        for expense in expenses {
            match expense.category_id {
                Some(id) if !category_ids.contains(&id) => {
                    diagnostics.orphaned_expenses.push(expense.id)
                }
                Some(_) => {}
                None => diagnostics.balance_corrections += 1,
            }
        }
        for category in &snapshot.categories {
            for source_id in category.allocations.iter().filter_map(|a| a.source_id) {
                if !source_ids.contains(&source_id) {
                    diagnostics.orphaned_allocations.push(OrphanedAllocation {
                        category_id: category.id,
                        category_name: category.name.clone(),
                        source_id,
                    });
                }
            }
        }

        if diagnostics.has_issues() {
            tracing::warn!(
                orphaned_incomes = diagnostics.orphaned_incomes.len(),
                orphaned_expenses = diagnostics.orphaned_expenses.len(),
                orphaned_allocations = diagnostics.orphaned_allocations.len(),
                "snapshot has dangling references"
            );
        }
        diagnostics
    }
}
