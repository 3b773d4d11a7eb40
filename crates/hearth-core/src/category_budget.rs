//! Per-category, per-currency budget figures for one period.

use std::collections::BTreeMap;

use hearth_domain::{Category, CurrencyCode, Expense, Income, IncomeSource};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    funding::{sum_by_currency, FundingContext},
    numeric::safe_amount,
    rollover::Rollovers,
};

/// Budget figures for one currency of a category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencyBudget {
    /// Funding before carry-over.
    pub base_allocation: f64,
    /// `base_allocation + carry_over`.
    pub allocated: f64,
    pub spent: f64,
    /// `allocated - spent - debt`.
    pub remaining: f64,
    pub debt: f64,
    pub carry_over: f64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub orphaned: bool,
}

impl CurrencyBudget {
    fn from_parts(base_allocation: f64, spent: f64, carry_over: f64, debt: f64) -> Self {
        let allocated = base_allocation + carry_over;
        Self {
            base_allocation,
            allocated,
            spent,
            remaining: allocated - spent - debt,
            debt,
            carry_over,
            orphaned: false,
        }
    }

    /// Spend beyond what was funded, carry-over included. Inherited debt is not
    /// part of the comparison; it shows in `remaining` and `has_debt`.
    pub fn is_over_budget(&self) -> bool {
        self.spent > self.allocated
    }

    pub fn overage(&self) -> f64 {
        (self.spent - self.allocated).max(0.0)
    }

    pub fn has_debt(&self) -> bool {
        self.debt > 0.0
    }

    /// Spend as a percentage of the allocated amount.
    pub fn progress_percent(&self) -> f64 {
        if self.allocated > 0.0 {
            self.spent / self.allocated * 100.0
        } else {
            0.0
        }
    }
}

/// A category's budget for a period.
///
/// The top-level figures sum every currency together and exist for older
/// consumers that show a single number; `currencies` is the real answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBudget {
    pub category_id: Uuid,
    pub name: String,
    pub base_allocation: f64,
    pub allocated: f64,
    pub spent: f64,
    pub remaining: f64,
    pub debt: f64,
    pub carry_over: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub currencies: BTreeMap<CurrencyCode, CurrencyBudget>,
}

impl CategoryBudget {
    pub fn currency(&self, code: &CurrencyCode) -> Option<&CurrencyBudget> {
        self.currencies.get(code)
    }

    /// True when any single currency overspends. The summed figures are never
    /// compared, so spend in one currency cannot hide behind funding in another.
    pub fn is_over_budget(&self) -> bool {
        self.currencies.values().any(CurrencyBudget::is_over_budget)
    }

    /// Overspend per currency, listing only the currencies that are over.
    pub fn overages(&self) -> BTreeMap<CurrencyCode, f64> {
        self.currencies
            .iter()
            .filter(|(_, bucket)| bucket.is_over_budget())
            .map(|(code, bucket)| (code.clone(), bucket.overage()))
            .collect()
    }

    pub fn has_debt(&self) -> bool {
        self.debt > 0.0
    }

    /// Any bucket drew on an income source that no longer exists.
    pub fn is_orphaned(&self) -> bool {
        self.currencies.values().any(|bucket| bucket.orphaned)
    }
}

/// Raw per-currency allocation and spend before rollovers are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct BucketTotals {
    pub base: f64,
    pub spent: f64,
    pub orphaned: bool,
}

/// Allocation buckets merged with this category's expense buckets.
pub(crate) fn category_buckets(
    ctx: &FundingContext<'_>,
    category: &Category,
    expenses: &[Expense],
) -> BTreeMap<CurrencyCode, BucketTotals> {
    let mut buckets: BTreeMap<CurrencyCode, BucketTotals> = ctx
        .category_allocations(category)
        .into_iter()
        .map(|(currency, funded)| {
            (
                currency,
                BucketTotals {
                    base: funded.amount,
                    spent: 0.0,
                    orphaned: funded.orphaned,
                },
            )
        })
        .collect();
    let spent = sum_by_currency(
        expenses.iter().filter(|expense| expense.belongs_to(category.id)),
        ctx.user_currency(),
    );
    for (currency, total) in spent {
        buckets.entry(currency).or_default().spent += total;
    }
    buckets
}

/// Stateless aggregation of a single category.
pub struct CategoryBudgetAggregator;

impl CategoryBudgetAggregator {
    /// Builds the funding lookups and aggregates `category`.
    pub fn compute(
        category: &Category,
        incomes: &[Income],
        expenses: &[Expense],
        sources: &[IncomeSource],
        rollovers: &Rollovers,
        user_currency: &CurrencyCode,
    ) -> CategoryBudget {
        let ctx = FundingContext::new(sources, incomes, user_currency);
        Self::compute_with_context(&ctx, category, expenses, rollovers)
    }

    /// Aggregates `category` against lookups shared across categories.
    pub fn compute_with_context(
        ctx: &FundingContext<'_>,
        category: &Category,
        expenses: &[Expense],
        rollovers: &Rollovers,
    ) -> CategoryBudget {
        let mut buckets = category_buckets(ctx, category, expenses);
        // Rollover-only currencies still surface so inherited debt is visible.
        for currency in rollovers.currencies_for(category.id) {
            buckets.entry(currency).or_default();
        }

        let currencies: BTreeMap<CurrencyCode, CurrencyBudget> = buckets
            .into_iter()
            .map(|(currency, totals)| {
                let carry_over = rollovers.carry_over(category.id, &currency);
                let debt = rollovers.debt(category.id, &currency);
                let mut budget = CurrencyBudget::from_parts(
                    safe_amount(totals.base),
                    safe_amount(totals.spent),
                    carry_over,
                    debt,
                );
                budget.orphaned = totals.orphaned;
                (currency, budget)
            })
            .collect();

        let mut aggregate = CurrencyBudget::default();
        for bucket in currencies.values() {
            aggregate.base_allocation += bucket.base_allocation;
            aggregate.allocated += bucket.allocated;
            aggregate.spent += bucket.spent;
            aggregate.debt += bucket.debt;
            aggregate.carry_over += bucket.carry_over;
        }
        let remaining = aggregate.allocated - aggregate.spent - aggregate.debt;

        tracing::debug!(
            category = %category.name,
            currencies = currencies.len(),
            allocated = aggregate.allocated,
            spent = aggregate.spent,
            "category budget computed"
        );

        CategoryBudget {
            category_id: category.id,
            name: category.name.clone(),
            base_allocation: aggregate.base_allocation,
            allocated: aggregate.allocated,
            spent: aggregate.spent,
            remaining,
            debt: aggregate.debt,
            carry_over: aggregate.carry_over,
            currencies,
        }
    }
}

/// Free-function form of [`CategoryBudgetAggregator::compute`].
pub fn compute_category_budget(
    category: &Category,
    incomes: &[Income],
    expenses: &[Expense],
    sources: &[IncomeSource],
    rollovers: &Rollovers,
    user_currency: &CurrencyCode,
) -> CategoryBudget {
    CategoryBudgetAggregator::compute(category, incomes, expenses, sources, rollovers, user_currency)
}
