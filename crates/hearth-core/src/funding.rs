//! Resolves income-source references once and evaluates allocation rules.
//!
//! Every aggregator goes through [`FundingContext`] so the amount/percent math
//! exists in exactly one place.

use std::collections::{BTreeMap, HashMap};

use hearth_domain::{
    Allocation, AllocationKind, Amounted, Category, CurrencyCode, Denominated, Income,
    IncomeSource,
};
use uuid::Uuid;

use crate::numeric::{safe_amount, safe_percent};

/// Result of evaluating one allocation rule for a period.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationValue {
    pub currency: CurrencyCode,
    pub amount: f64,
    /// The rule points at an income source that no longer exists.
    pub orphaned: bool,
}

/// Allocation total for one currency bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FundedAmount {
    pub amount: f64,
    pub orphaned: bool,
}

impl FundedAmount {
    fn absorb(&mut self, value: &AllocationValue) {
        self.amount += value.amount;
        self.orphaned |= value.orphaned;
    }
}

/// Lookup tables built once per aggregation run.
#[derive(Debug, Clone)]
pub struct FundingContext<'a> {
    user_currency: CurrencyCode,
    sources: HashMap<Uuid, &'a IncomeSource>,
    received: HashMap<(Uuid, CurrencyCode), f64>,
}

impl<'a> FundingContext<'a> {
    pub fn new(
        sources: &'a [IncomeSource],
        incomes: &[Income],
        user_currency: &CurrencyCode,
    ) -> Self {
        let mut received: HashMap<(Uuid, CurrencyCode), f64> = HashMap::new();
        for income in incomes {
            if let Some(source_id) = income.source_id {
                *received
                    .entry((source_id, income.currency_or(user_currency)))
                    .or_default() += safe_amount(income.amount());
            }
        }
        Self {
            user_currency: user_currency.clone(),
            sources: sources.iter().map(|source| (source.id, source)).collect(),
            received,
        }
    }

    pub fn user_currency(&self) -> &CurrencyCode {
        &self.user_currency
    }

    pub fn source(&self, id: Uuid) -> Option<&'a IncomeSource> {
        self.sources.get(&id).copied()
    }

    /// Income actually received from `source_id` in `currency` this period.
    pub fn received(&self, source_id: Uuid, currency: &CurrencyCode) -> f64 {
        self.received
            .get(&(source_id, currency.clone()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Evaluates a single rule. Percentages apply to income received in the
    /// rule's currency, or to the source's expected amount when nothing has
    /// arrived yet.
    pub fn evaluate(&self, allocation: &Allocation) -> AllocationValue {
        let currency = allocation.currency_or(&self.user_currency);
        let resolved = allocation.source_id.map(|id| self.source(id));
        let (amount, orphaned) = match (allocation.kind, resolved) {
            (_, Some(None)) => (0.0, true),
            (AllocationKind::Amount, _) => (safe_amount(allocation.value), false),
            (AllocationKind::Percent, None) => (0.0, true),
            (AllocationKind::Percent, Some(Some(source))) => {
                let received = self.received(source.id, &currency);
                let base = if received > 0.0 {
                    received
                } else {
                    safe_amount(source.amount.unwrap_or(0.0))
                };
                (base * safe_percent(allocation.value) / 100.0, false)
            }
        };
        if orphaned {
            tracing::debug!(
                source_id = ?allocation.source_id,
                currency = %currency,
                "allocation references a missing income source"
            );
        }
        AllocationValue {
            currency,
            amount,
            orphaned,
        }
    }

    /// Sums a category's rules per currency. A category without rules gets a
    /// single empty bucket in the user's currency.
    pub fn category_allocations(&self, category: &Category) -> BTreeMap<CurrencyCode, FundedAmount> {
        let mut buckets: BTreeMap<CurrencyCode, FundedAmount> = BTreeMap::new();
        if category.allocations.is_empty() {
            buckets.insert(self.user_currency.clone(), FundedAmount::default());
            return buckets;
        }
        for allocation in &category.allocations {
            let value = self.evaluate(allocation);
            buckets.entry(value.currency.clone()).or_default().absorb(&value);
        }
        buckets
    }

    /// The part of a category's rules that draws on `source_id`, per currency.
    pub fn source_share(
        &self,
        category: &Category,
        source_id: Uuid,
    ) -> BTreeMap<CurrencyCode, f64> {
        let mut shares: BTreeMap<CurrencyCode, f64> = BTreeMap::new();
        for allocation in category
            .allocations
            .iter()
            .filter(|allocation| allocation.source_id == Some(source_id))
        {
            let value = self.evaluate(allocation);
            *shares.entry(value.currency).or_default() += value.amount;
        }
        shares
    }
}

/// Guarded per-currency totals of transaction rows.
pub fn sum_by_currency<'r, T, I>(rows: I, fallback: &CurrencyCode) -> BTreeMap<CurrencyCode, f64>
where
    T: Amounted + Denominated + 'r,
    I: IntoIterator<Item = &'r T>,
{
    let mut totals: BTreeMap<CurrencyCode, f64> = BTreeMap::new();
    for row in rows {
        *totals.entry(row.currency_or(fallback)).or_default() += safe_amount(row.amount());
    }
    totals
}
