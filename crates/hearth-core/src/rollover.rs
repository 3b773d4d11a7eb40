//! Month-end surplus and shortfall, carried into the next period.

use std::collections::{BTreeMap, BTreeSet};

use hearth_domain::{Category, CurrencyCode, Expense, Income, IncomeSource};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    category_budget::category_buckets,
    funding::FundingContext,
    numeric::{safe_amount, safe_number, EPSILON},
};

/// `category → currency → amount`.
pub type RolloverMap = BTreeMap<Uuid, BTreeMap<CurrencyCode, f64>>;

/// Prior-period debts and carry-overs. A category/currency pair sits in at
/// most one of the two maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rollovers {
    #[serde(default)]
    pub debts: RolloverMap,
    #[serde(default)]
    pub carry_overs: RolloverMap,
}

impl Rollovers {
    /// Records a closing balance: positive becomes carry-over, negative
    /// becomes debt, zero clears the pair.
    pub fn record(&mut self, category_id: Uuid, currency: CurrencyCode, balance: f64) {
        let balance = safe_number(balance);
        remove_entry(&mut self.debts, category_id, &currency);
        remove_entry(&mut self.carry_overs, category_id, &currency);
        if balance > EPSILON {
            self.carry_overs
                .entry(category_id)
                .or_default()
                .insert(currency, balance);
        } else if balance < -EPSILON {
            self.debts
                .entry(category_id)
                .or_default()
                .insert(currency, -balance);
        }
    }

    pub fn debt(&self, category_id: Uuid, currency: &CurrencyCode) -> f64 {
        lookup(&self.debts, category_id, currency)
    }

    pub fn carry_over(&self, category_id: Uuid, currency: &CurrencyCode) -> f64 {
        lookup(&self.carry_overs, category_id, currency)
    }

    /// Currencies with any rollover entry for the category.
    pub fn currencies_for(&self, category_id: Uuid) -> BTreeSet<CurrencyCode> {
        self.debts
            .get(&category_id)
            .into_iter()
            .chain(self.carry_overs.get(&category_id))
            .flat_map(|per_currency| per_currency.keys().cloned())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.debts.is_empty() && self.carry_overs.is_empty()
    }
}

fn lookup(map: &RolloverMap, category_id: Uuid, currency: &CurrencyCode) -> f64 {
    map.get(&category_id)
        .and_then(|per_currency| per_currency.get(currency))
        .copied()
        .map(safe_amount)
        .unwrap_or(0.0)
}

fn remove_entry(map: &mut RolloverMap, category_id: Uuid, currency: &CurrencyCode) {
    if let Some(per_currency) = map.get_mut(&category_id) {
        per_currency.remove(currency);
        if per_currency.is_empty() {
            map.remove(&category_id);
        }
    }
}

/// Recomputes last period's closing balances from its transactions.
pub struct PeriodRolloverCalculator;

impl PeriodRolloverCalculator {
    /// Only the prior period's own allocation and spend count; earlier
    /// periods' rollovers are not chained in.
    pub fn compute(
        categories: &[Category],
        prior_incomes: &[Income],
        prior_expenses: &[Expense],
        sources: &[IncomeSource],
        user_currency: &CurrencyCode,
    ) -> Rollovers {
        let ctx = FundingContext::new(sources, prior_incomes, user_currency);
        let mut rollovers = Rollovers::default();
        for category in categories {
            for (currency, totals) in category_buckets(&ctx, category, prior_expenses) {
                let balance = safe_amount(totals.base) - safe_amount(totals.spent);
                rollovers.record(category.id, currency, balance);
            }
        }
        tracing::debug!(
            categories = categories.len(),
            debts = rollovers.debts.len(),
            carry_overs = rollovers.carry_overs.len(),
            "rollovers computed"
        );
        rollovers
    }
}

/// Free-function form of [`PeriodRolloverCalculator::compute`].
pub fn compute_rollovers(
    categories: &[Category],
    prior_incomes: &[Income],
    prior_expenses: &[Expense],
    sources: &[IncomeSource],
    user_currency: &CurrencyCode,
) -> Rollovers {
    PeriodRolloverCalculator::compute(categories, prior_incomes, prior_expenses, sources, user_currency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hearth_domain::Allocation;

    fn may(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn surplus_and_deficit_land_in_separate_maps() {
        let rub = CurrencyCode::new("RUB");
        let salary = IncomeSource::new("Salary");
        let food = Category::new("Food").with_allocation(Allocation::percent(salary.id, 25.0));
        let fun = Category::new("Fun").with_allocation(Allocation::amount(None, 500.0));
        let incomes = vec![Income::new(Some(salary.id), 4000.0, may(1))];
        let expenses = vec![
            Expense::new(Some(food.id), 700.0, may(5)),
            Expense::new(Some(fun.id), 800.0, may(6)),
        ];

        let rollovers = compute_rollovers(
            &[food.clone(), fun.clone()],
            &incomes,
            &expenses,
            &[salary],
            &rub,
        );

        assert_eq!(rollovers.carry_over(food.id, &rub), 300.0);
        assert_eq!(rollovers.debt(food.id, &rub), 0.0);
        assert_eq!(rollovers.debt(fun.id, &rub), 300.0);
        assert_eq!(rollovers.carry_over(fun.id, &rub), 0.0);
    }

    #[test]
    fn balanced_category_records_nothing() {
        let rub = CurrencyCode::new("RUB");
        let rent = Category::new("Rent").with_allocation(Allocation::amount(None, 900.0));
        let expenses = vec![Expense::new(Some(rent.id), 900.0, may(2))];
        let rollovers = compute_rollovers(&[rent], &[], &expenses, &[], &rub);
        assert!(rollovers.is_empty());
    }

    #[test]
    fn currencies_roll_over_independently() {
        let rub = CurrencyCode::new("RUB");
        let usd = CurrencyCode::new("USD");
        let travel = Category::new("Travel")
            .with_allocation(Allocation::amount(None, 1000.0))
            .with_allocation(Allocation::amount(None, 100.0).in_currency("USD"));
        let expenses = vec![
            Expense::new(Some(travel.id), 400.0, may(3)),
            Expense::new(Some(travel.id), 150.0, may(3)).in_currency("USD"),
        ];
        let rollovers = compute_rollovers(&[travel.clone()], &[], &expenses, &[], &rub);
        assert_eq!(rollovers.carry_over(travel.id, &rub), 600.0);
        assert_eq!(rollovers.debt(travel.id, &usd), 50.0);
        assert_eq!(
            rollovers.currencies_for(travel.id).into_iter().collect::<Vec<_>>(),
            vec![rub, usd]
        );
    }

    #[test]
    fn recording_replaces_opposite_entry() {
        let rub = CurrencyCode::new("RUB");
        let id = Uuid::new_v4();
        let mut rollovers = Rollovers::default();
        rollovers.record(id, rub.clone(), 120.0);
        rollovers.record(id, rub.clone(), -80.0);
        assert_eq!(rollovers.carry_over(id, &rub), 0.0);
        assert_eq!(rollovers.debt(id, &rub), 80.0);
        rollovers.record(id, rub.clone(), 0.0);
        assert!(rollovers.is_empty());
    }
}
