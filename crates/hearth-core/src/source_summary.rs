//! How much each income source brought in, funded, and paid for.

use std::collections::{BTreeMap, HashMap};

use hearth_domain::{Category, CurrencyCode, Expense, Income, IncomeSource};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::funding::{sum_by_currency, FundingContext};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceCurrencySummary {
    pub total_income: f64,
    pub allocated: f64,
    /// Expenses imputed back to this source by funding share.
    pub total_spent: f64,
    /// `max(0, total_income - allocated)`.
    pub remaining: f64,
    /// `max(0, allocated - total_income)`.
    pub debt: f64,
}

impl SourceCurrencySummary {
    fn settle(&mut self) {
        self.remaining = (self.total_income - self.allocated).max(0.0);
        self.debt = (self.allocated - self.total_income).max(0.0);
    }
}

/// A source's figures for a period. The flat fields mirror a single currency
/// (the user's, or the first one present) for older single-currency screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source_id: Uuid,
    pub name: String,
    pub currency: CurrencyCode,
    pub total_income: f64,
    pub allocated: f64,
    pub total_spent: f64,
    pub remaining: f64,
    pub debt: f64,
    #[serde(default, skip_serializing_if = "single_currency")]
    pub currencies: BTreeMap<CurrencyCode, SourceCurrencySummary>,
}

fn single_currency(currencies: &BTreeMap<CurrencyCode, SourceCurrencySummary>) -> bool {
    currencies.len() <= 1
}

impl SourceSummary {
    pub fn currency(&self, code: &CurrencyCode) -> Option<&SourceCurrencySummary> {
        self.currencies.get(code)
    }

    pub fn is_multi_currency(&self) -> bool {
        !single_currency(&self.currencies)
    }

    pub fn is_overcommitted(&self) -> bool {
        self.currencies.values().any(|bucket| bucket.debt > 0.0)
    }
}

/// Expense totals per category and currency, built once per run.
pub type CategorySpend = HashMap<Uuid, BTreeMap<CurrencyCode, f64>>;

/// Buckets categorized expenses; balance corrections are skipped.
pub fn spend_by_category(expenses: &[Expense], user_currency: &CurrencyCode) -> CategorySpend {
    let mut grouped: HashMap<Uuid, Vec<&Expense>> = HashMap::new();
    for expense in expenses {
        if let Some(category_id) = expense.category_id {
            grouped.entry(category_id).or_default().push(expense);
        }
    }
    grouped
        .into_iter()
        .map(|(category_id, rows)| (category_id, sum_by_currency(rows, user_currency)))
        .collect()
}

pub struct SourceSummaryAggregator;

impl SourceSummaryAggregator {
    /// Builds the lookups and summarizes `source`. `sources` must hold every
    /// source, since a category's total funding draws on all of them.
    pub fn compute(
        source: &IncomeSource,
        incomes: &[Income],
        expenses: &[Expense],
        categories: &[Category],
        sources: &[IncomeSource],
        user_currency: &CurrencyCode,
    ) -> SourceSummary {
        let ctx = FundingContext::new(sources, incomes, user_currency);
        let spend = spend_by_category(expenses, user_currency);
        Self::compute_with_context(&ctx, source, incomes, categories, &spend)
    }

    pub fn compute_with_context(
        ctx: &FundingContext<'_>,
        source: &IncomeSource,
        incomes: &[Income],
        categories: &[Category],
        spend: &CategorySpend,
    ) -> SourceSummary {
        let user_currency = ctx.user_currency();
        let mut currencies: BTreeMap<CurrencyCode, SourceCurrencySummary> = BTreeMap::new();

        let received = sum_by_currency(
            incomes
                .iter()
                .filter(|income| income.source_id == Some(source.id)),
            user_currency,
        );
        for (currency, total) in received {
            currencies.entry(currency).or_default().total_income += total;
        }

        for category in categories.iter().filter(|c| c.is_funded_by(source.id)) {
            let shares = ctx.source_share(category, source.id);
            for (currency, share) in &shares {
                currencies.entry(currency.clone()).or_default().allocated += share;
            }

            let Some(category_spend) = spend.get(&category.id) else {
                continue;
            };
            let funding = ctx.category_allocations(category);
            for (currency, spent) in category_spend {
                let total_budget = funding.get(currency).map(|f| f.amount).unwrap_or(0.0);
                let share = shares.get(currency).copied().unwrap_or(0.0);
                if total_budget > 0.0 && share > 0.0 {
                    currencies.entry(currency.clone()).or_default().total_spent +=
                        spent * share / total_budget;
                }
            }
        }

        for bucket in currencies.values_mut() {
            bucket.settle();
        }

        let (currency, headline) = currencies
            .get_key_value(user_currency)
            .or_else(|| currencies.iter().next())
            .map(|(code, bucket)| (code.clone(), bucket.clone()))
            .unwrap_or_else(|| (user_currency.clone(), SourceCurrencySummary::default()));

        tracing::debug!(
            source = %source.name,
            currencies = currencies.len(),
            "source summary computed"
        );

        SourceSummary {
            source_id: source.id,
            name: source.name.clone(),
            currency,
            total_income: headline.total_income,
            allocated: headline.allocated,
            total_spent: headline.total_spent,
            remaining: headline.remaining,
            debt: headline.debt,
            currencies,
        }
    }
}

/// Free-function form of [`SourceSummaryAggregator::compute`].
pub fn compute_source_summary(
    source: &IncomeSource,
    incomes: &[Income],
    expenses: &[Expense],
    categories: &[Category],
    sources: &[IncomeSource],
    user_currency: &CurrencyCode,
) -> SourceSummary {
    SourceSummaryAggregator::compute(source, incomes, expenses, categories, sources, user_currency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hearth_domain::Allocation;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    #[test]
    fn expenses_split_by_funding_share() {
        let rub = CurrencyCode::new("RUB");
        let salary = IncomeSource::new("Salary");
        let side = IncomeSource::new("Side gig");
        let food = Category::new("Food")
            .with_allocation(Allocation::amount(Some(salary.id), 300.0))
            .with_allocation(Allocation::amount(Some(side.id), 100.0));
        let incomes = vec![
            Income::new(Some(salary.id), 1000.0, day(1)),
            Income::new(Some(side.id), 50.0, day(2)),
        ];
        let expenses = vec![Expense::new(Some(food.id), 200.0, day(3))];
        let sources = vec![salary.clone(), side.clone()];
        let categories = vec![food];

        let main = compute_source_summary(&salary, &incomes, &expenses, &categories, &sources, &rub);
        assert_eq!(main.total_income, 1000.0);
        assert_eq!(main.allocated, 300.0);
        assert_eq!(main.total_spent, 150.0);
        assert_eq!(main.remaining, 700.0);
        assert_eq!(main.debt, 0.0);

        let extra = compute_source_summary(&side, &incomes, &expenses, &categories, &sources, &rub);
        assert_eq!(extra.total_spent, 50.0);
        assert_eq!(extra.remaining, 0.0);
        assert_eq!(extra.debt, 50.0);
        assert!(extra.is_overcommitted());
    }

    #[test]
    fn remaining_and_debt_never_both_positive() {
        let rub = CurrencyCode::new("RUB");
        let salary = IncomeSource::new("Salary");
        let rent = Category::new("Rent").with_allocation(Allocation::amount(Some(salary.id), 800.0));
        let sources = vec![salary.clone()];
        for received in [0.0, 500.0, 800.0, 1200.0] {
            let incomes = vec![Income::new(Some(salary.id), received, day(1))];
            let summary =
                compute_source_summary(&salary, &incomes, &[], &[rent.clone()], &sources, &rub);
            assert!(!(summary.remaining > 0.0 && summary.debt > 0.0));
        }
    }

    #[test]
    fn headline_prefers_user_currency() {
        let rub = CurrencyCode::new("RUB");
        let usd = CurrencyCode::new("USD");
        let salary = IncomeSource::new("Salary");
        let incomes = vec![
            Income::new(Some(salary.id), 300.0, day(1)).in_currency("USD"),
            Income::new(Some(salary.id), 9000.0, day(1)),
        ];
        let sources = vec![salary.clone()];
        let summary = compute_source_summary(&salary, &incomes, &[], &[], &sources, &rub);
        assert_eq!(summary.currency, rub);
        assert_eq!(summary.total_income, 9000.0);
        assert!(summary.is_multi_currency());
        assert_eq!(summary.currency(&usd).unwrap().total_income, 300.0);
    }

    #[test]
    fn headline_falls_back_to_first_currency() {
        let rub = CurrencyCode::new("RUB");
        let salary = IncomeSource::new("Salary");
        let incomes = vec![Income::new(Some(salary.id), 250.0, day(1)).in_currency("EUR")];
        let sources = vec![salary.clone()];
        let summary = compute_source_summary(&salary, &incomes, &[], &[], &sources, &rub);
        assert_eq!(summary.currency, CurrencyCode::new("EUR"));
        assert_eq!(summary.total_income, 250.0);
        assert!(!summary.is_multi_currency());

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("currencies").is_none());
    }

    #[test]
    fn foreign_spend_is_not_imputed_without_foreign_funding() {
        let rub = CurrencyCode::new("RUB");
        let salary = IncomeSource::new("Salary");
        let travel =
            Category::new("Travel").with_allocation(Allocation::amount(Some(salary.id), 500.0));
        let expenses = vec![Expense::new(Some(travel.id), 90.0, day(4)).in_currency("USD")];
        let sources = vec![salary.clone()];
        let summary = compute_source_summary(&salary, &[], &expenses, &[travel], &sources, &rub);
        assert_eq!(summary.total_spent, 0.0);
        assert!(summary.currency(&CurrencyCode::new("USD")).is_none());
    }
}
