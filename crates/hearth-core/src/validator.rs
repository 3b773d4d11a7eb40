//! Advisory check that categories do not promise more than the income covers.

use hearth_domain::{Category, CurrencyCode, Income, IncomeSource};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    funding::{sum_by_currency, FundingContext},
    numeric::safe_amount,
};

/// Warning thresholds, as fractions of available income.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationThresholds {
    /// A single category above this share of income gets a warning.
    pub category_share_warning: f64,
    /// Total allocation within this margin of income gets a warning.
    pub saturation_margin: f64,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            category_share_warning: 0.5,
            saturation_margin: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category_id: Uuid,
    pub name: String,
    pub allocated: f64,
    /// Percentage of available income; 0 when there is no income.
    pub share_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationDetails {
    pub currency: CurrencyCode,
    pub available_income: f64,
    /// No income was recorded, so expected source amounts were used.
    pub income_is_expected: bool,
    pub total_allocated: f64,
    pub allocation_percent: f64,
    pub unallocated: f64,
    pub categories: Vec<CategoryShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub details: ValidationDetails,
}

/// Runs the allocation-vs-income check in the user's currency only.
#[derive(Debug, Clone, Default)]
pub struct BudgetConsistencyValidator {
    thresholds: ValidationThresholds,
}

impl BudgetConsistencyValidator {
    pub fn new(thresholds: ValidationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ValidationThresholds {
        &self.thresholds
    }

    pub fn validate(
        &self,
        categories: &[Category],
        sources: &[IncomeSource],
        incomes: &[Income],
        user_currency: &CurrencyCode,
    ) -> ValidationReport {
        let ctx = FundingContext::new(sources, incomes, user_currency);

        let actual = sum_by_currency(incomes, user_currency)
            .get(user_currency)
            .copied()
            .unwrap_or(0.0);
        let income_is_expected = actual <= 0.0;
        let available_income = if income_is_expected {
            sources
                .iter()
                .map(|source| safe_amount(source.amount.unwrap_or(0.0)))
                .sum()
        } else {
            actual
        };

        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut shares = Vec::with_capacity(categories.len());
        let mut total_allocated = 0.0;

        for category in categories {
            let allocated = ctx
                .category_allocations(category)
                .get(user_currency)
                .map(|funded| funded.amount)
                .unwrap_or(0.0);
            total_allocated += allocated;
            let share = percent_of(allocated, available_income);
            if available_income > 0.0 && allocated > available_income * self.thresholds.category_share_warning {
                warnings.push(format!(
                    "Category \"{}\" takes {:.1}% of available income",
                    category.name, share
                ));
            }
            shares.push(CategoryShare {
                category_id: category.id,
                name: category.name.clone(),
                allocated,
                share_percent: share,
            });
        }

        let allocation_percent = percent_of(total_allocated, available_income);
        if total_allocated > available_income {
            let overage = total_allocated - available_income;
            if available_income > 0.0 {
                errors.push(format!(
                    "Allocated {:.2} {} exceeds available income {:.2} by {:.2} ({:.1}%)",
                    total_allocated,
                    user_currency,
                    available_income,
                    overage,
                    overage / available_income * 100.0
                ));
            } else {
                errors.push(format!(
                    "Allocated {:.2} {} but no income is available",
                    total_allocated, user_currency
                ));
            }
        } else if available_income > 0.0
            && total_allocated >= available_income * (1.0 - self.thresholds.saturation_margin)
        {
            warnings.push(format!(
                "Allocations use {:.1}% of available income, leaving {:.2} {} unassigned",
                allocation_percent,
                available_income - total_allocated,
                user_currency
            ));
        }

        if !errors.is_empty() {
            tracing::warn!(
                total_allocated,
                available_income,
                currency = %user_currency,
                "allocations exceed available income"
            );
        }

        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            details: ValidationDetails {
                currency: user_currency.clone(),
                available_income,
                income_is_expected,
                total_allocated,
                allocation_percent,
                unallocated: (available_income - total_allocated).max(0.0),
                categories: shares,
            },
        }
    }
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
