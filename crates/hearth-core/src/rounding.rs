//! Remainder-fair splitting of totals and percentage-set housekeeping.

use std::cmp::Ordering;

use hearth_domain::{Allocation, AllocationKind, CurrencyCode, IncomeSource};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    numeric::{is_valid_amount, round_cents, safe_amount, safe_sum},
    CoreError,
};

/// Largest allowed drift between the distributed sum and the requested total.
pub const CONSERVATION_TOLERANCE: f64 = 0.01;
/// Below this total a percentage set is flagged as under-using income.
pub const LOW_UTILIZATION_PERCENT: f64 = 50.0;
const PERCENT_TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedShare<K> {
    pub id: K,
    pub weight_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareAmount<K> {
    pub id: K,
    pub amount: f64,
}

/// Splits `total` across `shares` with the largest-remainder (Hamilton) method.
///
/// Each share is floored, then the leftover whole units go one each to the
/// shares with the biggest fractional remainders. Ties keep input order, and
/// the output is in input order. An invalid or non-positive total yields zeros.
pub fn distribute_with_rounding<K: Clone>(
    shares: &[WeightedShare<K>],
    total: f64,
) -> Vec<ShareAmount<K>> {
    if !is_valid_amount(total) || total <= 0.0 {
        return shares
            .iter()
            .map(|share| ShareAmount {
                id: share.id.clone(),
                amount: 0.0,
            })
            .collect();
    }

    let mut amounts = Vec::with_capacity(shares.len());
    let mut remainders = Vec::with_capacity(shares.len());
    for share in shares {
        let raw = total * safe_amount(share.weight_percent) / 100.0;
        let base = raw.floor();
        amounts.push(base);
        remainders.push(raw - base);
    }

    let leftover = (total - amounts.iter().sum::<f64>()).round();
    let mut order: Vec<usize> = (0..shares.len()).collect();
    // Stable sort, so equal remainders stay in input order.
    order.sort_by(|a, b| {
        remainders[*b]
            .partial_cmp(&remainders[*a])
            .unwrap_or(Ordering::Equal)
    });
    let awards = if leftover > 0.0 { leftover as usize } else { 0 };
    for index in order.into_iter().take(awards) {
        amounts[index] += 1.0;
    }

    let distributed: f64 = amounts.iter().sum();
    if (distributed - total).abs() > CONSERVATION_TOLERANCE {
        tracing::warn!(
            total,
            distributed,
            shares = shares.len(),
            "rounded distribution does not add up to the requested total"
        );
    }

    shares
        .iter()
        .zip(amounts)
        .map(|(share, amount)| ShareAmount {
            id: share.id.clone(),
            amount,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentageCheck {
    pub is_valid: bool,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Checks that a set of percentage allocations does not exceed 100%.
pub fn validate_percentage_sum(percentages: &[f64]) -> PercentageCheck {
    let total = safe_sum(percentages.iter().copied());
    if total > 100.0 + PERCENT_TOLERANCE {
        return PercentageCheck {
            is_valid: false,
            total,
            message: Some(format!(
                "Percentages add up to {:.2}%, which is more than 100%",
                total
            )),
        };
    }
    let message = (total > 0.0 && total < LOW_UTILIZATION_PERCENT).then(|| {
        format!(
            "Only {:.2}% of income is allocated; {:.2}% is left unassigned",
            total,
            100.0 - total
        )
    });
    PercentageCheck {
        is_valid: true,
        total,
        message,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentEntry<K> {
    pub id: K,
    pub value: f64,
}

/// Rescales a percentage set so it sums to exactly 100.
///
/// Values are floored to two decimals and the residual goes to the single
/// largest entry. Sets that sum to 0 or already to 100 come back unchanged.
pub fn normalize_percentages<K: Clone>(entries: &[PercentEntry<K>]) -> Vec<PercentEntry<K>> {
    let total = safe_sum(entries.iter().map(|entry| entry.value));
    if total <= 0.0 || (total - 100.0).abs() < PERCENT_TOLERANCE {
        return entries.to_vec();
    }

    let factor = 100.0 / total;
    let mut scaled: Vec<PercentEntry<K>> = entries
        .iter()
        .map(|entry| PercentEntry {
            id: entry.id.clone(),
            value: floor_cents(safe_amount(entry.value) * factor),
        })
        .collect();

    let residual = 100.0 - scaled.iter().map(|entry| entry.value).sum::<f64>();
    let mut largest = 0;
    for (index, entry) in scaled.iter().enumerate() {
        if entry.value > scaled[largest].value {
            largest = index;
        }
    }
    if let Some(entry) = scaled.get_mut(largest) {
        entry.value = round_cents(entry.value + residual);
    }
    scaled
}

fn floor_cents(value: f64) -> f64 {
    // The nudge keeps 33.33 from flooring to 33.32 after float error.
    ((value * 100.0) + 1e-7).floor() / 100.0
}

/// A fixed-amount rule proposed for a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedAllocation {
    pub category_id: Uuid,
    pub allocation: Allocation,
}

/// Turns a percentage plan over a source's expected amount into whole-unit
/// fixed allocations that add back up to that amount.
pub fn suggest_allocations(
    source: &IncomeSource,
    shares: &[WeightedShare<Uuid>],
    currency: &CurrencyCode,
) -> Vec<SuggestedAllocation> {
    let expected = safe_amount(source.amount.unwrap_or(0.0));
    distribute_with_rounding(shares, expected)
        .into_iter()
        .map(|share| SuggestedAllocation {
            category_id: share.id,
            allocation: Allocation::amount(Some(source.id), share.amount)
                .in_currency(currency.clone()),
        })
        .collect()
}

/// Rejects a rule before it is persisted.
pub fn validate_allocation(allocation: &Allocation) -> Result<(), CoreError> {
    if !allocation.value.is_finite() {
        return Err(CoreError::Validation(
            "allocation value must be a finite number".into(),
        ));
    }
    if allocation.value < 0.0 {
        return Err(CoreError::Validation(format!(
            "allocation value cannot be negative ({})",
            allocation.value
        )));
    }
    if allocation.kind == AllocationKind::Percent {
        if allocation.value > 100.0 {
            return Err(CoreError::Validation(format!(
                "percent allocation cannot exceed 100 ({})",
                allocation.value
            )));
        }
        if allocation.source_id.is_none() {
            return Err(CoreError::Validation(
                "percent allocation needs an income source".into(),
            ));
        }
    }
    Ok(())
}
