//! Spending categories and the allocation rules that fund them.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// A spending envelope funded by one or more allocation rules.
///
/// Stored records may still use the deprecated single-source fields; those are
/// resolved into [`Allocation`]s during deserialization (see [`CategoryRecord`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "CategoryRecord")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub allocations: Vec<Allocation>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            icon: None,
            allocations: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_allocation(mut self, allocation: Allocation) -> Self {
        self.allocations.push(allocation);
        self
    }

    /// Returns `true` when any rule draws on `source_id`.
    pub fn is_funded_by(&self, source_id: Uuid) -> bool {
        self.allocations
            .iter()
            .any(|allocation| allocation.source_id == Some(source_id))
    }
}

impl Identifiable for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AllocationKind {
    Amount,
    Percent,
}

impl fmt::Display for AllocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AllocationKind::Amount => "amount",
            AllocationKind::Percent => "percent",
        };
        f.write_str(label)
    }
}

/// Funds a category from an income source, as a fixed amount or a share of
/// what the source brought in. A missing currency means the user's currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Allocation {
    #[serde(default, alias = "incomeSourceId")]
    pub source_id: Option<Uuid>,
    #[serde(alias = "allocationType")]
    pub kind: AllocationKind,
    #[serde(alias = "allocationValue")]
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
}

impl Allocation {
    pub fn amount(source_id: Option<Uuid>, value: f64) -> Self {
        Self {
            source_id,
            kind: AllocationKind::Amount,
            value,
            currency: None,
        }
    }

    pub fn percent(source_id: Uuid, value: f64) -> Self {
        Self {
            source_id: Some(source_id),
            kind: AllocationKind::Percent,
            value,
            currency: None,
        }
    }

    pub fn in_currency(mut self, currency: impl Into<CurrencyCode>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn currency_or(&self, fallback: &CurrencyCode) -> CurrencyCode {
        match &self.currency {
            Some(code) if !code.is_empty() => code.clone(),
            _ => fallback.clone(),
        }
    }
}

/// The deprecated single-source funding fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyFunding {
    pub linked_source_id: Option<Uuid>,
    pub allocation_amount: Option<f64>,
    pub allocation_percent: Option<f64>,
}

impl LegacyFunding {
    pub fn is_empty(&self) -> bool {
        self.linked_source_id.is_none()
            && self.allocation_amount.is_none()
            && self.allocation_percent.is_none()
    }

    /// A positive fixed amount wins over a percentage. A percentage needs a
    /// linked source to mean anything.
    pub fn into_allocations(self) -> Vec<Allocation> {
        if let Some(amount) = self.allocation_amount.filter(|value| *value > 0.0) {
            return vec![Allocation::amount(self.linked_source_id, amount)];
        }
        match (self.allocation_percent, self.linked_source_id) {
            (Some(percent), Some(source_id)) if percent > 0.0 => {
                vec![Allocation::percent(source_id, percent)]
            }
            _ => Vec::new(),
        }
    }
}

/// How a stored category record is funded.
#[derive(Debug, Clone, PartialEq)]
pub enum FundingSpec {
    Rules(Vec<Allocation>),
    Legacy(LegacyFunding),
    Unfunded,
}

impl FundingSpec {
    pub fn into_allocations(self) -> Vec<Allocation> {
        match self {
            FundingSpec::Rules(rules) => rules,
            FundingSpec::Legacy(legacy) => legacy.into_allocations(),
            FundingSpec::Unfunded => Vec::new(),
        }
    }
}

/// Category as persisted, accepting both the allocation list and the legacy fields.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub allocations: Vec<Allocation>,
    #[serde(default, alias = "linkedSourceId")]
    pub linked_source_id: Option<Uuid>,
    #[serde(default, alias = "allocationAmount")]
    pub allocation_amount: Option<f64>,
    #[serde(default, alias = "allocationPercent")]
    pub allocation_percent: Option<f64>,
}

impl CategoryRecord {
    pub fn funding(&self) -> FundingSpec {
        if !self.allocations.is_empty() {
            return FundingSpec::Rules(self.allocations.clone());
        }
        let legacy = LegacyFunding {
            linked_source_id: self.linked_source_id,
            allocation_amount: self.allocation_amount,
            allocation_percent: self.allocation_percent,
        };
        if legacy.is_empty() {
            FundingSpec::Unfunded
        } else {
            FundingSpec::Legacy(legacy)
        }
    }
}

impl From<CategoryRecord> for Category {
    fn from(record: CategoryRecord) -> Self {
        let allocations = record.funding().into_allocations();
        Self {
            id: record.id,
            name: record.name,
            icon: record.icon,
            allocations,
        }
    }
}
