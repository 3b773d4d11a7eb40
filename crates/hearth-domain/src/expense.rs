//! Expense transactions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Money spent. A row without a category is a manual balance correction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Expense {
    pub fn new(category_id: Option<Uuid>, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            amount,
            currency: None,
            date,
            description: None,
        }
    }

    pub fn in_currency(mut self, currency: impl Into<CurrencyCode>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_balance_correction(&self) -> bool {
        self.category_id.is_none()
    }

    pub fn belongs_to(&self, category_id: Uuid) -> bool {
        self.category_id == Some(category_id)
    }
}

impl Identifiable for Expense {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Denominated for Expense {
    fn currency(&self) -> Option<&CurrencyCode> {
        self.currency.as_ref()
    }
}

impl Dated for Expense {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
