//! Income sources and the income transactions booked against them.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// A named stream of money (salary, freelance, allowance).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncomeSource {
    pub id: Uuid,
    pub name: String,
    /// Expected amount per period, used when nothing was received yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<IncomeFrequency>,
}

impl IncomeSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount: None,
            frequency: None,
        }
    }

    pub fn with_expected_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_frequency(mut self, frequency: IncomeFrequency) -> Self {
        self.frequency = Some(frequency);
        self
    }
}

impl Identifiable for IncomeSource {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for IncomeSource {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IncomeFrequency {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
    Irregular,
}

impl fmt::Display for IncomeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IncomeFrequency::Weekly => "weekly",
            IncomeFrequency::Biweekly => "biweekly",
            IncomeFrequency::Monthly => "monthly",
            IncomeFrequency::Quarterly => "quarterly",
            IncomeFrequency::Yearly => "yearly",
            IncomeFrequency::Irregular => "irregular",
        };
        f.write_str(label)
    }
}

/// Money actually received.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Income {
    pub id: Uuid,
    #[serde(default)]
    pub source_id: Option<Uuid>,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Income {
    pub fn new(source_id: Option<Uuid>, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_id,
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
}

impl Identifiable for Income {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Income {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Denominated for Income {
    fn currency(&self) -> Option<&CurrencyCode> {
        self.currency.as_ref()
    }
}

impl Dated for Income {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
