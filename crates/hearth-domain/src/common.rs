//! Shared traits and the currency code type used across budgeting records.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for stored entities.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies the raw, unguarded monetary amount of a transaction row.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Transaction rows that carry an optional currency tag.
pub trait Denominated {
    fn currency(&self) -> Option<&CurrencyCode>;

    /// Returns the row currency, or `fallback` when the row has none.
    fn currency_or(&self, fallback: &CurrencyCode) -> CurrencyCode {
        match self.currency() {
            Some(code) if !code.is_empty() => code.clone(),
            _ => fallback.clone(),
        }
    }
}

/// Transaction rows booked on a calendar date.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// Free-form currency code. Stored upper-cased; never validated against a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("RUB")
    }
}

impl From<String> for CurrencyCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for CurrencyCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
