//! Display-only currency metadata. Aggregation never consults this table, so
//! unknown codes still budget correctly and simply render without a symbol.

use std::collections::HashMap;

use hearth_domain::CurrencyCode;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
    pub minor_units: u8,
}

static KNOWN_CURRENCIES: Lazy<HashMap<&'static str, CurrencyInfo>> = Lazy::new(|| {
    [
        ("RUB", "₽", "Russian ruble", 2),
        ("USD", "$", "US dollar", 2),
        ("EUR", "€", "Euro", 2),
        ("GBP", "£", "Pound sterling", 2),
        ("JPY", "¥", "Japanese yen", 0),
        ("CNY", "¥", "Chinese yuan", 2),
        ("KRW", "₩", "South Korean won", 0),
        ("GEL", "₾", "Georgian lari", 2),
        ("AMD", "֏", "Armenian dram", 2),
    ]
    .into_iter()
    .map(|(code, symbol, name, minor_units)| {
        (
            code,
            CurrencyInfo {
                code,
                symbol,
                name,
                minor_units,
            },
        )
    })
    .collect()
});

pub fn currency_info(code: &CurrencyCode) -> Option<&'static CurrencyInfo> {
    KNOWN_CURRENCIES.get(code.as_str())
}

/// Known codes in alphabetical order.
pub fn known_currencies() -> Vec<&'static CurrencyInfo> {
    let mut all: Vec<_> = KNOWN_CURRENCIES.values().collect();
    all.sort_by_key(|info| info.code);
    all
}

/// The display symbol, or the code itself when it is not in the table.
pub fn symbol_for(code: &CurrencyCode) -> String {
    currency_info(code)
        .map(|info| info.symbol.to_string())
        .unwrap_or_else(|| code.as_str().to_string())
}

pub fn minor_units_for(code: &CurrencyCode) -> u8 {
    currency_info(code).map(|info| info.minor_units).unwrap_or(2)
}

/// Separators used when rendering amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberStyle {
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for NumberStyle {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

impl NumberStyle {
    /// Picks separators from a BCP 47 tag; anything unrecognized gets the
    /// `en-US` style.
    pub fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "ru" | "fr" | "uk" | "ka" | "hy" => Self {
                decimal_separator: ',',
                grouping_separator: ' ',
            },
            "de" | "es" | "it" | "nl" => Self {
                decimal_separator: ',',
                grouping_separator: '.',
            },
            _ => Self::default(),
        }
    }
}

pub fn format_number(style: &NumberStyle, value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value.abs());
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (body.as_str(), None),
    };
    let mut rendered = group_digits(int_part, style.grouping_separator);
    if let Some(frac) = frac_part {
        rendered.push(style.decimal_separator);
        rendered.push_str(frac);
    }
    let is_zero = rendered.chars().all(|ch| !ch.is_ascii_digit() || ch == '0');
    if value < 0.0 && !is_zero {
        rendered.insert(0, '-');
    }
    rendered
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx != 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats `amount` with the currency's minor units and symbol, e.g.
/// `1,234.50 $` or `12 000 ₽`. Unknown codes render as `12.00 XYZ`.
pub fn format_amount(amount: f64, code: &CurrencyCode, style: &NumberStyle) -> String {
    let body = format_number(style, amount, minor_units_for(code));
    format!("{} {}", body, symbol_for(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_codes_fall_back_to_the_code() {
        let code = CurrencyCode::new("xyz");
        assert!(currency_info(&code).is_none());
        assert_eq!(symbol_for(&code), "XYZ");
        assert_eq!(minor_units_for(&code), 2);
    }

    #[test]
    fn groups_thousands() {
        let style = NumberStyle::default();
        assert_eq!(format_number(&style, 1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(&style, 999.0, 0), "999");
        assert_eq!(format_number(&style, -1000.0, 0), "-1,000");
        assert_eq!(format_number(&style, -0.001, 2), "0.00");
    }

    #[test]
    fn locale_picks_separators() {
        let style = NumberStyle::for_locale("ru-RU");
        assert_eq!(format_number(&style, 12000.5, 2), "12 000,50");
        assert_eq!(NumberStyle::for_locale("en_GB"), NumberStyle::default());
    }
}
