use hearth_budget::{
    currency::{currency_info, format_amount, known_currencies, symbol_for, NumberStyle},
    hearth_domain::CurrencyCode,
};

#[test]
fn known_symbols_cover_the_supported_codes() {
    let expected = [
        ("AMD", "֏"),
        ("CNY", "¥"),
        ("EUR", "€"),
        ("GBP", "£"),
        ("GEL", "₾"),
        ("JPY", "¥"),
        ("KRW", "₩"),
        ("RUB", "₽"),
        ("USD", "$"),
    ];
    let known: Vec<_> = known_currencies()
        .into_iter()
        .map(|info| (info.code, info.symbol))
        .collect();
    assert_eq!(known, expected);
}

#[test]
fn lookups_ignore_input_case() {
    let code = CurrencyCode::new("gel");
    assert_eq!(symbol_for(&code), "₾");
    assert_eq!(currency_info(&code).map(|info| info.name), Some("Georgian lari"));
}

#[test]
fn zero_decimal_currencies_drop_minor_units() {
    let style = NumberStyle::default();
    assert_eq!(format_amount(1500.4, &CurrencyCode::new("JPY"), &style), "1,500 ¥");
    assert_eq!(format_amount(98765.0, &CurrencyCode::new("KRW"), &style), "98,765 ₩");
    assert_eq!(format_amount(12.5, &CurrencyCode::new("USD"), &style), "12.50 $");
}

#[test]
fn russian_locale_formats_rubles() {
    let style = NumberStyle::for_locale("ru-RU");
    assert_eq!(format_amount(-2500.0, &CurrencyCode::new("RUB"), &style), "-2 500,00 ₽");
}

#[test]
fn unknown_codes_render_with_the_code() {
    let style = NumberStyle::default();
    assert_eq!(format_amount(7.0, &CurrencyCode::new("BTC"), &style), "7.00 BTC");
}
