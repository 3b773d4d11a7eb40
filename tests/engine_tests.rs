mod common;

use chrono::NaiveDate;
use common::*;
use hearth_budget::{
    hearth_config::Config,
    hearth_core::ValidationThresholds,
    hearth_domain::{Allocation, Category, CurrencyCode, Expense, Income, IncomeSource, Period},
    report::{render_text, RenderOptions},
    BudgetEngine, BudgetSnapshot,
};

fn rub() -> CurrencyCode {
    CurrencyCode::new("RUB")
}

fn usd() -> CurrencyCode {
    CurrencyCode::new("USD")
}

#[test]
fn prior_month_overspend_becomes_current_debt() {
    let report = BudgetEngine::default().month_report(&family_snapshot(), june());

    assert_eq!(report.rollovers.debt(id(GROCERIES), &rub()), 2000.0);
    let groceries = report.category(id(GROCERIES)).expect("groceries");
    let bucket = groceries.currency(&rub()).expect("rub bucket");
    assert_eq!(bucket.base_allocation, 24000.0);
    assert_eq!(bucket.spent, 20000.0);
    assert_eq!(bucket.debt, 2000.0);
    assert_eq!(bucket.remaining, 2000.0);
    assert!(!groceries.is_over_budget());
    assert!(groceries.has_debt());
}

#[test]
fn legacy_category_fields_fund_the_category() {
    let report = BudgetEngine::default().month_report(&family_snapshot(), june());

    let rent = report.category(id(RENT)).expect("rent");
    assert_eq!(rent.allocated, 25000.0);
    assert_eq!(rent.remaining, 0.0);
    assert!(report.rollovers.carry_over(id(RENT), &rub()) == 0.0);
    assert!(report.rollovers.debt(id(RENT), &rub()) == 0.0);
}

#[test]
fn foreign_currency_category_carries_its_own_surplus() {
    let report = BudgetEngine::default().month_report(&family_snapshot(), june());

    let travel = report.category(id(TRAVEL)).expect("travel");
    assert!(travel.currency(&rub()).is_none());
    let bucket = travel.currency(&usd()).expect("usd bucket");
    assert_eq!(bucket.base_allocation, 200.0);
    assert_eq!(bucket.carry_over, 200.0);
    assert_eq!(bucket.allocated, 400.0);
    assert_eq!(bucket.remaining, 150.0);

    let totals = &report.totals[&usd()];
    assert_eq!(totals.income, 500.0);
    assert_eq!(totals.spent, 250.0);
    let rub_totals = &report.totals[&rub()];
    assert_eq!(rub_totals.income, 80000.0);
    assert_eq!(rub_totals.allocated, 49000.0);
    assert_eq!(rub_totals.spent, 45000.0);
}

#[test]
fn source_summaries_impute_spend_by_funding_share() {
    let report = BudgetEngine::default().month_report(&family_snapshot(), june());

    let salary = report.source(id(SALARY)).expect("salary");
    assert_eq!(salary.currency, rub());
    assert_eq!(salary.total_income, 80000.0);
    assert_eq!(salary.allocated, 49000.0);
    assert_eq!(salary.total_spent, 45000.0);
    assert_eq!(salary.remaining, 31000.0);
    assert_eq!(salary.debt, 0.0);

    let freelance = report.source(id(FREELANCE)).expect("freelance");
    assert_eq!(freelance.currency, usd());
    assert_eq!(freelance.allocated, 200.0);
    assert_eq!(freelance.total_spent, 250.0);
    assert_eq!(freelance.remaining, 300.0);
}

#[test]
fn dangling_references_are_reported() {
    let report = BudgetEngine::default().month_report(&family_snapshot(), june());

    let gifts = report.category(id(GIFTS)).expect("gifts");
    assert!(gifts.is_orphaned());
    assert_eq!(gifts.allocated, 0.0);

    let diagnostics = &report.diagnostics;
    assert!(diagnostics.has_issues());
    assert_eq!(diagnostics.orphaned_allocations.len(), 1);
    assert_eq!(diagnostics.orphaned_allocations[0].source_id, id(DELETED_SOURCE));
    assert_eq!(diagnostics.orphaned_expenses.len(), 1);
    assert_eq!(diagnostics.balance_corrections, 1);
    assert!(diagnostics.orphaned_incomes.is_empty());
}

#[test]
fn validation_runs_in_the_engine_currency() {
    let report = BudgetEngine::default().month_report(&family_snapshot(), june());
    assert!(report.validation.is_valid);
    assert!(report.validation.warnings.is_empty());
    assert_eq!(report.validation.details.available_income, 80000.0);
    assert_eq!(report.validation.details.total_allocated, 49000.0);

    let in_dollars = BudgetEngine::default()
        .with_currency(usd())
        .month_report(&family_snapshot(), june());
    assert_eq!(in_dollars.validation.details.available_income, 500.0);
    assert_eq!(in_dollars.validation.details.total_allocated, 200.0);
}

#[test]
fn engine_takes_currency_and_thresholds_from_config() {
    let mut config = Config::default();
    config.currency = usd();
    config.thresholds.category_share_warning_percent = 30.0;

    let engine = BudgetEngine::new(&config).expect("engine");
    assert_eq!(engine.currency(), &usd());
    let report = engine.month_report(&family_snapshot(), june());
    assert_eq!(report.validation.warnings.len(), 1);
    assert!(report.validation.warnings[0].contains("Travel"));
}

#[test]
fn invalid_config_thresholds_are_rejected() {
    let mut config = Config::default();
    config.thresholds.saturation_margin_percent = -1.0;
    assert!(BudgetEngine::new(&config).is_err());
}

#[test]
fn percent_of_received_income_end_to_end() {
    let salary = IncomeSource::new("Salary");
    let food = Category::new("Food").with_allocation(Allocation::percent(salary.id, 50.0));
    let day = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
    let snapshot = BudgetSnapshot {
        incomes: vec![Income::new(Some(salary.id), 4000.0, day)],
        expenses: vec![Expense::new(Some(food.id), 2500.0, day)],
        income_sources: vec![salary],
        categories: vec![food.clone()],
    };

    let report = BudgetEngine::default().month_report(&snapshot, Period::new(2024, 2).unwrap());
    let budget = report.category(food.id).expect("food");
    assert_eq!(budget.allocated, 2000.0);
    assert_eq!(budget.spent, 2500.0);
    assert_eq!(budget.remaining, -500.0);
    assert!(budget.is_over_budget());
    assert_eq!(budget.overages().get(&rub()), Some(&500.0));
    assert_eq!(report.over_budget().count(), 1);
}

#[test]
fn spend_in_an_unfunded_currency_is_reported_over_budget() {
    let travel = Category::new("Travel").with_allocation(Allocation::amount(None, 5000.0));
    let day = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
    let snapshot = BudgetSnapshot {
        expenses: vec![Expense::new(Some(travel.id), 120.0, day).in_currency("USD")],
        categories: vec![travel.clone()],
        ..BudgetSnapshot::default()
    };

    let report = BudgetEngine::default().month_report(&snapshot, june());
    let budget = report.category(travel.id).expect("travel");
    assert!(budget.currency(&usd()).expect("usd bucket").is_over_budget());
    assert!(budget.is_over_budget());
    assert_eq!(report.over_budget().count(), 1);

    let text = render_text(&report, &RenderOptions::default());
    assert!(text.contains("Travel [OVER]"));
    assert!(text.contains("over by"));
}

#[test]
fn thresholds_can_be_overridden_directly() {
    let engine = BudgetEngine::default().with_thresholds(ValidationThresholds {
        category_share_warning: 0.25,
        saturation_margin: 0.0,
    });
    let report = engine.month_report(&family_snapshot(), june());
    assert_eq!(report.validation.warnings.len(), 2);
}

#[test]
fn report_serializes_to_json() {
    let report = BudgetEngine::default().month_report(&family_snapshot(), june());
    let json = serde_json::to_value(&report).expect("serialize");
    assert_eq!(json["period"], "2024-06");
    assert_eq!(json["currency"], "RUB");
    assert_eq!(json["categories"].as_array().map(Vec::len), Some(4));
    assert!(json["rollovers"]["debts"][GROCERIES]["RUB"].is_number());
}
