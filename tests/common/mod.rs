#![allow(dead_code)]

use std::path::PathBuf;

use hearth_budget::{hearth_domain::Period, load_snapshot, BudgetSnapshot};
use uuid::Uuid;

pub const SALARY: &str = "11111111-1111-4111-8111-111111111111";
pub const FREELANCE: &str = "22222222-2222-4222-8222-222222222222";
pub const GROCERIES: &str = "aaaaaaaa-aaaa-4aaa-8aaa-aaaaaaaaaaaa";
pub const RENT: &str = "bbbbbbbb-bbbb-4bbb-8bbb-bbbbbbbbbbbb";
pub const TRAVEL: &str = "cccccccc-cccc-4ccc-8ccc-cccccccccccc";
pub const GIFTS: &str = "dddddddd-dddd-4ddd-8ddd-dddddddddddd";
pub const DELETED_SOURCE: &str = "eeeeeeee-eeee-4eee-8eee-eeeeeeeeeeee";

pub fn id(raw: &str) -> Uuid {
    Uuid::parse_str(raw).expect("fixture uuid")
}

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("family.json")
}

pub fn family_snapshot() -> BudgetSnapshot {
    load_snapshot(&fixture_path()).expect("load fixture snapshot")
}

pub fn june() -> Period {
    Period::new(2024, 6).expect("valid period")
}
