//! hearth-domain
//!
//! Plain data types for the household budget engine: income sources,
//! incomes, expenses, categories and their allocation rules.
//! No I/O and no arithmetic beyond trivial accessors.

pub mod category;
pub mod common;
pub mod expense;
pub mod income;
pub mod period;

pub use category::*;
pub use common::*;
pub use expense::*;
pub use income::*;
pub use period::*;
