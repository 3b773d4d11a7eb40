//! hearth-core
//!
//! The budget aggregation engine. Pure functions over borrowed snapshots of
//! hearth-domain records: no I/O, no shared state, no currency conversion.

pub mod category_budget;
pub mod error;
pub mod funding;
pub mod numeric;
pub mod rollover;
pub mod rounding;
pub mod source_summary;
pub mod validator;

pub use category_budget::*;
pub use error::CoreError;
pub use funding::*;
pub use rollover::*;
pub use rounding::*;
pub use source_summary::*;
pub use validator::*;
