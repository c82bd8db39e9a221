//! Data quality validation for featured patient records.
//!
//! The validator runs a fixed battery of checks in report order and scores
//! the result. It reads the featured rows without modifying them and never
//! fails on row content: every problem is recorded in the report.

pub mod checks;
mod score;
mod validator;

pub use score::compute_score;
pub use validator::{validate, validate_at};
