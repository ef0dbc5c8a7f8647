//! Core business logic - framework-agnostic money movement.
//!
//! Every operation takes the store explicitly. Operations that touch more than
//! one record run inside a single database transaction.

/// Bucket CRUD, percentage guard and top-ups
pub mod bucket;
/// Expense application and reversal
pub mod expense;
/// Income recording and the salary cycle
pub mod income;
/// Rollover and salary distribution across buckets
pub mod monthly;
/// Progress, breakdown and activity reports
pub mod report;
/// Derived savings figures
pub mod savings;

use crate::errors::{Error, Result};

/// Rejects amounts that are zero, negative, NaN or infinite.
pub(crate) fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Trims a required text field, rejecting empty input.
pub(crate) fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: format!("{field} is required"),
        });
    }
    Ok(trimmed.to_string())
}
