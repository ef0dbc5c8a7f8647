//! Unified error type for the bucket tracker.
//!
//! Validation and not-found variants are raised before any record is touched.
//! Store failures come through `Database` unchanged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("Amount must be a positive number (got {amount})")]
    InvalidAmount { amount: f64 },

    #[error("Percentage must be between 0 and 100 (got {percentage})")]
    InvalidPercentage { percentage: f64 },

    #[error("Total percentage exceeds 100% (would be {total}%)")]
    PercentageExceeded { total: f64 },

    #[error("Insufficient funds: {available:.2} available, {required:.2} required")]
    InsufficientFunds { available: f64, required: f64 },

    #[error("No funds available in General Savings")]
    NoGeneralSavings,

    #[error("Salary for {year}-{month:02} already exists")]
    DuplicateSalary { year: i32, month: u32 },

    #[error("Invalid income type '{value}'. Must be Salary or Manual.")]
    InvalidIncomeType { value: String },

    #[error("Invalid expense type '{value}'. Must be Manual or Bucket.")]
    InvalidExpenseType { value: String },

    #[error("Bucket not found: {name}")]
    BucketNotFound { name: String },

    #[error("Expense not found: {id}")]
    ExpenseNotFound { id: i64 },

    #[error("Income not found: {id}")]
    IncomeNotFound { id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Whether this error was caused by the caller's input rather than the store or runtime.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(
            self,
            Self::Config { .. }
                | Self::Database(_)
                | Self::Io(_)
                | Self::EnvVar(_)
                | Self::Fmt(_)
                | Self::Framework(_)
        )
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
