//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Bucket listing and management commands
pub mod bucket;

/// Dashboard overview command
pub mod dashboard;

/// Expense commands
pub mod expense;

/// General utility commands
pub mod general;

/// Income commands
pub mod income;

// Export commands
pub use bucket::*;
pub use dashboard::*;
pub use expense::*;
pub use general::*;
pub use income::*;
