//! Entity module - Contains all SeaORM entity definitions for the ledger.
//! Each entity has a Model struct for data and an Entity struct for operations.
//! Expenses reference buckets by id only; there is no foreign key between them.

pub mod bucket;
pub mod expense;
pub mod income;

pub use bucket::{Column as BucketColumn, Entity as Bucket, Model as BucketModel};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use income::{Column as IncomeColumn, Entity as Income, Model as IncomeModel};
