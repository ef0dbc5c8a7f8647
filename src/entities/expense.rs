//! Expense entity - A single outflow, drawn from general savings or from one bucket.
//!
//! `bucket_id` is set only for `"Bucket"` expenses. It is a plain id rather than a
//! relation: deleting a bucket leaves its expenses in place.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Amount spent, always positive
    pub amount: f64,
    /// Type of expense: `"Manual"` or `"Bucket"`
    pub expense_type: String,
    /// Bucket the expense was drawn from, for `"Bucket"` expenses
    pub bucket_id: Option<i64>,
    /// Calendar date of the expense
    pub date: Date,
    /// Optional free-text note
    pub note: Option<String>,
    /// When the record was created
    pub created_at: DateTime,
}

/// Expense has no enforced relationships (weak reference to bucket)
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
