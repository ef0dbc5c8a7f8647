//! Income entity - A single inflow event, either a monthly salary or a manual deposit.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Income database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    /// Unique identifier for the income
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Amount received, always positive
    pub amount: f64,
    /// Type of income: `"Salary"` or `"Manual"`
    pub income_type: String,
    /// Calendar date the income belongs to
    pub date: Date,
    /// When the record was created
    pub created_at: DateTime,
}

/// Income has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
