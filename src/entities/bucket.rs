//! Bucket entity - A named savings category fed by a share of each salary.
//!
//! A bucket holds money on two tiers: `monthly_allowance` is the spendable
//! amount for the current salary cycle, `fund` is what has accumulated from
//! earlier cycles. `allocation_amount` only remembers the most recent share.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Bucket database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "buckets")]
pub struct Model {
    /// Unique identifier for the bucket
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name (e.g., "Emergency", "Travel")
    pub name: String,
    /// Share of each salary routed to this bucket, 0 to 100
    pub percentage: f64,
    /// Free-text description of what the bucket is for
    pub purpose: String,
    /// Spendable balance for the current salary cycle
    pub monthly_allowance: f64,
    /// Amount allocated by the most recent salary, for progress display
    pub allocation_amount: f64,
    /// Long-term balance accumulated from rolled-over allowances and top-ups
    pub fund: f64,
    /// When the bucket was created
    pub created_at: DateTime,
    /// When the bucket was last modified
    pub updated_at: DateTime,
}

impl Model {
    /// Everything the bucket holds across both tiers.
    #[must_use]
    pub fn total_balance(&self) -> f64 {
        self.monthly_allowance + self.fund
    }
}

/// Buckets are only referenced weakly by expenses
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
