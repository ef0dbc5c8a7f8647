//! Derived savings figures.
//!
//! Nothing here is stored. Net worth, locked funds and general savings are
//! recomputed from every income, expense and bucket on each call, so they can
//! never drift from the records.

use crate::{
    entities::{Bucket, Expense, Income, bucket, expense, income},
    errors::Result,
};
use sea_orm::prelude::*;
use serde::Serialize;

/// The three dashboard figures.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SavingsSummary {
    /// Money not held by any bucket: `net_worth - locked_funds`
    pub general_savings: f64,
    /// All income minus all expenses
    pub net_worth: f64,
    /// Sum of every bucket's allowance and fund
    pub locked_funds: f64,
}

impl SavingsSummary {
    /// Computes the summary from already loaded records.
    #[must_use]
    pub fn from_records(
        incomes: &[income::Model],
        expenses: &[expense::Model],
        buckets: &[bucket::Model],
    ) -> Self {
        let total_income: f64 = incomes.iter().map(|i| i.amount).sum();
        let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();
        let locked_funds: f64 = buckets.iter().map(bucket::Model::total_balance).sum();

        let net_worth = total_income - total_expenses;

        Self {
            general_savings: net_worth - locked_funds,
            net_worth,
            locked_funds,
        }
    }
}

/// Loads every record and derives the savings summary.
///
/// Accepts any connection so it can run inside a caller's transaction, which
/// is how the expense and top-up paths read a consistent balance.
pub async fn calculate_savings<C>(db: &C) -> Result<SavingsSummary>
where
    C: ConnectionTrait,
{
    let incomes = Income::find().all(db).await?;
    let expenses = Expense::find().all(db).await?;
    let buckets = Bucket::find().all(db).await?;

    Ok(SavingsSummary::from_records(&incomes, &expenses, &buckets))
}
