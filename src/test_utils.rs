//! Shared test utilities.
//!
//! Helpers for setting up an in-memory database and creating buckets, incomes
//! and expenses with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        bucket,
        expense::{self, ExpenseReceipt, ExpenseType, NewExpense},
        income::{self, IncomeReceipt, IncomeType},
    },
    entities,
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a date, panicking on an impossible one.
pub fn test_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates a bucket through the normal path, with a default purpose.
pub async fn create_test_bucket(
    db: &DatabaseConnection,
    name: &str,
    percentage: f64,
) -> Result<entities::bucket::Model> {
    bucket::create_bucket(db, name, percentage, "Test purpose").await
}

/// Inserts a bucket directly, skipping the percentage guard.
/// Use this to set up states the guard would normally refuse.
pub async fn insert_raw_bucket(
    db: &DatabaseConnection,
    name: &str,
    percentage: f64,
) -> Result<entities::bucket::Model> {
    let now = Utc::now().naive_utc();
    let model = entities::bucket::ActiveModel {
        name: Set(name.to_string()),
        percentage: Set(percentage),
        purpose: Set("Test purpose".to_string()),
        monthly_allowance: Set(0.0),
        allocation_amount: Set(0.0),
        fund: Set(0.0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Overwrites a bucket's allowance and fund.
pub async fn set_bucket_balances(
    db: &DatabaseConnection,
    bucket_id: i64,
    monthly_allowance: f64,
    fund: f64,
) -> Result<entities::bucket::Model> {
    let bucket = entities::Bucket::find_by_id(bucket_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::BucketNotFound {
            name: bucket_id.to_string(),
        })?;

    let mut active_model: entities::bucket::ActiveModel = bucket.into();
    active_model.monthly_allowance = Set(monthly_allowance);
    active_model.fund = Set(fund);
    active_model.update(db).await.map_err(Into::into)
}

/// Records an income through the normal path.
pub async fn add_test_income(
    db: &DatabaseConnection,
    amount: f64,
    income_type: IncomeType,
    date: NaiveDate,
) -> Result<IncomeReceipt> {
    income::add_income(db, amount, income_type, date).await
}

/// Records a manual expense with no note.
pub async fn add_manual_expense(
    db: &DatabaseConnection,
    amount: f64,
    date: NaiveDate,
) -> Result<ExpenseReceipt> {
    expense::create_expense(
        db,
        NewExpense {
            amount,
            expense_type: ExpenseType::Manual,
            bucket_id: None,
            date,
            note: None,
        },
    )
    .await
}

/// Sets up a database with one bucket named "Test Bucket" at 20%.
/// Returns (db, bucket) for common test scenarios.
pub async fn setup_with_bucket() -> Result<(DatabaseConnection, entities::bucket::Model)> {
    let db = setup_test_db().await?;
    let bucket = create_test_bucket(&db, "Test Bucket", 20.0).await?;
    Ok((db, bucket))
}
