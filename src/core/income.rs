//! Income business logic - Records salary and manual income.
//!
//! A salary starts a new cycle: buckets roll over, the income is stored, and the
//! salary is distributed, all in one transaction. Only one salary may exist per
//! calendar month. Manual income is simply stored.

use crate::{
    core::{
        monthly::{self, DistributionResult, RolloverResult},
        validate_amount,
    },
    entities::{Income, income},
    errors::{Error, Result},
};
use chrono::{Datelike, Months, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::{info, warn};

/// The two kinds of income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeType {
    /// Monthly salary; triggers rollover and distribution
    Salary,
    /// Any other deposit; goes straight to general savings
    Manual,
}

impl IncomeType {
    /// The value stored in the `income_type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Salary => "Salary",
            Self::Manual => "Manual",
        }
    }
}

impl fmt::Display for IncomeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncomeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("salary") {
            Ok(Self::Salary)
        } else if value.eq_ignore_ascii_case("manual") {
            Ok(Self::Manual)
        } else {
            Err(Error::InvalidIncomeType {
                value: value.to_string(),
            })
        }
    }
}

/// Rollover and distribution performed for a salary.
#[derive(Debug, Clone)]
pub struct SalaryCycle {
    /// Allowances moved into funds before the salary was split
    pub rollover: RolloverResult,
    /// How the salary was split across buckets
    pub distribution: DistributionResult,
}

/// Outcome of [`add_income`].
#[derive(Debug, Clone)]
pub struct IncomeReceipt {
    /// The stored income record
    pub income: income::Model,
    /// Present for salary income only
    pub cycle: Option<SalaryCycle>,
}

/// First and last day of the month containing `date`.
pub fn month_bounds(date: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    let invalid = || Error::Validation {
        message: format!("Cannot determine the month of {date}"),
    };

    let start = date.with_day(1).ok_or_else(invalid)?;
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(invalid)?;

    Ok((start, end))
}

/// Finds the salary recorded for the month containing `date`, if any.
pub async fn find_salary_in_month<C>(db: &C, date: NaiveDate) -> Result<Option<income::Model>>
where
    C: ConnectionTrait,
{
    let (start, end) = month_bounds(date)?;

    Income::find()
        .filter(income::Column::IncomeType.eq(IncomeType::Salary.as_str()))
        .filter(income::Column::Date.between(start, end))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Records an income.
///
/// For [`IncomeType::Salary`] this rejects a second salary in the same calendar
/// month, then rolls over all buckets, stores the income and distributes the
/// salary. Nothing is written if any step fails.
pub async fn add_income(
    db: &DatabaseConnection,
    amount: f64,
    income_type: IncomeType,
    date: NaiveDate,
) -> Result<IncomeReceipt> {
    validate_amount(amount)?;

    let txn = db.begin().await?;

    let cycle_rollover = if income_type == IncomeType::Salary {
        if find_salary_in_month(&txn, date).await?.is_some() {
            warn!("Rejected second salary for {}-{:02}", date.year(), date.month());
            return Err(Error::DuplicateSalary {
                year: date.year(),
                month: date.month(),
            });
        }
        Some(monthly::rollover_buckets(&txn).await?)
    } else {
        None
    };

    let income_model = income::ActiveModel {
        amount: Set(amount),
        income_type: Set(income_type.as_str().to_string()),
        date: Set(date),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    let income = income_model.insert(&txn).await?;

    let cycle = match cycle_rollover {
        Some(rollover) => {
            let distribution = monthly::distribute_salary(&txn, amount).await?;
            Some(SalaryCycle {
                rollover,
                distribution,
            })
        }
        None => None,
    };

    txn.commit().await?;

    info!("Recorded {income_type} income of {amount:.2} on {date}");
    Ok(IncomeReceipt { income, cycle })
}

/// Retrieves every income, newest first.
pub async fn get_income_history<C>(db: &C) -> Result<Vec<income::Model>>
where
    C: ConnectionTrait,
{
    Income::find()
        .order_by_desc(income::Column::Date)
        .order_by_desc(income::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific income by its unique ID.
pub async fn get_income_by_id<C>(db: &C, income_id: i64) -> Result<Option<income::Model>>
where
    C: ConnectionTrait,
{
    Income::find_by_id(income_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Deletes an income record and returns it.
///
/// Shares already distributed from a deleted salary stay in their buckets; the
/// removal shows up as lower net worth and general savings.
pub async fn delete_income(db: &DatabaseConnection, income_id: i64) -> Result<income::Model> {
    let income = get_income_by_id(db, income_id)
        .await?
        .ok_or(Error::IncomeNotFound { id: income_id })?;

    Income::delete_by_id(income_id).exec(db).await?;

    info!(
        "Deleted {} income {} of {:.2}",
        income.income_type, income.id, income.amount
    );
    Ok(income)
}
