//! Expense business logic - Applies and reverses expenses.
//!
//! A `Manual` expense draws on general savings. Since general savings is derived,
//! storing the expense is the whole draw. A `Bucket` expense draws on one bucket:
//! the monthly allowance goes first, then the fund. Every check runs before the
//! first write, and the bucket update and expense insert share one transaction.
//!
//! Deleting a bucket expense refunds the full amount into the bucket's fund,
//! never back into the allowance, whatever split the original draw used.

use crate::{
    core::{bucket::get_bucket_by_id, savings, validate_amount},
    entities::{Bucket, Expense, bucket, expense},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::{debug, info, warn};

/// The two kinds of expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseType {
    /// Paid from general savings
    Manual,
    /// Paid from one bucket's allowance and fund
    Bucket,
}

impl ExpenseType {
    /// The value stored in the `expense_type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "Manual",
            Self::Bucket => "Bucket",
        }
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("manual") {
            Ok(Self::Manual)
        } else if value.eq_ignore_ascii_case("bucket") {
            Ok(Self::Bucket)
        } else {
            Err(Error::InvalidExpenseType {
                value: value.to_string(),
            })
        }
    }
}

/// Input for [`create_expense`].
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// Amount to spend, must be positive
    pub amount: f64,
    /// Which pool pays
    pub expense_type: ExpenseType,
    /// Required for bucket expenses, forbidden otherwise
    pub bucket_id: Option<i64>,
    /// Calendar date of the expense
    pub date: NaiveDate,
    /// Optional note; blank notes are dropped
    pub note: Option<String>,
}

/// How a bucket expense was split between the two tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketDraw {
    /// Part taken from the monthly allowance
    pub from_allowance: f64,
    /// Part taken from the fund
    pub from_fund: f64,
}

/// Splits `amount` across a bucket, allowance first.
///
/// The caller has already checked `amount <= monthly_allowance + fund`.
#[must_use]
pub fn split_draw(monthly_allowance: f64, amount: f64) -> BucketDraw {
    if monthly_allowance >= amount {
        BucketDraw {
            from_allowance: amount,
            from_fund: 0.0,
        }
    } else {
        let from_allowance = monthly_allowance.max(0.0);
        BucketDraw {
            from_allowance,
            from_fund: amount - from_allowance,
        }
    }
}

/// Bucket balances after an expense was applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketBalance {
    /// The bucket that paid
    pub bucket_id: i64,
    /// Allowance left
    pub monthly_allowance: f64,
    /// Fund left
    pub fund: f64,
}

/// Outcome of [`create_expense`].
#[derive(Debug, Clone)]
pub struct ExpenseReceipt {
    /// The stored expense record
    pub expense: expense::Model,
    /// Present for bucket expenses
    pub draw: Option<BucketDraw>,
    /// Present for bucket expenses
    pub bucket_balance: Option<BucketBalance>,
}

/// Where the money of a deleted expense went.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExpenseRefund {
    /// A manual expense was removed; general savings grows by `amount`
    GeneralSavings {
        /// Amount returned
        amount: f64,
    },
    /// A bucket expense was removed and refunded into the fund
    BucketFund {
        /// Bucket that received the refund
        bucket_id: i64,
        /// Amount returned
        amount: f64,
        /// Fund after the refund
        new_fund: f64,
    },
    /// The bucket no longer exists; only the record was removed
    BucketMissing {
        /// Id the expense referenced
        bucket_id: i64,
        /// Amount of the removed expense
        amount: f64,
    },
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

fn validate_new_expense(new_expense: &NewExpense) -> Result<()> {
    validate_amount(new_expense.amount)?;

    match (new_expense.expense_type, new_expense.bucket_id) {
        (ExpenseType::Bucket, None) => Err(Error::Validation {
            message: "Bucket ID is required for Bucket expenses".to_string(),
        }),
        (ExpenseType::Manual, Some(_)) => Err(Error::Validation {
            message: "Manual expenses cannot reference a bucket".to_string(),
        }),
        _ => Ok(()),
    }
}

async fn insert_expense<C>(db: &C, new_expense: NewExpense) -> Result<expense::Model>
where
    C: ConnectionTrait,
{
    let model = expense::ActiveModel {
        amount: Set(new_expense.amount),
        expense_type: Set(new_expense.expense_type.as_str().to_string()),
        bucket_id: Set(new_expense.bucket_id),
        date: Set(new_expense.date),
        note: Set(normalize_note(new_expense.note)),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Records an expense and draws it from the right pool.
///
/// # Errors
/// Nothing is written when any of these fail:
/// - [`Error::InvalidAmount`] for a non-positive amount
/// - [`Error::Validation`] when `bucket_id` does not match the expense type
/// - [`Error::BucketNotFound`] for an unknown bucket
/// - [`Error::InsufficientFunds`] when the pool is smaller than the amount
pub async fn create_expense(
    db: &DatabaseConnection,
    new_expense: NewExpense,
) -> Result<ExpenseReceipt> {
    validate_new_expense(&new_expense)?;
    let amount = new_expense.amount;

    let txn = db.begin().await?;

    let receipt = match (new_expense.expense_type, new_expense.bucket_id) {
        (ExpenseType::Bucket, Some(bucket_id)) => {
            let bucket = get_bucket_by_id(&txn, bucket_id)
                .await?
                .ok_or_else(|| Error::BucketNotFound {
                    name: bucket_id.to_string(),
                })?;

            let available = bucket.total_balance();
            if amount > available {
                warn!(
                    "Rejected {amount:.2} expense from '{}': only {available:.2} available",
                    bucket.name
                );
                return Err(Error::InsufficientFunds {
                    available,
                    required: amount,
                });
            }

            let draw = split_draw(bucket.monthly_allowance, amount);
            let monthly_allowance = bucket.monthly_allowance - draw.from_allowance;
            // Clamp float residue; the check above guarantees the fund covers the rest
            let fund = (bucket.fund - draw.from_fund).max(0.0);

            let mut active_model: bucket::ActiveModel = bucket.into();
            active_model.monthly_allowance = Set(monthly_allowance);
            active_model.fund = Set(fund);
            active_model.updated_at = Set(Utc::now().naive_utc());
            active_model.update(&txn).await?;

            let expense = insert_expense(&txn, new_expense).await?;
            debug!(
                "Expense {} drew {:.2} from allowance and {:.2} from fund",
                expense.id, draw.from_allowance, draw.from_fund
            );

            ExpenseReceipt {
                expense,
                draw: Some(draw),
                bucket_balance: Some(BucketBalance {
                    bucket_id,
                    monthly_allowance,
                    fund,
                }),
            }
        }
        _ => {
            let summary = savings::calculate_savings(&txn).await?;
            if amount > summary.general_savings {
                warn!(
                    "Rejected {amount:.2} manual expense: general savings is {:.2}",
                    summary.general_savings
                );
                return Err(Error::InsufficientFunds {
                    available: summary.general_savings,
                    required: amount,
                });
            }

            ExpenseReceipt {
                expense: insert_expense(&txn, new_expense).await?,
                draw: None,
                bucket_balance: None,
            }
        }
    };

    txn.commit().await?;

    info!(
        "Recorded {} expense {} of {amount:.2}",
        receipt.expense.expense_type, receipt.expense.id
    );
    Ok(receipt)
}

/// Deletes an expense and reverses its effect.
///
/// Manual expenses need no reversal beyond removing the record. Bucket expenses
/// add their full amount back to the bucket's fund, if the bucket still exists.
pub async fn delete_expense(db: &DatabaseConnection, expense_id: i64) -> Result<ExpenseRefund> {
    let txn = db.begin().await?;

    let expense = Expense::find_by_id(expense_id)
        .one(&txn)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })?;

    let expense_type: ExpenseType = expense.expense_type.parse()?;
    let amount = expense.amount;

    let refund = match (expense_type, expense.bucket_id) {
        (ExpenseType::Bucket, Some(bucket_id)) => {
            match Bucket::find_by_id(bucket_id).one(&txn).await? {
                Some(bucket) => {
                    let new_fund = bucket.fund + amount;
                    let mut active_model: bucket::ActiveModel = bucket.into();
                    active_model.fund = Set(new_fund);
                    active_model.updated_at = Set(Utc::now().naive_utc());
                    active_model.update(&txn).await?;

                    ExpenseRefund::BucketFund {
                        bucket_id,
                        amount,
                        new_fund,
                    }
                }
                None => ExpenseRefund::BucketMissing { bucket_id, amount },
            }
        }
        _ => ExpenseRefund::GeneralSavings { amount },
    };

    expense.delete(&txn).await?;
    txn.commit().await?;

    info!("Deleted expense {expense_id}: {refund:?}");
    Ok(refund)
}

/// Retrieves every expense, newest first.
pub async fn get_all_expenses<C>(db: &C) -> Result<Vec<expense::Model>>
where
    C: ConnectionTrait,
{
    Expense::find()
        .order_by_desc(expense::Column::Date)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific expense by its unique ID.
pub async fn get_expense_by_id<C>(db: &C, expense_id: i64) -> Result<Option<expense::Model>>
where
    C: ConnectionTrait,
{
    Expense::find_by_id(expense_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the expenses drawn from one bucket, newest first.
pub async fn get_expenses_for_bucket<C>(db: &C, bucket_id: i64) -> Result<Vec<expense::Model>>
where
    C: ConnectionTrait,
{
    Expense::find()
        .filter(expense::Column::BucketId.eq(bucket_id))
        .order_by_desc(expense::Column::Date)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{bucket::delete_bucket, income::IncomeType, savings::calculate_savings};
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn bucket_expense(bucket_id: i64, amount: f64) -> NewExpense {
        NewExpense {
            amount,
            expense_type: ExpenseType::Bucket,
            bucket_id: Some(bucket_id),
            date: test_date(2025, 1, 15),
            note: Some("Groceries".to_string()),
        }
    }

    #[test]
    fn test_expense_type_parsing() {
        assert_eq!("Bucket".parse::<ExpenseType>().unwrap(), ExpenseType::Bucket);
        assert_eq!("manual".parse::<ExpenseType>().unwrap(), ExpenseType::Manual);
        assert!(matches!(
            "Credit".parse::<ExpenseType>(),
            Err(Error::InvalidExpenseType { value }) if value == "Credit"
        ));
    }

    #[test]
    fn test_split_draw_allowance_first() {
        assert_eq!(
            split_draw(5_000.0, 3_000.0),
            BucketDraw {
                from_allowance: 3_000.0,
                from_fund: 0.0
            }
        );
        assert_eq!(
            split_draw(5_000.0, 18_000.0),
            BucketDraw {
                from_allowance: 5_000.0,
                from_fund: 13_000.0
            }
        );
        assert_eq!(
            split_draw(0.0, 250.0),
            BucketDraw {
                from_allowance: 0.0,
                from_fund: 250.0
            }
        );
    }

    #[tokio::test]
    async fn test_create_expense_validation() -> Result<()> {
        // All of these must fail before any query is issued
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_expense(&db, bucket_expense(1, 0.0)).await;
        assert!(matches!(result, Err(Error::InvalidAmount { amount: 0.0 })));

        let result = create_expense(&db, bucket_expense(1, f64::NAN)).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));

        let mut missing_bucket = bucket_expense(1, 10.0);
        missing_bucket.bucket_id = None;
        let result = create_expense(&db, missing_bucket).await;
        assert!(matches!(result, Err(Error::Validation { message: _ })));

        let mut manual_with_bucket = bucket_expense(1, 10.0);
        manual_with_bucket.expense_type = ExpenseType::Manual;
        let result = create_expense(&db, manual_with_bucket).await;
        assert!(matches!(result, Err(Error::Validation { message: _ })));

        Ok(())
    }

    #[tokio::test]
    async fn test_bucket_expense_drains_allowance_then_fund() -> Result<()> {
        let (db, bucket) = setup_with_bucket().await?;
        set_bucket_balances(&db, bucket.id, 5_000.0, 15_000.0).await?;

        let receipt = create_expense(&db, bucket_expense(bucket.id, 18_000.0)).await?;

        let balance = receipt.bucket_balance.unwrap();
        assert_eq!(balance.monthly_allowance, 0.0);
        assert_eq!(balance.fund, 2_000.0);
        assert_eq!(receipt.draw.unwrap().from_fund, 13_000.0);
        assert_eq!(receipt.expense.bucket_id, Some(bucket.id));
        assert_eq!(receipt.expense.note.as_deref(), Some("Groceries"));

        let after = get_bucket_by_id(&db, bucket.id).await?.unwrap();
        assert_eq!(after.monthly_allowance, 0.0);
        assert_eq!(after.fund, 2_000.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_bucket_expense_can_exhaust_both_pools() -> Result<()> {
        let (db, bucket) = setup_with_bucket().await?;
        set_bucket_balances(&db, bucket.id, 1_000.0, 500.0).await?;

        create_expense(&db, bucket_expense(bucket.id, 1_500.0)).await?;

        let after = get_bucket_by_id(&db, bucket.id).await?.unwrap();
        assert_eq!(after.monthly_allowance, 0.0);
        assert_eq!(after.fund, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_bucket_expense_insufficient_funds_changes_nothing() -> Result<()> {
        let (db, bucket) = setup_with_bucket().await?;
        set_bucket_balances(&db, bucket.id, 1_000.0, 500.0).await?;

        let result = create_expense(&db, bucket_expense(bucket.id, 1_500.01)).await;
        assert!(matches!(
            result,
            Err(Error::InsufficientFunds { available, .. }) if available == 1_500.0
        ));

        let after = get_bucket_by_id(&db, bucket.id).await?.unwrap();
        assert_eq!(after.monthly_allowance, 1_000.0);
        assert_eq!(after.fund, 500.0);
        assert!(get_all_expenses(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_bucket_expense_unknown_bucket() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_expense(&db, bucket_expense(77, 10.0)).await;
        assert!(matches!(result, Err(Error::BucketNotFound { name }) if name == "77"));
        assert!(get_all_expenses(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_manual_expense_limited_by_general_savings() -> Result<()> {
        let (db, bucket) = setup_with_bucket().await?;
        add_test_income(&db, 1_000.0, IncomeType::Manual, test_date(2025, 1, 1)).await?;
        set_bucket_balances(&db, bucket.id, 0.0, 600.0).await?;

        // 1000 income, 600 locked: 400 spendable
        let result = add_manual_expense(&db, 400.5, test_date(2025, 1, 2)).await;
        assert!(matches!(
            result,
            Err(Error::InsufficientFunds { available, required }) if available == 400.0 && required == 400.5
        ));

        let receipt = add_manual_expense(&db, 400.0, test_date(2025, 1, 2)).await?;
        assert!(receipt.bucket_balance.is_none());
        assert_eq!(receipt.expense.expense_type, "Manual");
        assert_eq!(receipt.expense.bucket_id, None);

        let summary = calculate_savings(&db).await?;
        assert_eq!(summary.general_savings, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_manual_expense_restores_general_savings() -> Result<()> {
        let db = setup_test_db().await?;
        add_test_income(&db, 1_000.0, IncomeType::Manual, test_date(2025, 1, 1)).await?;
        let receipt = add_manual_expense(&db, 250.0, test_date(2025, 1, 3)).await?;

        let before = calculate_savings(&db).await?;
        let refund = delete_expense(&db, receipt.expense.id).await?;
        let after = calculate_savings(&db).await?;

        assert_eq!(refund, ExpenseRefund::GeneralSavings { amount: 250.0 });
        assert_eq!(after.general_savings - before.general_savings, 250.0);
        assert!(get_expense_by_id(&db, receipt.expense.id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_bucket_expense_refunds_into_fund() -> Result<()> {
        let (db, bucket) = setup_with_bucket().await?;
        set_bucket_balances(&db, bucket.id, 5_000.0, 15_000.0).await?;

        let receipt = create_expense(&db, bucket_expense(bucket.id, 3_000.0)).await?;
        let drawn = get_bucket_by_id(&db, bucket.id).await?.unwrap();
        assert_eq!(drawn.monthly_allowance, 2_000.0);
        assert_eq!(drawn.fund, 15_000.0);

        let refund = delete_expense(&db, receipt.expense.id).await?;
        assert_eq!(
            refund,
            ExpenseRefund::BucketFund {
                bucket_id: bucket.id,
                amount: 3_000.0,
                new_fund: 18_000.0
            }
        );

        // The allowance is not restored; the whole refund lands in the fund
        let after = get_bucket_by_id(&db, bucket.id).await?.unwrap();
        assert_eq!(after.monthly_allowance, 2_000.0);
        assert_eq!(after.fund, 18_000.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_expense_of_deleted_bucket() -> Result<()> {
        let (db, bucket) = setup_with_bucket().await?;
        set_bucket_balances(&db, bucket.id, 100.0, 0.0).await?;

        let receipt = create_expense(&db, bucket_expense(bucket.id, 40.0)).await?;
        delete_bucket(&db, bucket.id).await?;

        // Expense survives the bucket
        assert_eq!(get_expenses_for_bucket(&db, bucket.id).await?.len(), 1);

        let refund = delete_expense(&db, receipt.expense.id).await?;
        assert_eq!(
            refund,
            ExpenseRefund::BucketMissing {
                bucket_id: bucket.id,
                amount: 40.0
            }
        );
        assert!(get_all_expenses(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_expense_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = delete_expense(&db, 5).await;
        assert!(matches!(result, Err(Error::ExpenseNotFound { id: 5 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_blank_note_is_dropped() -> Result<()> {
        let (db, bucket) = setup_with_bucket().await?;
        set_bucket_balances(&db, bucket.id, 100.0, 0.0).await?;

        let mut new_expense = bucket_expense(bucket.id, 10.0);
        new_expense.note = Some("   ".to_string());
        let receipt = create_expense(&db, new_expense).await?;
        assert_eq!(receipt.expense.note, None);

        Ok(())
    }
}
