//! Bucket business logic - Handles creation, updates, deletion and top-ups of buckets.
//!
//! The sum of all bucket percentages never exceeds 100. Every path that can change
//! a percentage checks the total inside the same transaction that writes it.

use crate::{
    config::settings::BucketConfig,
    core::{require_text, savings, validate_amount},
    entities::{Bucket, bucket},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, warn};

const MAX_TOTAL_PERCENTAGE: f64 = 100.0;

/// Optional changes for [`update_bucket`]. Fields left as `None` are not touched.
#[derive(Debug, Clone, Default)]
pub struct UpdateBucketArgs {
    /// New name
    pub name: Option<String>,
    /// New percentage, 0 to 100
    pub percentage: Option<f64>,
    /// New purpose
    pub purpose: Option<String>,
}

impl UpdateBucketArgs {
    const fn is_empty(&self) -> bool {
        self.name.is_none() && self.percentage.is_none() && self.purpose.is_none()
    }
}

/// Outcome of deleting a bucket.
#[derive(Debug, Clone)]
pub struct BucketRelease {
    /// The bucket as it was just before deletion
    pub bucket: bucket::Model,
    /// Allowance plus fund, now part of general savings
    pub released_amount: f64,
}

/// Retrieves all buckets ordered alphabetically by name.
pub async fn get_all_buckets<C>(db: &C) -> Result<Vec<bucket::Model>>
where
    C: ConnectionTrait,
{
    Bucket::find()
        .order_by_asc(bucket::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a bucket by its unique ID.
pub async fn get_bucket_by_id<C>(db: &C, bucket_id: i64) -> Result<Option<bucket::Model>>
where
    C: ConnectionTrait,
{
    Bucket::find_by_id(bucket_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a bucket by name. Surrounding whitespace in `name` is ignored.
pub async fn get_bucket_by_name<C>(db: &C, name: &str) -> Result<Option<bucket::Model>>
where
    C: ConnectionTrait,
{
    Bucket::find()
        .filter(bucket::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_bucket_by_name`], but a missing bucket is an error.
pub async fn require_bucket_by_name<C>(db: &C, name: &str) -> Result<bucket::Model>
where
    C: ConnectionTrait,
{
    get_bucket_by_name(db, name)
        .await?
        .ok_or_else(|| Error::BucketNotFound {
            name: name.trim().to_string(),
        })
}

fn validate_percentage(percentage: f64) -> Result<()> {
    if !percentage.is_finite() || !(0.0..=MAX_TOTAL_PERCENTAGE).contains(&percentage) {
        return Err(Error::InvalidPercentage { percentage });
    }
    Ok(())
}

/// Sum of the percentages of every bucket except `exclude_bucket_id`.
async fn allocated_percentage<C>(db: &C, exclude_bucket_id: Option<i64>) -> Result<f64>
where
    C: ConnectionTrait,
{
    let mut query = Bucket::find();
    if let Some(id) = exclude_bucket_id {
        query = query.filter(bucket::Column::Id.ne(id));
    }

    let buckets = query.all(db).await?;
    Ok(buckets.iter().map(|b| b.percentage).sum())
}

/// Returns whether adding `new_percentage` keeps the total at or below 100.
///
/// `exclude_bucket_id` leaves one bucket out of the existing total, so an update
/// is measured against the other buckets only.
pub async fn check_total_percentage<C>(
    db: &C,
    new_percentage: f64,
    exclude_bucket_id: Option<i64>,
) -> Result<bool>
where
    C: ConnectionTrait,
{
    let total = allocated_percentage(db, exclude_bucket_id).await? + new_percentage;
    Ok(total <= MAX_TOTAL_PERCENTAGE)
}

async fn ensure_percentage_fits<C>(
    db: &C,
    new_percentage: f64,
    exclude_bucket_id: Option<i64>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let total = allocated_percentage(db, exclude_bucket_id).await? + new_percentage;
    if total > MAX_TOTAL_PERCENTAGE {
        warn!("Rejected bucket percentage {new_percentage}: total would be {total}%");
        return Err(Error::PercentageExceeded { total });
    }
    Ok(())
}

async fn ensure_name_available<C>(db: &C, name: &str, exclude_bucket_id: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    if let Some(existing) = get_bucket_by_name(db, name).await? {
        if Some(existing.id) != exclude_bucket_id {
            return Err(Error::Validation {
                message: format!("Bucket '{name}' already exists"),
            });
        }
    }
    Ok(())
}

/// Creates a new bucket with empty balances.
///
/// Validates the name, purpose and percentage, rejects duplicate names, and
/// refuses any percentage that would push the total above 100.
pub async fn create_bucket(
    db: &DatabaseConnection,
    name: &str,
    percentage: f64,
    purpose: &str,
) -> Result<bucket::Model> {
    let name = require_text("Bucket name", name)?;
    let purpose = require_text("Purpose", purpose)?;
    validate_percentage(percentage)?;

    let txn = db.begin().await?;

    ensure_name_available(&txn, &name, None).await?;
    ensure_percentage_fits(&txn, percentage, None).await?;

    let now = Utc::now().naive_utc();
    let bucket = bucket::ActiveModel {
        name: Set(name),
        percentage: Set(percentage),
        purpose: Set(purpose),
        monthly_allowance: Set(0.0),
        allocation_amount: Set(0.0),
        fund: Set(0.0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = bucket.insert(&txn).await?;
    txn.commit().await?;

    info!(
        "Created bucket '{}' at {}%",
        created.name, created.percentage
    );
    Ok(created)
}

/// Updates a bucket's name, percentage and/or purpose.
///
/// The percentage total is only re-checked when the percentage actually changes,
/// so resubmitting the current value never fails against a total that already
/// includes it.
pub async fn update_bucket(
    db: &DatabaseConnection,
    bucket_id: i64,
    args: UpdateBucketArgs,
) -> Result<bucket::Model> {
    if args.is_empty() {
        return Err(Error::Validation {
            message: "At least one field (name, percentage, or purpose) must be provided for update"
                .to_string(),
        });
    }

    let name = args
        .name
        .as_deref()
        .map(|n| require_text("Bucket name", n))
        .transpose()?;
    let purpose = args
        .purpose
        .as_deref()
        .map(|p| require_text("Purpose", p))
        .transpose()?;
    if let Some(percentage) = args.percentage {
        validate_percentage(percentage)?;
    }

    let txn = db.begin().await?;

    let existing = get_bucket_by_id(&txn, bucket_id)
        .await?
        .ok_or_else(|| Error::BucketNotFound {
            name: bucket_id.to_string(),
        })?;

    #[allow(clippy::float_cmp)] // only an exact change should trigger the check
    let changed_percentage = args.percentage.filter(|p| *p != existing.percentage);
    if let Some(percentage) = changed_percentage {
        ensure_percentage_fits(&txn, percentage, Some(bucket_id)).await?;
    }

    if let Some(ref new_name) = name {
        if *new_name != existing.name {
            ensure_name_available(&txn, new_name, Some(bucket_id)).await?;
        }
    }

    let mut active_model: bucket::ActiveModel = existing.into();
    if let Some(new_name) = name {
        active_model.name = Set(new_name);
    }
    if let Some(percentage) = args.percentage {
        active_model.percentage = Set(percentage);
    }
    if let Some(new_purpose) = purpose {
        active_model.purpose = Set(new_purpose);
    }
    active_model.updated_at = Set(Utc::now().naive_utc());

    let updated = active_model.update(&txn).await?;
    txn.commit().await?;

    debug!("Updated bucket {} ({})", updated.id, updated.name);
    Ok(updated)
}

/// Deletes a bucket and reports how much it held.
///
/// No transfer record is written: once the bucket is gone its allowance and fund
/// no longer count as locked, so general savings absorbs them on the next read.
/// Expenses that referenced the bucket are kept.
pub async fn delete_bucket(db: &DatabaseConnection, bucket_id: i64) -> Result<BucketRelease> {
    let txn = db.begin().await?;

    let bucket = get_bucket_by_id(&txn, bucket_id)
        .await?
        .ok_or_else(|| Error::BucketNotFound {
            name: bucket_id.to_string(),
        })?;

    let released_amount = bucket.total_balance();
    Bucket::delete_by_id(bucket_id).exec(&txn).await?;
    txn.commit().await?;

    info!(
        "Deleted bucket '{}'; {released_amount:.2} moved to general savings",
        bucket.name
    );
    Ok(BucketRelease {
        bucket,
        released_amount,
    })
}

/// Moves `amount` from general savings into a bucket's fund.
///
/// Fails with [`Error::NoGeneralSavings`] when general savings is not positive,
/// and with [`Error::InsufficientFunds`] when it is smaller than `amount`.
pub async fn add_from_general_savings(
    db: &DatabaseConnection,
    bucket_id: i64,
    amount: f64,
) -> Result<bucket::Model> {
    validate_amount(amount)?;

    let txn = db.begin().await?;

    let bucket = get_bucket_by_id(&txn, bucket_id)
        .await?
        .ok_or_else(|| Error::BucketNotFound {
            name: bucket_id.to_string(),
        })?;

    let summary = savings::calculate_savings(&txn).await?;
    if summary.general_savings <= 0.0 {
        return Err(Error::NoGeneralSavings);
    }
    if summary.general_savings < amount {
        return Err(Error::InsufficientFunds {
            available: summary.general_savings,
            required: amount,
        });
    }

    let new_fund = bucket.fund + amount;
    let mut active_model: bucket::ActiveModel = bucket.into();
    active_model.fund = Set(new_fund);
    active_model.updated_at = Set(Utc::now().naive_utc());

    let updated = active_model.update(&txn).await?;
    txn.commit().await?;

    info!("Added {amount:.2} from general savings to bucket '{}'", updated.name);
    Ok(updated)
}

/// Creates configured buckets that do not exist yet, matched by name.
///
/// A seed that would break the percentage limit is skipped with a warning rather
/// than aborting startup. Returns how many buckets were created.
pub async fn seed_buckets(db: &DatabaseConnection, seeds: &[BucketConfig]) -> Result<usize> {
    let mut created = 0;

    for seed in seeds {
        if get_bucket_by_name(db, &seed.name).await?.is_some() {
            debug!("Bucket '{}' already exists, skipping seed", seed.name);
            continue;
        }

        match create_bucket(db, &seed.name, seed.percentage, &seed.purpose).await {
            Ok(_) => created += 1,
            Err(e) if e.is_user_error() => {
                warn!("Skipping seeded bucket '{}': {e}", seed.name);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(created)
}
