//! Salary cycle business logic
//!
//! Two steps run when a salary arrives. Rollover moves whatever is left of each
//! bucket's monthly allowance into its fund. Distribution then gives every bucket
//! its percentage of the new salary as a fresh allowance.
//!
//! Both functions accept any connection. The salary path in
//! [`crate::core::income`] calls them on one transaction so the cycle commits as
//! a whole; rollover has to finish for every bucket before distribution starts.

use crate::{
    entities::{Bucket, bucket},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use std::fmt::Write;
use tracing::{debug, info};

/// What rollover did to one bucket.
#[derive(Debug, Clone)]
pub struct BucketRollover {
    /// Name of the bucket
    pub bucket_name: String,
    /// Allowance moved into the fund
    pub rolled_amount: f64,
    /// Fund after the move
    pub new_fund: f64,
}

/// Result of rolling over every bucket.
#[derive(Debug, Clone, Default)]
pub struct RolloverResult {
    /// Buckets that had a positive allowance
    pub rolled_buckets: Vec<BucketRollover>,
    /// Sum of all rolled allowances
    pub total_rolled: f64,
}

/// What distribution gave one bucket.
#[derive(Debug, Clone)]
pub struct BucketAllocation {
    /// Name of the bucket
    pub bucket_name: String,
    /// Percentage the share was computed from
    pub percentage: f64,
    /// Amount added to the allowance
    pub share: f64,
    /// Allowance after the share was added
    pub new_allowance: f64,
}

/// Result of distributing one salary.
#[derive(Debug, Clone, Default)]
pub struct DistributionResult {
    /// The salary that was split
    pub salary: f64,
    /// Buckets that received a share
    pub allocations: Vec<BucketAllocation>,
    /// Sum of all shares, never more than `salary`
    pub total_allocated: f64,
}

/// A bucket's share of a salary. No rounding is applied.
#[must_use]
pub fn allocation_share(salary: f64, percentage: f64) -> f64 {
    salary * percentage / 100.0
}

/// Moves each bucket's unspent monthly allowance into its fund.
///
/// Buckets with no allowance are left alone, so a second call with no
/// distribution in between changes nothing.
pub async fn rollover_buckets<C>(db: &C) -> Result<RolloverResult>
where
    C: ConnectionTrait,
{
    let buckets = Bucket::find()
        .filter(bucket::Column::MonthlyAllowance.gt(0.0))
        .order_by_asc(bucket::Column::Id)
        .all(db)
        .await?;

    let now = Utc::now().naive_utc();
    let mut result = RolloverResult::default();

    for b in buckets {
        let rolled_amount = b.monthly_allowance;
        let new_fund = b.fund + rolled_amount;
        let bucket_name = b.name.clone();

        let mut active_model: bucket::ActiveModel = b.into();
        active_model.fund = Set(new_fund);
        active_model.monthly_allowance = Set(0.0);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;

        debug!("Rolled {rolled_amount:.2} of '{bucket_name}' into its fund");
        result.total_rolled += rolled_amount;
        result.rolled_buckets.push(BucketRollover {
            bucket_name,
            rolled_amount,
            new_fund,
        });
    }

    info!(
        "Rollover complete: {:.2} moved into funds across {} bucket(s)",
        result.total_rolled,
        result.rolled_buckets.len()
    );
    Ok(result)
}

/// Gives every bucket with a positive percentage its share of `salary`.
///
/// The share is added to the monthly allowance and also recorded as the
/// bucket's allocation amount. Zero-percent buckets are skipped.
pub async fn distribute_salary<C>(db: &C, salary: f64) -> Result<DistributionResult>
where
    C: ConnectionTrait,
{
    let buckets = Bucket::find()
        .filter(bucket::Column::Percentage.gt(0.0))
        .order_by_asc(bucket::Column::Id)
        .all(db)
        .await?;

    let now = Utc::now().naive_utc();
    let mut result = DistributionResult {
        salary,
        ..Default::default()
    };

    for b in buckets {
        let share = allocation_share(salary, b.percentage);
        let new_allowance = b.monthly_allowance + share;
        let bucket_name = b.name.clone();
        let percentage = b.percentage;

        let mut active_model: bucket::ActiveModel = b.into();
        active_model.monthly_allowance = Set(new_allowance);
        active_model.allocation_amount = Set(share);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;

        result.total_allocated += share;
        result.allocations.push(BucketAllocation {
            bucket_name,
            percentage,
            share,
            new_allowance,
        });
    }

    info!(
        "Distributed {:.2} of {salary:.2} salary across {} bucket(s)",
        result.total_allocated,
        result.allocations.len()
    );
    Ok(result)
}

/// Formats a salary cycle into a human-readable summary.
pub fn format_cycle_summary(
    rollover: &RolloverResult,
    distribution: &DistributionResult,
    currency: &str,
) -> Result<String> {
    let mut summary = format!(
        "Salary {currency}{:.2} - {} bucket(s) funded\n",
        distribution.salary,
        distribution.allocations.len()
    );

    writeln!(
        summary,
        "  Rolled into funds: {currency}{:.2} | Allocated: {currency}{:.2} | Unallocated: {currency}{:.2}\n",
        rollover.total_rolled,
        distribution.total_allocated,
        distribution.salary - distribution.total_allocated
    )?;

    for allocation in &distribution.allocations {
        writeln!(
            summary,
            "  {} - {:.1}% | +{currency}{:.2} → allowance {currency}{:.2}",
            allocation.bucket_name, allocation.percentage, allocation.share, allocation.new_allowance
        )?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::bucket::get_bucket_by_id;
    use crate::test_utils::*;

    #[test]
    fn test_allocation_share() {
        assert_eq!(allocation_share(50_000.0, 20.0), 10_000.0);
        assert_eq!(allocation_share(50_000.0, 0.0), 0.0);
        assert_eq!(allocation_share(1_000.0, 12.5), 125.0);
        // Fractions are carried at full precision
        assert_eq!(allocation_share(100.0, 33.3), 100.0 * 33.3 / 100.0);
    }

    #[tokio::test]
    async fn test_rollover_moves_allowance_into_fund() -> Result<()> {
        let (db, bucket) = setup_with_bucket().await?;
        set_bucket_balances(&db, bucket.id, 1_200.0, 3_000.0).await?;

        let result = rollover_buckets(&db).await?;
        assert_eq!(result.rolled_buckets.len(), 1);
        assert_eq!(result.total_rolled, 1_200.0);
        assert_eq!(result.rolled_buckets[0].new_fund, 4_200.0);

        let after = get_bucket_by_id(&db, bucket.id).await?.unwrap();
        assert_eq!(after.monthly_allowance, 0.0);
        assert_eq!(after.fund, 4_200.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_rollover_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_bucket(&db, "A", 10.0).await?;
        let b = create_test_bucket(&db, "B", 20.0).await?;
        set_bucket_balances(&db, a.id, 500.0, 100.0).await?;
        set_bucket_balances(&db, b.id, 0.0, 900.0).await?;

        rollover_buckets(&db).await?;
        let second = rollover_buckets(&db).await?;
        assert!(second.rolled_buckets.is_empty());
        assert_eq!(second.total_rolled, 0.0);

        let a_after = get_bucket_by_id(&db, a.id).await?.unwrap();
        let b_after = get_bucket_by_id(&db, b.id).await?.unwrap();
        assert_eq!(a_after.monthly_allowance, 0.0);
        assert_eq!(a_after.fund, 600.0);
        assert_eq!(b_after.monthly_allowance, 0.0);
        assert_eq!(b_after.fund, 900.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_distribute_salary() -> Result<()> {
        let (db, bucket) = setup_with_bucket().await?;
        set_bucket_balances(&db, bucket.id, 250.0, 0.0).await?;

        let result = distribute_salary(&db, 50_000.0).await?;
        assert_eq!(result.allocations.len(), 1);
        assert_eq!(result.allocations[0].share, 10_000.0);

        let after = get_bucket_by_id(&db, bucket.id).await?.unwrap();
        assert_eq!(after.monthly_allowance, 10_250.0);
        assert_eq!(after.allocation_amount, 10_000.0);
        assert_eq!(after.fund, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_distribute_skips_zero_percent_buckets() -> Result<()> {
        let db = setup_test_db().await?;
        let funded = create_test_bucket(&db, "Funded", 25.0).await?;
        let idle = create_test_bucket(&db, "Idle", 0.0).await?;
        set_bucket_balances(&db, idle.id, 40.0, 0.0).await?;

        let result = distribute_salary(&db, 8_000.0).await?;
        assert_eq!(result.allocations.len(), 1);
        assert_eq!(result.allocations[0].bucket_name, "Funded");

        let funded_after = get_bucket_by_id(&db, funded.id).await?.unwrap();
        let idle_after = get_bucket_by_id(&db, idle.id).await?.unwrap();
        assert_eq!(funded_after.monthly_allowance, 2_000.0);
        assert_eq!(idle_after.monthly_allowance, 40.0);
        assert_eq!(idle_after.allocation_amount, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_distribute_never_exceeds_salary() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_bucket(&db, "A", 33.3).await?;
        create_test_bucket(&db, "B", 33.3).await?;
        create_test_bucket(&db, "C", 33.4).await?;

        let before: f64 = crate::core::bucket::get_all_buckets(&db)
            .await?
            .iter()
            .map(|b| b.monthly_allowance)
            .sum();

        let salary = 12_345.67;
        let result = distribute_salary(&db, salary).await?;

        let after: f64 = crate::core::bucket::get_all_buckets(&db)
            .await?
            .iter()
            .map(|b| b.monthly_allowance)
            .sum();

        let increase = after - before;
        assert!(increase <= salary + 1e-9);
        assert!((increase - result.total_allocated).abs() < 1e-9);

        Ok(())
    }

    #[test]
    fn test_format_cycle_summary() {
        let rollover = RolloverResult {
            rolled_buckets: Vec::new(),
            total_rolled: 300.0,
        };
        let distribution = DistributionResult {
            salary: 1_000.0,
            allocations: vec![BucketAllocation {
                bucket_name: "Travel".to_string(),
                percentage: 20.0,
                share: 200.0,
                new_allowance: 200.0,
            }],
            total_allocated: 200.0,
        };

        let summary = format_cycle_summary(&rollover, &distribution, "$").unwrap();
        assert!(summary.starts_with("Salary $1000.00 - 1 bucket(s) funded"));
        assert!(summary.contains("Rolled into funds: $300.00"));
        assert!(summary.contains("Unallocated: $800.00"));
        assert!(summary.contains("Travel - 20.0% | +$200.00 → allowance $200.00"));
    }
}
