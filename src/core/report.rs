//! Report generation business logic.
//!
//! Progress figures, income breakdowns and the dashboard snapshot. All
//! functions return structured data; the bot layer decides how to show it.

use crate::{
    core::{
        bucket::get_all_buckets,
        expense::get_all_expenses,
        income::{IncomeType, get_income_history},
        savings::{SavingsSummary, calculate_savings},
    },
    entities::{bucket, income},
    errors::Result,
};
use chrono::{Datelike, NaiveDate};
use sea_orm::ConnectionTrait;
use std::collections::{BTreeMap, HashMap};

/// Income totals for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyIncome {
    /// Calendar year
    pub year: i32,
    /// Calendar month, 1 to 12
    pub month: u32,
    /// Salary received in the month
    pub salary: f64,
    /// Manual income received in the month
    pub manual: f64,
}

impl MonthlyIncome {
    /// Salary plus manual income.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.salary + self.manual
    }
}

/// One line of the recent activity feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    /// Id of the underlying income or expense
    pub id: i64,
    /// Date of the event
    pub date: NaiveDate,
    /// Positive for income, negative for expenses
    pub amount: f64,
    /// Short description, e.g. "Salary" or "Travel: flights"
    pub label: String,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone)]
pub struct DashboardReport {
    /// Derived savings figures
    pub savings: SavingsSummary,
    /// All buckets, by name
    pub buckets: Vec<bucket::Model>,
    /// Newest incomes and expenses
    pub recent_activity: Vec<ActivityEntry>,
}

/// How much of the latest allocation is still unspent, as a percentage.
///
/// Returns 0 when the allowance is empty and never more than 100. A bucket that
/// has never been allocated anything is measured against 1.
#[must_use]
pub fn calculate_progress(monthly_allowance: f64, allocation_amount: f64) -> f64 {
    if monthly_allowance <= 0.0 {
        return 0.0;
    }

    let base = if allocation_amount > 0.0 {
        allocation_amount
    } else {
        1.0
    };
    (monthly_allowance / base * 100.0).min(100.0)
}

/// Renders a text progress bar such as `[██████░░░░] 60%`.
#[must_use]
pub fn format_progress_bar(progress_percent: f64, width: usize) -> String {
    let clamped = progress_percent.clamp(0.0, 100.0);

    // clamped is within 0..=100 and width is small, so the cast cannot overflow
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = ((clamped / 100.0) * width as f64).round() as usize;

    format!(
        "[{}{}] {progress_percent:.0}%",
        "█".repeat(filled),
        "░".repeat(width.saturating_sub(filled))
    )
}

/// Formats an amount with the currency symbol, e.g. `₹1250.50` or `-₹40.00`.
#[must_use]
pub fn format_amount(currency: &str, amount: f64) -> String {
    if amount < 0.0 {
        format!("-{currency}{:.2}", amount.abs())
    } else {
        format!("{currency}{amount:.2}")
    }
}

/// Groups incomes by calendar month, oldest first, keeping the last `months` months.
#[must_use]
pub fn monthly_income_breakdown(incomes: &[income::Model], months: usize) -> Vec<MonthlyIncome> {
    let mut by_month: BTreeMap<(i32, u32), MonthlyIncome> = BTreeMap::new();

    for inc in incomes {
        let key = (inc.date.year(), inc.date.month());
        let entry = by_month.entry(key).or_insert_with(|| MonthlyIncome {
            year: key.0,
            month: key.1,
            salary: 0.0,
            manual: 0.0,
        });

        if inc.income_type == IncomeType::Salary.as_str() {
            entry.salary += inc.amount;
        } else {
            entry.manual += inc.amount;
        }
    }

    let skip = by_month.len().saturating_sub(months);
    by_month.into_values().skip(skip).collect()
}

/// Merges incomes and expenses into one feed, newest first, at most `limit` entries.
pub async fn recent_activity<C>(db: &C, limit: usize) -> Result<Vec<ActivityEntry>>
where
    C: ConnectionTrait,
{
    let bucket_names: HashMap<i64, String> = get_all_buckets(db)
        .await?
        .into_iter()
        .map(|b| (b.id, b.name))
        .collect();

    let incomes = get_income_history(db).await?.into_iter().map(|i| ActivityEntry {
        id: i.id,
        date: i.date,
        amount: i.amount,
        label: i.income_type,
    });

    let expenses = get_all_expenses(db).await?.into_iter().map(|e| {
        let source = e
            .bucket_id
            .and_then(|id| bucket_names.get(&id).cloned())
            .unwrap_or(e.expense_type);
        let label = match e.note {
            Some(note) => format!("{source}: {note}"),
            None => source,
        };
        ActivityEntry {
            id: e.id,
            date: e.date,
            amount: -e.amount,
            label,
        }
    });

    let mut entries: Vec<ActivityEntry> = incomes.chain(expenses).collect();
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries.truncate(limit);
    Ok(entries)
}

/// Builds the dashboard snapshot.
pub async fn generate_dashboard<C>(db: &C, activity_limit: usize) -> Result<DashboardReport>
where
    C: ConnectionTrait,
{
    Ok(DashboardReport {
        savings: calculate_savings(db).await?,
        buckets: get_all_buckets(db).await?,
        recent_activity: recent_activity(db, activity_limit).await?,
    })
}
