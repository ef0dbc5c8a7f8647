//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggests bucket names and the fixed income and expense types as the user types.

use crate::{
    bot::BotData,
    core::{bucket, expense::ExpenseType, income::IncomeType},
    errors::Error,
};

/// Discord shows at most 25 suggestions.
const MAX_SUGGESTIONS: usize = 25;

fn matching<'a>(options: impl IntoIterator<Item = &'a str>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    options
        .into_iter()
        .filter(|option| option.to_lowercase().contains(&partial_lower))
        .map(str::to_string)
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Provides autocomplete suggestions for bucket names.
///
/// Buckets come back sorted by name, so the suggestions are too.
pub async fn autocomplete_bucket_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(buckets) = bucket::get_all_buckets(&ctx.data().database).await else {
        return Vec::new();
    };

    matching(buckets.iter().map(|b| b.name.as_str()), partial)
}

/// Provides autocomplete suggestions for income types.
pub async fn autocomplete_income_type(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching(
        [IncomeType::Salary, IncomeType::Manual].map(IncomeType::as_str),
        partial,
    )
}

/// Provides autocomplete suggestions for expense types.
pub async fn autocomplete_expense_type(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching(
        [ExpenseType::Bucket, ExpenseType::Manual].map(ExpenseType::as_str),
        partial,
    )
}
