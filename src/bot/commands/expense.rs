//! Expense Discord commands - `spend`, `expenses`, and `delete_expense`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, parse_date},
        core::{
            bucket,
            expense::{self, ExpenseRefund, ExpenseType, NewExpense},
            report,
        },
        errors::{Error, Result},
    };
    use std::{collections::HashMap, fmt::Write};

    /// Expenses listed by `/expenses`.
    const LISTED_EXPENSES: usize = 15;

    /// Records an expense against General Savings (Manual) or a bucket (Bucket).
    ///
    /// Bucket expenses draw from the monthly allowance first and the fund second.
    #[poise::command(slash_command, prefix_command)]
    pub async fn spend(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Amount spent"] amount: f64,
        #[description = "Manual (from General Savings) or Bucket"]
        #[autocomplete = "autocomplete::autocomplete_expense_type"]
        expense_type: String,
        #[description = "Bucket to draw from (Bucket expenses only)"]
        #[autocomplete = "autocomplete::autocomplete_bucket_name"]
        bucket_name: Option<String>,
        #[description = "Date spent as YYYY-MM-DD (defaults to today)"] date: Option<String>,
        #[description = "What the money was for"] note: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let currency = data.currency_symbol.as_str();
        let expense_type: ExpenseType = expense_type.parse()?;
        let date = parse_date(date.as_deref())?;

        let bucket = match bucket_name {
            Some(name) => Some(bucket::require_bucket_by_name(&data.database, &name).await?),
            None => None,
        };

        let receipt = expense::create_expense(
            &data.database,
            NewExpense {
                amount,
                expense_type,
                bucket_id: bucket.as_ref().map(|b| b.id),
                date,
                note,
            },
        )
        .await?;

        let mut response = format!(
            "💸 Recorded expense #{} of {} on {}.",
            receipt.expense.id,
            report::format_amount(currency, receipt.expense.amount),
            receipt.expense.date
        );

        if let (Some(b), Some(draw), Some(balance)) =
            (&bucket, receipt.draw, receipt.bucket_balance)
        {
            write!(
                &mut response,
                "\nFrom **{}**: {} from allowance, {} from fund.\n\
                Allowance left {} | Fund left {}",
                b.name,
                report::format_amount(currency, draw.from_allowance),
                report::format_amount(currency, draw.from_fund),
                report::format_amount(currency, balance.monthly_allowance),
                report::format_amount(currency, balance.fund)
            )?;
        } else {
            response.push_str("\nPaid from General Savings.");
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Lists the most recent expenses.
    #[poise::command(slash_command, prefix_command)]
    pub async fn expenses(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let currency = data.currency_symbol.as_str();
        let expenses = expense::get_all_expenses(&data.database).await?;

        if expenses.is_empty() {
            ctx.say("💸 No expenses recorded yet.").await?;
            return Ok(());
        }

        let bucket_names: HashMap<i64, String> = bucket::get_all_buckets(&data.database)
            .await?
            .into_iter()
            .map(|b| (b.id, b.name))
            .collect();

        let mut response = String::from("💸 **Recent expenses**\n");
        for e in expenses.iter().take(LISTED_EXPENSES) {
            let source = match e.bucket_id {
                Some(id) => bucket_names
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| format!("deleted bucket {id}")),
                None => "General Savings".to_string(),
            };
            write!(
                &mut response,
                "• #{} {} {} ({source})",
                e.id,
                e.date,
                report::format_amount(currency, e.amount)
            )?;
            if let Some(note) = &e.note {
                write!(&mut response, " - {note}")?;
            }
            response.push('\n');
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Deletes an expense and returns its amount.
    ///
    /// Manual expenses go back to General Savings, bucket expenses to the bucket's fund.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete_expense(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Expense id (see /expenses)"] expense_id: i64,
    ) -> Result<()> {
        let data = ctx.data();
        let currency = data.currency_symbol.as_str();
        let refund = expense::delete_expense(&data.database, expense_id).await?;

        let message = match refund {
            ExpenseRefund::GeneralSavings { amount } => format!(
                "🗑️ Deleted expense #{expense_id}. {} returned to General Savings.",
                report::format_amount(currency, amount)
            ),
            ExpenseRefund::BucketFund {
                bucket_id,
                amount,
                new_fund,
            } => {
                let name = bucket::get_bucket_by_id(&data.database, bucket_id)
                    .await?
                    .map_or_else(|| format!("bucket {bucket_id}"), |b| b.name);
                format!(
                    "🗑️ Deleted expense #{expense_id}. {} refunded to **{name}**; fund is now {}.",
                    report::format_amount(currency, amount),
                    report::format_amount(currency, new_fund)
                )
            }
            ExpenseRefund::BucketMissing { bucket_id, amount } => format!(
                "🗑️ Deleted expense #{expense_id}. Bucket {bucket_id} no longer exists, \
                so {} returned to General Savings.",
                report::format_amount(currency, amount)
            ),
        };

        ctx.say(message).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
