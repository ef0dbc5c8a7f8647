//! Income Discord commands - `add_income`, `income_history`, and `delete_income`.
//!
//! Recording a salary runs the full cycle (rollover, then distribution), and the
//! reply shows the cycle summary.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, parse_date},
        core::{
            income::{self, IncomeType},
            monthly, report,
        },
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Months shown in the `/income_history` breakdown.
    const HISTORY_MONTHS: usize = 6;
    /// Individual entries listed under the breakdown.
    const HISTORY_ENTRIES: usize = 10;

    /// Records an income. A salary also rolls over and refills every bucket.
    #[poise::command(slash_command, prefix_command)]
    pub async fn add_income(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Amount received"] amount: f64,
        #[description = "Salary (once per month) or Manual"]
        #[autocomplete = "autocomplete::autocomplete_income_type"]
        income_type: String,
        #[description = "Date received as YYYY-MM-DD (defaults to today)"] date: Option<String>,
    ) -> Result<()> {
        let income_type: IncomeType = income_type.parse()?;
        let date = parse_date(date.as_deref())?;

        ctx.defer().await?;

        let data = ctx.data();
        let currency = data.currency_symbol.as_str();
        let receipt = income::add_income(&data.database, amount, income_type, date).await?;

        let mut response = format!(
            "✅ Recorded {} income #{} of {} on {}.",
            receipt.income.income_type,
            receipt.income.id,
            report::format_amount(currency, receipt.income.amount),
            receipt.income.date
        );

        if let Some(cycle) = &receipt.cycle {
            let summary =
                monthly::format_cycle_summary(&cycle.rollover, &cycle.distribution, currency)?;
            write!(&mut response, "\n\n```\n{summary}\n```")?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Shows income totals per month and the latest income entries.
    #[poise::command(slash_command, prefix_command)]
    pub async fn income_history(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let currency = data.currency_symbol.as_str();
        let incomes = income::get_income_history(&data.database).await?;

        if incomes.is_empty() {
            ctx.say("💵 No income recorded yet. Use `/add_income` to record one.")
                .await?;
            return Ok(());
        }

        let mut response = String::from("💵 **Income by month**\n");
        for month in report::monthly_income_breakdown(&incomes, HISTORY_MONTHS) {
            writeln!(
                &mut response,
                "• {}-{:02}: {} (salary {}, manual {})",
                month.year,
                month.month,
                report::format_amount(currency, month.total()),
                report::format_amount(currency, month.salary),
                report::format_amount(currency, month.manual)
            )?;
        }

        writeln!(&mut response, "\n**Latest entries**")?;
        for inc in incomes.iter().take(HISTORY_ENTRIES) {
            writeln!(
                &mut response,
                "• #{} {} {} {}",
                inc.id,
                inc.date,
                inc.income_type,
                report::format_amount(currency, inc.amount)
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Deletes an income record. Amounts already given to buckets stay there.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete_income(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Income id (see /income_history)"] income_id: i64,
    ) -> Result<()> {
        let data = ctx.data();
        let deleted = income::delete_income(&data.database, income_id).await?;

        ctx.say(format!(
            "🗑️ Deleted {} income #{} of {} from {}.",
            deleted.income_type,
            deleted.id,
            report::format_amount(&data.currency_symbol, deleted.amount),
            deleted.date
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
