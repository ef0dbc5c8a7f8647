//! Bucket Discord commands - listing, details, and bucket management.
//!
//! Listing and detail commands read through the core modules; the management
//! commands go through the percentage guard and the bucket mutations.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            bucket::{self, UpdateBucketArgs},
            expense, report,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// How many of a bucket's expenses `/bucket_info` shows.
    const RECENT_EXPENSES: usize = 5;

    /// Lists every bucket with its share, allowance, fund, and progress.
    #[poise::command(slash_command, prefix_command)]
    pub async fn buckets(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let currency = data.currency_symbol.as_str();
        let buckets = bucket::get_all_buckets(&data.database).await?;

        if buckets.is_empty() {
            ctx.say("🪣 No buckets found. Create one with `/create_bucket` to get started!")
                .await?;
            return Ok(());
        }

        let mut embed_fields = Vec::with_capacity(buckets.len());
        for b in &buckets {
            let progress = report::calculate_progress(b.monthly_allowance, b.allocation_amount);

            let mut field_value = String::new();
            writeln!(&mut field_value, "**Share:** {:.1}% | {}", b.percentage, b.purpose)?;
            writeln!(
                &mut field_value,
                "**Allowance:** {} / {}",
                report::format_amount(currency, b.monthly_allowance),
                report::format_amount(currency, b.allocation_amount)
            )?;
            writeln!(
                &mut field_value,
                "**Fund:** {}",
                report::format_amount(currency, b.fund)
            )?;
            write!(
                &mut field_value,
                "**Progress:** {}",
                report::format_progress_bar(progress, 10)
            )?;

            embed_fields.push((b.name.clone(), field_value, false));
        }

        let total_percentage: f64 = buckets.iter().map(|b| b.percentage).sum();
        let embed = serenity::CreateEmbed::default()
            .title("🪣 Buckets")
            .description(format!(
                "{total_percentage:.1}% of each salary is assigned to buckets"
            ))
            .color(0x0034_98DB)
            .fields(embed_fields)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} bucket{}",
                buckets.len(),
                if buckets.len() == 1 { "" } else { "s" }
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows one bucket's balances and its most recent expenses.
    #[poise::command(slash_command, prefix_command)]
    pub async fn bucket_info(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name of the bucket"]
        #[autocomplete = "autocomplete::autocomplete_bucket_name"]
        bucket_name: String,
    ) -> Result<()> {
        let data = ctx.data();
        let currency = data.currency_symbol.as_str();
        let b = bucket::require_bucket_by_name(&data.database, &bucket_name).await?;
        let expenses = expense::get_expenses_for_bucket(&data.database, b.id).await?;

        let mut response = format!("📋 **Bucket: {}**\n", b.name);
        writeln!(&mut response, "🎯 Purpose: {}", b.purpose)?;
        writeln!(&mut response, "📊 Share of salary: {:.1}%\n", b.percentage)?;
        writeln!(
            &mut response,
            "💵 Allowance: {} of {} allocated",
            report::format_amount(currency, b.monthly_allowance),
            report::format_amount(currency, b.allocation_amount)
        )?;
        writeln!(
            &mut response,
            "🏦 Fund: {}",
            report::format_amount(currency, b.fund)
        )?;
        writeln!(
            &mut response,
            "💰 Total: {}",
            report::format_amount(currency, b.total_balance())
        )?;

        if expenses.is_empty() {
            response.push_str("\nNo expenses recorded for this bucket yet.");
        } else {
            writeln!(&mut response, "\n**Recent expenses:**")?;
            for e in expenses.iter().take(RECENT_EXPENSES) {
                write!(
                    &mut response,
                    "• #{} {} {}",
                    e.id,
                    e.date,
                    report::format_amount(currency, e.amount)
                )?;
                if let Some(note) = &e.note {
                    write!(&mut response, " - {note}")?;
                }
                response.push('\n');
            }
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Creates a bucket that receives a percentage of every salary.
    #[poise::command(slash_command, prefix_command)]
    pub async fn create_bucket(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Unique name for the bucket (e.g., 'Travel')"] name: String,
        #[description = "Share of each salary, 0-100"] percentage: f64,
        #[description = "What the bucket is for"] purpose: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let created = bucket::create_bucket(db, &name, percentage, &purpose).await?;

        let assigned: f64 = bucket::get_all_buckets(db)
            .await?
            .iter()
            .map(|b| b.percentage)
            .sum();

        ctx.say(format!(
            "✅ Created bucket **{}** with {:.1}% of each salary.\n\
            {:.1}% of salary is still unassigned.",
            created.name,
            created.percentage,
            (100.0 - assigned).max(0.0)
        ))
        .await?;
        Ok(())
    }

    /// Changes a bucket's name, percentage, or purpose.
    #[poise::command(slash_command, prefix_command)]
    pub async fn update_bucket(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Bucket to update"]
        #[autocomplete = "autocomplete::autocomplete_bucket_name"]
        bucket_name: String,
        #[description = "New name"] name: Option<String>,
        #[description = "New share of each salary, 0-100"] percentage: Option<f64>,
        #[description = "New purpose"] purpose: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let existing = bucket::require_bucket_by_name(db, &bucket_name).await?;

        let updated = bucket::update_bucket(
            db,
            existing.id,
            UpdateBucketArgs {
                name,
                percentage,
                purpose,
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Updated bucket **{}**: {:.1}% | {}",
            updated.name, updated.percentage, updated.purpose
        ))
        .await?;
        Ok(())
    }

    /// Deletes a bucket. Its allowance and fund return to General Savings.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete_bucket(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Bucket to delete"]
        #[autocomplete = "autocomplete::autocomplete_bucket_name"]
        bucket_name: String,
    ) -> Result<()> {
        let data = ctx.data();
        let existing = bucket::require_bucket_by_name(&data.database, &bucket_name).await?;
        let release = bucket::delete_bucket(&data.database, existing.id).await?;

        ctx.say(format!(
            "🗑️ Deleted bucket **{}**. {} has been moved to General Savings.",
            release.bucket.name,
            report::format_amount(&data.currency_symbol, release.released_amount)
        ))
        .await?;
        Ok(())
    }

    /// Moves money from General Savings into a bucket's fund.
    #[poise::command(slash_command, prefix_command)]
    pub async fn fund_bucket(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Bucket to fund"]
        #[autocomplete = "autocomplete::autocomplete_bucket_name"]
        bucket_name: String,
        #[description = "Amount to move from General Savings"] amount: f64,
    ) -> Result<()> {
        let data = ctx.data();
        let currency = data.currency_symbol.as_str();
        let existing = bucket::require_bucket_by_name(&data.database, &bucket_name).await?;
        let updated =
            bucket::add_from_general_savings(&data.database, existing.id, amount).await?;

        ctx.say(format!(
            "✅ Moved {} into **{}**. Fund is now {}.",
            report::format_amount(currency, amount),
            updated.name,
            report::format_amount(currency, updated.fund)
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
