//! Dashboard Discord command - savings figures, buckets, and recent activity in one embed.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::report,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Entries in the recent activity field.
    const ACTIVITY_ENTRIES: usize = 8;

    /// Shows General Savings, net worth, every bucket, and the latest activity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn dashboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let currency = data.currency_symbol.as_str();
        let dashboard = report::generate_dashboard(&data.database, ACTIVITY_ENTRIES).await?;
        let savings = dashboard.savings;

        let mut bucket_lines = String::new();
        for b in &dashboard.buckets {
            let progress = report::calculate_progress(b.monthly_allowance, b.allocation_amount);
            writeln!(
                &mut bucket_lines,
                "**{}** {} | fund {}",
                b.name,
                report::format_progress_bar(progress, 8),
                report::format_amount(currency, b.fund)
            )?;
        }
        if bucket_lines.is_empty() {
            bucket_lines.push_str("No buckets yet.");
        }

        let mut activity_lines = String::new();
        for entry in &dashboard.recent_activity {
            let sign = if entry.amount < 0.0 { "🔻" } else { "🔺" };
            writeln!(
                &mut activity_lines,
                "{sign} {} {} {}",
                entry.date,
                report::format_amount(currency, entry.amount),
                entry.label
            )?;
        }
        if activity_lines.is_empty() {
            activity_lines.push_str("No activity yet.");
        }

        let embed = serenity::CreateEmbed::default()
            .title("📊 Dashboard")
            .color(0x0034_98DB)
            .field(
                "General Savings",
                report::format_amount(currency, savings.general_savings),
                true,
            )
            .field(
                "Net Worth",
                report::format_amount(currency, savings.net_worth),
                true,
            )
            .field(
                "Locked in Buckets",
                report::format_amount(currency, savings.locked_funds),
                true,
            )
            .field("Buckets", bucket_lines, false)
            .field("Recent Activity", activity_lines, false);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
