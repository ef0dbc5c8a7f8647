//! General Discord commands - ping and help.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**BucketBuddy Help**\n\
        Every salary first rolls unspent allowances into bucket funds, then each \
        bucket receives its percentage of the salary. Whatever is not locked in a \
        bucket is General Savings.\n\n\
        **Money In**\n\
        • `/add_income <amount> <type> [date]` - Records Salary (once per month) or Manual income.\n\
        • `/income_history` - Monthly income totals and recent entries.\n\
        • `/delete_income <id>` - Removes an income record.\n\n\
        **Money Out**\n\
        • `/spend <amount> <type> [bucket] [date] [note]` - Records a Manual or Bucket expense.\n\
        • `/expenses` - Lists recent expenses.\n\
        • `/delete_expense <id>` - Removes an expense and refunds it.\n\n\
        **Buckets**\n\
        • `/buckets` - Lists all buckets with their balances.\n\
        • `/bucket_info <bucket>` - Shows one bucket and its recent expenses.\n\
        • `/create_bucket <name> <percentage> <purpose>` - Creates a bucket.\n\
        • `/update_bucket <bucket> [name] [percentage] [purpose]` - Edits a bucket.\n\
        • `/delete_bucket <bucket>` - Deletes a bucket; its money returns to General Savings.\n\
        • `/fund_bucket <bucket> <amount>` - Moves General Savings into a bucket's fund.\n\n\
        **Overview**\n\
        • `/dashboard` - Savings, buckets and recent activity.\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
