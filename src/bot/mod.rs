//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for BucketBuddy, including all
//! slash commands, autocomplete handlers, and bot context management.

/// Discord command implementations (buckets, income, expenses, dashboard, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::errors::{Error, Result};
use chrono::{Local, NaiveDate};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument, warn};

/// Shared data available to all bot commands.
/// This structure holds the database connection and the display settings
/// that commands need to access.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Symbol prefixed to every amount shown to users
    pub currency_symbol: String,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection.
    /// This is typically called during bot initialization to set up the
    /// shared context for all commands.
    #[must_use]
    pub const fn new(database: DatabaseConnection, currency_symbol: String) -> Self {
        Self {
            database,
            currency_symbol,
        }
    }
}

/// Parses a `YYYY-MM-DD` date argument, defaulting to today when absent.
///
/// # Errors
/// Returns [`Error::Validation`] if the text is not a valid date.
pub fn parse_date(input: Option<&str>) -> Result<NaiveDate> {
    let Some(text) = input.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(Local::now().date_naive());
    };

    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| Error::Validation {
        message: format!("Invalid date '{text}'. Use the YYYY-MM-DD format."),
    })
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            // Input problems go back to the user verbatim; anything else stays in the logs
            let reply = if error.is_user_error() {
                warn!("Command `{}` rejected: {error}", ctx.command().name);
                format!("❌ {error}")
            } else {
                error!("Error in command `{}`: {error:?}", ctx.command().name);
                "❌ Something went wrong while handling that command.".to_string()
            };
            if let Err(e) = ctx.say(reply).await {
                error!("Failed to send error message: {e}");
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the poise framework around `data` and runs the Discord client until it stops.
///
/// # Errors
/// Returns [`Error::Framework`] if the client cannot be created or the
/// connection to Discord fails.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::dashboard(),
                commands::buckets(),
                commands::bucket_info(),
                commands::create_bucket(),
                commands::update_bucket(),
                commands::delete_bucket(),
                commands::fund_bucket(),
                commands::add_income(),
                commands::income_history(),
                commands::delete_income(),
                commands::spend(),
                commands::expenses(),
                commands::delete_expense(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("!".into()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;

    Ok(())
}

pub use commands::*;
pub use handlers::*;
