use bucket_buddy::{
    bot::{self, BotData},
    config::{database, settings},
    core::bucket,
    errors::{Error, Result},
};
use dotenvy::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Settings and bucket seeds from config.toml
    let app_config = settings::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {e}"))?;

    // 4. Database connection and schema
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {e}"))?;

    // 5. Seed configured buckets that do not exist yet
    let seeded = bucket::seed_buckets(&db, &app_config.buckets)
        .await
        .inspect_err(|e| error!("Failed to seed buckets: {e}"))?;
    info!("Seeded {seeded} bucket(s) from configuration.");

    // 6. Run the bot; the token is read right before use and never stored
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, BotData::new(db, app_config.currency_symbol)).await
}
