//! Process configuration, read once from the environment at startup.

use anyhow::{Context, Result};

/// Runtime configuration for the bot process.
///
/// Everything outside the reminder core lives here: the gateway token, where
/// the database file sits, which channel deliveries go to, and how often the
/// delivery loop wakes up.
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token.
    pub discord_token: String,
    /// Path to the SQLite database file.
    pub database_path: String,
    /// Channel that due reminders are delivered into.
    pub remind_channel_id: u64,
    /// Seconds between delivery-loop wakeups.
    pub poll_interval_secs: u64,
    /// Default log filter when RUST_LOG is unset.
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `DISCORD_TOKEN` and `REMIND_CHANNEL_ID` are required; everything else
    /// has a sensible default.
    pub fn from_env() -> Result<Self> {
        let discord_token =
            std::env::var("DISCORD_TOKEN").context("DISCORD_TOKEN must be set")?;

        let remind_channel_id = std::env::var("REMIND_CHANNEL_ID")
            .context("REMIND_CHANNEL_ID must be set")?;
        let remind_channel_id = remind_channel_id
            .parse::<u64>()
            .with_context(|| format!("REMIND_CHANNEL_ID is not a channel id: {remind_channel_id}"))?;

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "./futurebot.db".to_string());

        let poll_interval_secs = match std::env::var("POLL_INTERVAL_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("POLL_INTERVAL_SECS is not a number: {raw}"))?,
            Err(_) => 60,
        };

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            discord_token,
            database_path,
            remind_channel_id,
            poll_interval_secs,
            log_level,
        })
    }
}
