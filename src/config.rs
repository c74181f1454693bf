use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::Level;

use crate::api::client::DEFAULT_BASE_URL;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Process settings read once at startup from the environment / `.env`.
pub struct Settings {
    pub discord_token: String,
    pub guild_id: Option<u64>,
    pub admin_ids: HashSet<u64>,
    pub api_base_url: String,
    pub api_timeout: Duration,
    pub log_level: Level,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let discord_token = dotenv::var("DISCORD_TOKEN").context("DISCORD_TOKEN required")?;
        let guild_id = dotenv::var("DISCORD_GUILD_ID")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok());
        let admin_ids = parse_admin_ids(&dotenv::var("ADMIN_USER_IDS").unwrap_or_default());
        let api_base_url =
            dotenv::var("KB_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api_timeout = Duration::from_secs(
            dotenv::var("KB_API_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        );
        let log_level = parse_log_level(dotenv::var("KB_LOG_LEVEL").ok().as_deref());

        Ok(Self {
            discord_token,
            guild_id,
            admin_ids,
            api_base_url,
            api_timeout,
            log_level,
        })
    }
}

/// Comma-separated Discord user ids; junk entries are skipped.
pub fn parse_admin_ids(raw: &str) -> HashSet<u64> {
    raw.split(',')
        .filter_map(|s| s.trim().parse::<u64>().ok())
        .collect()
}

pub fn parse_log_level(raw: Option<&str>) -> Level {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(Level::INFO)
}
