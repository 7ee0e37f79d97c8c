use std::time::Duration;

use crate::errors::AppError;

/// Process-level configuration, read from the environment exactly once in
/// `main` and handed to constructors. Core logic never touches env vars.
#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: String,
    pub database_url: String,
    pub youtube_api_key: String,
    pub ingest: IngestConfig,
}

/// Tunables for the enumeration/sync pipeline.
#[derive(Clone, Debug)]
pub struct IngestConfig {
    /// Playlist page size; 50 is the YouTube Data API maximum.
    pub page_size: u32,
    /// Pause between playlist pages, skipped after the last one.
    pub page_delay: Duration,
    /// Pause between creators during an incremental sync run.
    pub creator_delay: Duration,
    /// Runaway-loop bound on a full enumeration, not a product limit.
    pub enumeration_ceiling: usize,
    /// How many of a channel's newest uploads an incremental sync inspects.
    pub sync_recent_count: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            page_delay: Duration::from_millis(200),
            creator_delay: Duration::from_millis(1000),
            enumeration_ceiling: 10_000,
            sync_recent_count: 5,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config, AppError> {
        let youtube_api_key = std::env::var("YOUTUBE_API_KEY")
            .map_err(|_| AppError::Configuration("YOUTUBE_API_KEY is not set".to_string()))?;
        if youtube_api_key.trim().is_empty() {
            return Err(AppError::Configuration("YOUTUBE_API_KEY is empty".to_string()));
        }

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| AppError::Configuration("DATABASE_URL is not set".to_string()))?;

        let listen_addr =
            std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());

        Ok(Config {
            listen_addr,
            database_url,
            youtube_api_key,
            ingest: IngestConfig::default(),
        })
    }
}
