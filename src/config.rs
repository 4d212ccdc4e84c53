//! Configuration management for the voting backend
//!
//! Loads configuration from environment variables with validation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Roster configuration: the canonical team set recreated on seed/reset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Number of teams to seed (1..=1000)
    pub team_count: u32,

    /// Team name prefix; seeded teams are named "{prefix} {n}"
    pub name_prefix: String,
}

impl RosterConfig {
    /// Load roster configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let team_count = std::env::var("VOTE_TEAM_COUNT")
            .unwrap_or_else(|_| "11".to_string())
            .parse()
            .map_err(|_| Error::validation("VOTE_TEAM_COUNT"))?;

        let name_prefix =
            std::env::var("VOTE_TEAM_PREFIX").unwrap_or_else(|_| "Team".to_string());

        let config = Self {
            team_count,
            name_prefix,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create configuration for testing
    pub fn for_testing() -> Self {
        Self {
            team_count: 11,
            name_prefix: "Team".to_string(),
        }
    }

    /// Validate roster parameters
    pub fn validate(&self) -> Result<()> {
        if self.team_count == 0 {
            return Err(Error::validation("VOTE_TEAM_COUNT must be at least 1"));
        }

        if self.team_count > 1000 {
            return Err(Error::validation("VOTE_TEAM_COUNT must be at most 1000"));
        }

        if self.name_prefix.trim().is_empty() {
            return Err(Error::validation("VOTE_TEAM_PREFIX must not be empty"));
        }

        Ok(())
    }
}

/// Snapshot storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON snapshot file
    pub snapshot_path: String,

    /// Autosave interval in seconds
    pub autosave_interval_seconds: u64,
}

impl StorageConfig {
    /// Load storage configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let snapshot_path =
            std::env::var("VOTE_SNAPSHOT_PATH").unwrap_or_else(|_| "ledger.json".to_string());

        let autosave_interval_seconds = std::env::var("VOTE_AUTOSAVE_INTERVAL_SECONDS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .map_err(|_| Error::validation("VOTE_AUTOSAVE_INTERVAL_SECONDS"))?;

        if autosave_interval_seconds == 0 {
            return Err(Error::validation(
                "VOTE_AUTOSAVE_INTERVAL_SECONDS must be at least 1",
            ));
        }

        Ok(Self {
            snapshot_path,
            autosave_interval_seconds,
        })
    }

    /// Create configuration for testing
    pub fn for_testing() -> Self {
        Self {
            snapshot_path: std::env::temp_dir()
                .join(format!("teamvote-{}.json", uuid::Uuid::new_v4()))
                .to_string_lossy()
                .into_owned(),
            autosave_interval_seconds: 1,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub roster: RosterConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let roster = RosterConfig::from_env()?;
        let storage = StorageConfig::from_env()?;

        let logging = LoggingConfig {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
        };

        Ok(Self {
            roster,
            storage,
            logging,
        })
    }

    /// Create configuration for testing
    pub fn for_testing() -> Self {
        Self {
            roster: RosterConfig::for_testing(),
            storage: StorageConfig::for_testing(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
