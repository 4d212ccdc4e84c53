//! Anonymous Team Voting Backend Core
//!
//! A fixed roster of teams that participants vote for exactly once, identified
//! by a one-way fingerprint of their submitted identity pair rather than an
//! account login.

pub mod config;
pub mod errors;
pub mod identity;
pub mod ledger;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use errors::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the voting backend with proper logging
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teamvote=info".into()),
        )
        .init();

    tracing::info!("🗳️  Voting backend v{} initialized", VERSION);
    Ok(())
}
