//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `PACE_NOTE_STORAGE_DIR` - Directory holding the storage file (default: `.pace-note`)
//! - `PACE_NOTE_CART_KEY` - Storage key the cart snapshot lives under (default: `cart`)
//! - `PACE_NOTE_STORAGE_QUOTA` - Storage size limit in bytes (default: 5 MiB)
//! - `PACE_NOTE_CURRENCY` - Display currency code (default: `RON`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use pace_note_core::CurrencyCode;
use thiserror::Error;

use crate::storage::{DEFAULT_QUOTA_BYTES, FileStore};

/// Storage key used by the storefront since its first release.
pub const DEFAULT_CART_KEY: &str = "cart";

const DEFAULT_STORAGE_DIR: &str = ".pace-note";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart store configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Directory for the file-backed store
    pub storage_dir: PathBuf,
    /// Key the cart snapshot is stored under
    pub cart_key: String,
    /// Maximum size of the storage file in bytes
    pub storage_quota: usize,
    /// Currency used when rendering prices
    pub currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            cart_key: DEFAULT_CART_KEY.to_string(),
            storage_quota: DEFAULT_QUOTA_BYTES,
            currency: CurrencyCode::default(),
            sentry_dsn: None,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let storage_dir = lookup("PACE_NOTE_STORAGE_DIR")
            .map_or(defaults.storage_dir, PathBuf::from);

        let cart_key = lookup("PACE_NOTE_CART_KEY").unwrap_or(defaults.cart_key);
        if cart_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "PACE_NOTE_CART_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let storage_quota = match lookup("PACE_NOTE_STORAGE_QUOTA") {
            Some(raw) => parse_quota(&raw)?,
            None => defaults.storage_quota,
        };

        let currency = match lookup("PACE_NOTE_CURRENCY") {
            Some(raw) => raw.parse::<CurrencyCode>().map_err(|e| {
                ConfigError::InvalidEnvVar("PACE_NOTE_CURRENCY".to_string(), e.to_string())
            })?,
            None => defaults.currency,
        };

        let sentry_dsn = lookup("SENTRY_DSN")
            .filter(|dsn| !dsn.is_empty())
            .or(defaults.sentry_dsn);

        Ok(Self {
            storage_dir,
            cart_key,
            storage_quota,
            currency,
            sentry_dsn,
        })
    }

    /// Build the file-backed store this configuration describes.
    #[must_use]
    pub fn file_store(&self) -> FileStore {
        FileStore::with_quota(&self.storage_dir, self.storage_quota)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_quota(raw: &str) -> Result<usize, ConfigError> {
    let quota = raw.trim().parse::<usize>().map_err(|e| {
        ConfigError::InvalidEnvVar("PACE_NOTE_STORAGE_QUOTA".to_string(), e.to_string())
    })?;
    if quota == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "PACE_NOTE_STORAGE_QUOTA".to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(quota)
}
