//! Environment-based configuration.
//!
//! | Variable            | Default                 |
//! |---------------------|-------------------------|
//! | `USER_API_BASE_URL` | `http://localhost:3001` |
//! | `USER_ID`           | `1`                     |
//! | `SHUTDOWN_TIMEOUT`  | `5` (seconds)           |
//!
//! The log filter is read separately from `RUST_LOG`.

use std::time::Duration;
use thiserror::Error;

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but does not parse
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
    },

    /// The base URL is empty
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the user service
    pub user_api_base_url: String,
    /// Which user's name to display
    pub user_id: u64,
    /// How long to wait for in-flight effects on exit
    pub shutdown_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_api_base_url: "http://localhost:3001".to_string(),
            user_id: 1,
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let user_api_base_url = match lookup("USER_API_BASE_URL") {
            Some(url) if url.trim().is_empty() => return Err(ConfigError::Empty("USER_API_BASE_URL")),
            Some(url) => url.trim().to_string(),
            None => defaults.user_api_base_url,
        };

        let user_id = parse_or("USER_ID", &lookup, defaults.user_id)?;

        let shutdown_timeout = parse_or("SHUTDOWN_TIMEOUT", &lookup, defaults.shutdown_timeout.as_secs())
            .map(Duration::from_secs)?;

        Ok(Self {
            user_api_base_url,
            user_id,
            shutdown_timeout,
        })
    }
}

fn parse_or<F>(name: &'static str, lookup: &F, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value })
    })
}
