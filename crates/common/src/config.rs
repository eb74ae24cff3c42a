//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Default HTTP port
const DEFAULT_PORT: u16 = 3000;

/// Default size of the database connection pool
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Log output format for the server binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Twilio credentials used by the inbound webhook
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwilioConfig {
    pub account_sid: Option<String>,
    /// When set, inbound webhooks must carry a valid `X-Twilio-Signature`
    pub auth_token: Option<String>,
    /// Externally visible webhook URL used when computing signatures
    pub public_webhook_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (PostgreSQL)
    pub database_url: String,
    pub database_max_connections: u32,

    /// Messaging provider
    pub twilio: TwilioConfig,

    /// Runtime configuration
    pub rust_log: String,
    pub log_format: LogFormat,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            twilio: TwilioConfig {
                account_sid: non_empty_var("TWILIO_ACCOUNT_SID"),
                auth_token: non_empty_var("TWILIO_AUTH_TOKEN"),
                public_webhook_url: non_empty_var("PUBLIC_WEBHOOK_URL"),
            },
            rust_log: env::var("RUST_LOG")
                .unwrap_or_else(|_| "reviewline=debug,tower_http=info".to_string()),
            log_format: env::var("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        };

        Ok(config)
    }
}

/// Read an optional variable, treating an empty value as unset
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
