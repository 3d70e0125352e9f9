//! Runtime configuration
//!
//! Read once at startup from the environment (and `.env` when present).

use crate::error::KeuanganError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_STORAGE_PATH: &str = "keuanganku-storage.json";
pub const DEFAULT_LOGIN_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub port: u16,
    pub arkham_api_key: Option<String>,
    pub storage_path: PathBuf,
    pub login_delay: Duration,
}

impl AppConfig {
    /// Load configuration, calling `dotenv` first
    pub fn from_env() -> crate::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("GOOGLE_API_KEY"))
            .unwrap_or_default();

        if gemini_api_key.is_empty() {
            warn!("GEMINI_API_KEY not set; AI flows will fail until it is configured");
        }

        let port = match lookup("PORT").or_else(|| lookup("API_PORT")) {
            Some(raw) => raw
                .parse()
                .map_err(|_| KeuanganError::Config(format!("Invalid port: {}", raw)))?,
            None => DEFAULT_PORT,
        };

        let login_delay_ms = match lookup("LOGIN_DELAY_MS") {
            Some(raw) => raw.parse().map_err(|_| {
                KeuanganError::Config(format!("Invalid LOGIN_DELAY_MS: {}", raw))
            })?,
            None => DEFAULT_LOGIN_DELAY_MS,
        };

        Ok(Self {
            gemini_api_key,
            gemini_model: lookup("GEMINI_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            port,
            arkham_api_key: lookup("ARKHAM_API_KEY").filter(|k| !k.is_empty()),
            storage_path: lookup("KEUANGANKU_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH)),
            login_delay: Duration::from_millis(login_delay_ms),
        })
    }
}
