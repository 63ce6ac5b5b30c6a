// src/config.rs
use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 10;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STATIC_DIR: &str = "./static";

/// Process configuration, read once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenRouter credential. `None` when unset or blank; requests then fail
    /// with a configuration error instead of reaching the network.
    pub api_key: Option<String>,
    pub api_url: String,
    pub max_file_size_mb: u64,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_key = lookup("OPENROUTER_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let max_file_size_mb = match lookup("MAX_FILE_SIZE_MB") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("MAX_FILE_SIZE_MB is not a valid integer: {raw:?}"))?,
            None => defaults.max_file_size_mb,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {raw:?}"))?,
            None => defaults.port,
        };

        Ok(Self {
            api_key,
            api_url: lookup("OPENROUTER_API_URL").unwrap_or(defaults.api_url),
            max_file_size_mb,
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        })
    }

    pub fn max_file_size_bytes(&self) -> usize {
        (self.max_file_size_mb as usize).saturating_mul(1024 * 1024)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
