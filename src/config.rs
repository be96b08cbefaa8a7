use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub data_csv: String,
    pub users_xml: String,
    /// Seconds a loaded attendance snapshot or users directory stays valid
    pub cache_ttl: u64,

    // Rate limiting
    pub rate_api_per_min: u32,

    pub api_prefix: String,
    pub log_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:5000".to_string(),
            data_csv: "runtime/data/presence.csv".to_string(),
            users_xml: "runtime/data/users.xml".to_string(),
            cache_ttl: 600, // 10 min
            rate_api_per_min: 1000,
            api_prefix: "/api/v1".to_string(),
            log_dir: "logs".to_string(),
        }
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {value:?}")),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or(defaults.server_addr),
            data_csv: env::var("DATA_CSV").unwrap_or(defaults.data_csv),
            users_xml: env::var("USERS_XML").unwrap_or(defaults.users_xml),
            cache_ttl: parse_or("CACHE_TTL", env::var("CACHE_TTL").ok(), defaults.cache_ttl)?,
            rate_api_per_min: parse_or(
                "RATE_API_PER_MIN",
                env::var("RATE_API_PER_MIN").ok(),
                defaults.rate_api_per_min,
            )?,
            api_prefix: env::var("API_PREFIX").unwrap_or(defaults.api_prefix),
            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),
        })
    }
}
