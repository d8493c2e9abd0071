use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_AVATAR_DIR: &str = "avatars";
/// Matches the 1.5 s processing delay of the original payment form.
const DEFAULT_PAYMENT_DELAY_MS: u64 = 1500;
const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;

pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Directory avatars are written to and served from under `/avatars/`.
    pub avatar_dir: PathBuf,
    pub payment_delay_ms: u64,
    pub session_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/quicktix".to_string()),
            port: env_or("PORT", DEFAULT_PORT),
            avatar_dir: PathBuf::from(
                env::var("AVATAR_DIR").unwrap_or_else(|_| DEFAULT_AVATAR_DIR.to_string()),
            ),
            payment_delay_ms: env_or("PAYMENT_DELAY_MS", DEFAULT_PAYMENT_DELAY_MS),
            session_ttl_hours: env_or("SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS),
        }
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
    T::Err: Display,
{
    match env::var(key) {
        Ok(value) => parse_or(key, &value, default),
        Err(_) => default,
    }
}

fn parse_or<T>(key: &str, value: &str, default: T) -> T
where
    T: FromStr + Copy,
    T::Err: Display,
{
    value.parse().unwrap_or_else(|e| {
        warn!("Invalid {} value '{}': {}, using default", key, value, e);
        default
    })
}
