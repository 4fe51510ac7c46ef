//! Environment-driven settings for the service and the pipeline client
//!
//! Values are read after `dotenv::dotenv()` has populated the process
//! environment. Unparseable values fall back to defaults with a warning.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_EXECUTOR_TIMEOUT_SECS: u64 = 30;
const DEFAULT_POOL_SIZE: usize = 2;

const DEFAULT_SERVICE_URL: &str = "http://localhost:3000";
const DEFAULT_POLL_INTERVAL_MS: u64 = 250;
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 60;

/// Agent service settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    /// In-memory storage is used when unset
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// Upper bound on a single forwarded call
    pub executor_timeout: Duration,
    /// Executors pre-built, and the most kept idle, per agent type
    pub executor_pool_size: usize,
}

impl Settings {
    pub fn from_env() -> Self {
        let bind_addr = read_or("BIND_ADDR", DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %bind_addr, "BIND_ADDR is not a socket address, using default");
            SocketAddr::from(([0, 0, 0, 0], 3000))
        });

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());
        if database_url.is_none() {
            tracing::warn!("DATABASE_URL not set, using in-memory storage");
        }

        Self {
            bind_addr,
            database_url,
            database_max_connections: read_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
            executor_timeout: Duration::from_secs(read_or(
                "EXECUTOR_TIMEOUT_SECS",
                DEFAULT_EXECUTOR_TIMEOUT_SECS,
            )),
            executor_pool_size: read_or("EXECUTOR_POOL_SIZE", DEFAULT_POOL_SIZE),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            database_url: None,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            executor_timeout: Duration::from_secs(DEFAULT_EXECUTOR_TIMEOUT_SECS),
            executor_pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

/// Settings for a pipeline client talking to the agent service
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub service_url: String,
    pub poll_interval: Duration,
    /// A node still running after this long counts as failed
    pub poll_timeout: Duration,
}

impl ClientSettings {
    pub fn from_env() -> Self {
        Self {
            service_url: read_or("AGENT_SERVICE_URL", DEFAULT_SERVICE_URL.to_string()),
            poll_interval: Duration::from_millis(read_or(
                "DISPATCH_POLL_INTERVAL_MS",
                DEFAULT_POLL_INTERVAL_MS,
            )),
            poll_timeout: Duration::from_secs(read_or(
                "DISPATCH_POLL_TIMEOUT_SECS",
                DEFAULT_POLL_TIMEOUT_SECS,
            )),
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            poll_timeout: Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS),
        }
    }
}

fn read_or<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => parse_or(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_or<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = raw, fallback = %default, "Invalid setting, using default");
        default
    })
}
