//! Environment-driven service configuration.
//!
//! Values come from the process environment, after `dotenv` has loaded any
//! `.env` file.

use axum::http::HeaderValue;
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

use crate::error::{Error, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://feedback.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Origins allowed to call the API cross-site
#[derive(Debug, Clone, PartialEq)]
pub enum CorsPolicy {
    /// Any origin, method and header
    Permissive,
    /// Only the listed origins; methods and headers stay open
    Origins(Vec<HeaderValue>),
}

impl CorsPolicy {
    /// Parses `*` or a comma-separated origin list.
    pub fn parse(s: &str) -> Result<Self> {
        let origins: Vec<&str> = s
            .split(',')
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .collect();

        if origins.is_empty() || origins.contains(&"*") {
            return Ok(CorsPolicy::Permissive);
        }

        let origins = origins
            .into_iter()
            .map(|o| {
                HeaderValue::from_str(o)
                    .map_err(|e| Error::Config(format!("invalid CORS origin '{}': {}", o, e)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(CorsPolicy::Origins(origins))
    }

    pub fn layer(&self) -> CorsLayer {
        match self {
            CorsPolicy::Permissive => CorsLayer::permissive(),
            CorsPolicy::Origins(origins) => CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins.clone()))
                .allow_methods(Any)
                .allow_headers(Any),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite location, e.g. `sqlite://feedback.db`
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub cors: CorsPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_str = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_str
            .parse()
            .map_err(|e| Error::Config(format!("invalid BIND_ADDR '{}': {}", bind_str, e)))?;

        let max_connections: u32 = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(s) => s.parse().map_err(|e| {
                Error::Config(format!("invalid DATABASE_MAX_CONNECTIONS '{}': {}", s, e))
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let cors = CorsPolicy::parse(&lookup("CORS_ALLOW_ORIGINS").unwrap_or_else(|| "*".to_string()))?;
        if cors == CorsPolicy::Permissive {
            info!("CORS open to all origins; set CORS_ALLOW_ORIGINS to restrict it");
        }

        Ok(Config {
            database_url,
            bind_addr,
            max_connections,
            cors,
        })
    }
}
