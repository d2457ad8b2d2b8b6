use std::env;

use esewa_tools::EsewaConfig;
use log::*;

use crate::errors::ServerError;

const DEFAULT_SPS_HOST: &str = "127.0.0.1";
const DEFAULT_SPS_PORT: u16 = 8360;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Gateway credentials and endpoints. Required; the server refuses to start without them.
    pub esewa: EsewaConfig,
}

impl ServerConfig {
    pub fn new(host: &str, port: u16, esewa: EsewaConfig) -> Self {
        Self { host: host.to_string(), port, database_url: String::default(), esewa }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let host = env::var("SPS_HOST").ok().unwrap_or_else(|| {
            info!("🪛️ SPS_HOST is not set. Using the default, {DEFAULT_SPS_HOST}, instead.");
            DEFAULT_SPS_HOST.into()
        });
        let port = env::var("SPS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SPS_PORT. {e} Using the default, {DEFAULT_SPS_PORT}, instead."
                    );
                    DEFAULT_SPS_PORT
                })
            })
            .unwrap_or(DEFAULT_SPS_PORT);
        let database_url = env::var("SPS_DATABASE_URL").unwrap_or_else(|_| {
            warn!("🪛️ SPS_DATABASE_URL is not set. Using a temporary in-memory database. All data will be lost when \
                the server stops.");
            "sqlite::memory:".to_string()
        });
        let esewa = EsewaConfig::try_from_env().map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
        Ok(Self { host, port, database_url, esewa })
    }
}
