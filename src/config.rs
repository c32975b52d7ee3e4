use dotenvy::dotenv;
use std::{
    env,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};
use thiserror::Error;
use tracing::Level;

use crate::storage::NamingScheme;

const DEFAULT_PORT: u16 = 7000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key} has invalid value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    /// Host name put into the URLs handed back to clients.
    pub public_host: String,
    pub naming: NamingScheme,
    pub max_upload_bytes: usize,
    pub log_level: Level,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            storage_path: lookup("STORAGE_PATH")
                .unwrap_or_else(|| "./uploads".to_string())
                .into(),
            host: parse_var(&lookup, "HOST", IpAddr::from([0, 0, 0, 0]))?,
            port: parse_var(&lookup, "PORT", DEFAULT_PORT)?,
            public_host: lookup("PUBLIC_HOST").unwrap_or_else(|| "localhost".to_string()),
            naming: parse_var(&lookup, "NAMING", NamingScheme::default())?,
            max_upload_bytes: parse_var(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            log_level: parse_var(&lookup, "LOG_LEVEL", Level::INFO)?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn public_base_url(&self) -> String {
        format!("http://{}:{}", self.public_host, self.port)
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };

    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}
