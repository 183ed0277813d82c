use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Baud rate the necklace bridge firmware runs at
pub const BAUD_RATE: u32 = 115_200;

/// How long a single serial read blocks before giving up
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Explicit device path, skips auto-detection when set
    pub serial_port: Option<String>,
    pub address: SocketAddr,
    pub static_dir: PathBuf,
}

impl Config {
    /// Load settings from the process environment. Call after `.env` has been loaded.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let serial_port = lookup("SERIAL_PORT").filter(|path| !path.is_empty());

        let host = match lookup("HTTP_HOST") {
            Some(value) => value
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidValue { key: "HTTP_HOST", value })?,
            None => DEFAULT_HOST,
        };

        let port = match lookup("HTTP_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue { key: "HTTP_PORT", value })?,
            None => DEFAULT_PORT,
        };

        let static_dir = lookup("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string());

        Ok(Self {
            serial_port,
            address: SocketAddr::new(host, port),
            static_dir: PathBuf::from(static_dir),
        })
    }
}
