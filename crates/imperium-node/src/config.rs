//! Node configuration from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use imperium_store::EngineKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IMPERIUM_ENGINE: {0}")]
    Engine(String),

    #[error("IMPERIUM_HTTP_ADDR: invalid socket address {0:?}")]
    HttpAddr(String),
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Which storage engine backs the world.
    pub engine: EngineKind,
    /// World file path for the file engine.
    pub storage_path: PathBuf,
    /// Database path for the SQLite engine.
    pub db_path: PathBuf,
    /// Address the HTTP gateway binds.
    pub http_addr: SocketAddr,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Memory,
            storage_path: PathBuf::from("./data/world.json"),
            db_path: PathBuf::from("./data/imperium.db"),
            http_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

impl NodeConfig {
    /// Read the configuration from the environment.
    ///
    /// - `IMPERIUM_ENGINE`: `memory` (default), `file`, or `sqlite`
    /// - `IMPERIUM_STORAGE_PATH`: world file (default `./data/world.json`)
    /// - `IMPERIUM_DB_PATH`: SQLite file (default `./data/imperium.db`)
    /// - `IMPERIUM_HTTP_ADDR`: bind address (default `127.0.0.1:8080`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let engine = match env::var("IMPERIUM_ENGINE") {
            Ok(raw) => raw
                .parse::<EngineKind>()
                .map_err(|e| ConfigError::Engine(e.to_string()))?,
            Err(_) => defaults.engine,
        };

        let http_addr = match env::var("IMPERIUM_HTTP_ADDR") {
            Ok(raw) => raw
                .parse::<SocketAddr>()
                .map_err(|_| ConfigError::HttpAddr(raw))?,
            Err(_) => defaults.http_addr,
        };

        Ok(Self {
            engine,
            storage_path: env::var("IMPERIUM_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            db_path: env::var("IMPERIUM_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            http_addr,
        })
    }
}
