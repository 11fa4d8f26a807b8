use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub dataset: DatasetConfig,
    pub tariff: TariffConfig,
    pub sim: SimConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig { pub token: String }

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub path: PathBuf,
    pub refresh_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TariffConfig {
    pub currency: String,
    pub rate_per_kwh: f64,
}

/// Synthetic dataset parameters, used when the source CSV is absent.
#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    pub homes: u32,
    pub rooms: Vec<String>,
    pub days: u32,
    pub interval_minutes: u32,
    pub seed: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("HEM__").split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_config() {
        let cfg = Config::load().expect("default config should parse");
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.tariff.rate_per_kwh > 0.0);
        assert!(!cfg.sim.rooms.is_empty());
    }

    #[test]
    fn test_socket_addr() {
        let figment = Figment::new().merge(Toml::file("config/default.toml"));
        let cfg: Config = figment.extract().unwrap();
        let addr = cfg.server.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }
}
