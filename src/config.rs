use std::env;
use std::str::FromStr;

use crate::engine::EngineConfig;
use crate::error::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub engine: EngineConfig,
    pub tariffs_path: Option<String>,
    pub gazetteer_path: Option<String>,
    pub session_ttl_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            engine: EngineConfig::default(),
            tariffs_path: None,
            gazetteer_path: None,
            session_ttl_minutes: 120,
        }
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let engine = EngineConfig {
            road_factor: parse_var("ROAD_FACTOR", defaults.engine.road_factor)?,
            minutes_per_km: parse_var("MINUTES_PER_KM", defaults.engine.minutes_per_km)?,
            ..defaults.engine
        };
        engine.validate()?;

        let session_ttl_minutes = parse_var("SESSION_TTL_MINUTES", defaults.session_ttl_minutes)?;
        if session_ttl_minutes <= 0 {
            return Err(AppError::Config(
                "SESSION_TTL_MINUTES must be positive".to_string(),
            ));
        }

        Ok(Self {
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("SERVER_PORT", defaults.server_port)?,
            engine,
            tariffs_path: env::var("TARIFFS_PATH").ok().filter(|p| !p.trim().is_empty()),
            gazetteer_path: env::var("GAZETTEER_PATH").ok().filter(|p| !p.trim().is_empty()),
            session_ttl_minutes,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a number, got {:?}", name, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert_eq!(config.engine.road_factor, 1.3);
        assert_eq!(config.engine.minutes_per_km, 2.5);
    }

    #[test]
    fn test_parse_var_falls_back_to_default() {
        let port: u16 = parse_var("TAXI_FARE_TEST_UNSET_VARIABLE", 8080).unwrap();
        assert_eq!(port, 8080);
    }
}
