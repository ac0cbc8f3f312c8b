//! Service configuration from the environment.

use std::time::Duration;
use thiserror::Error;

use crate::state::Retention;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MOVES: &str = "rock,paper,scissors";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),
    #[error("{name} must be a positive whole number, got {value:?}")]
    InvalidLimit { name: &'static str, value: String },
}

/// Runtime settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OracleConfig {
    /// `PORT`, default 3000
    pub port: u16,
    /// `RPS_MOVES`, comma separated, default `rock,paper,scissors`
    pub moves: Vec<String>,
    /// `RPS_MAX_ROUNDS` and `RPS_ROUND_RETENTION_SECS`, default 10000 rounds for 600s
    pub retention: Retention,
}

impl OracleConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let moves = var("RPS_MOVES")
            .as_deref()
            .unwrap_or(DEFAULT_MOVES)
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(String::from)
            .collect();

        let defaults = Retention::default();
        let retention = Retention {
            max_rounds: match var("RPS_MAX_ROUNDS") {
                Some(raw) => positive("RPS_MAX_ROUNDS", raw)?,
                None => defaults.max_rounds,
            },
            window: match var("RPS_ROUND_RETENTION_SECS") {
                Some(raw) => Duration::from_secs(positive("RPS_ROUND_RETENTION_SECS", raw)?),
                None => defaults.window,
            },
        };

        Ok(Self {
            port,
            moves,
            retention,
        })
    }
}

fn positive<T>(name: &'static str, raw: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Default + PartialEq,
{
    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => Ok(value),
        _ => Err(ConfigError::InvalidLimit { name, value: raw }),
    }
}
