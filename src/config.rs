use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

use crate::factors::FactorSource;

pub const FACTORS_PATH_VAR: &str = "FOOTPRINT_FACTORS_PATH";
pub const PRETTY_VAR: &str = "FOOTPRINT_PRETTY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub factor_source: FactorSource,
    pub pretty: bool,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve settings through `lookup`, which maps a variable name to its
    /// value when set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let factor_source = match lookup(FACTORS_PATH_VAR).filter(|v| !v.trim().is_empty()) {
            Some(path) => {
                info!("{FACTORS_PATH_VAR} set, reading factors from {path}");
                FactorSource::File(PathBuf::from(path))
            }
            None => {
                info!("{FACTORS_PATH_VAR} not set, using embedded factors");
                FactorSource::Embedded
            }
        };

        Ok(Self {
            factor_source,
            pretty: try_load(&lookup, PRETTY_VAR, "false")?,
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::InvalidValue {
            key,
            value,
            reason: e.to_string(),
        }
    })
}
