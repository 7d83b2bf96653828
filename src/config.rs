// Application configuration
// Read from the environment (optionally populated from a .env file)

use std::str::FromStr;

use crate::campaign::{PricingConfig, ReferencePolicy, DEFAULT_CURRENCY_SCALE};
use crate::validation::validate_currency_scale;

/// Upper bound for CURRENCY_SCALE; no real currency goes beyond this
pub const MAX_CURRENCY_SCALE: u32 = 6;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings of the HTTP service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub pricing: PricingConfig,
}

impl AppConfig {
    /// Load configuration from process environment variables
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `HOST` | `0.0.0.0` |
    /// | `PORT` | `8080` |
    /// | `CURRENCY_SCALE` | `2` |
    /// | `REFERENCE_POLICY` | `lenient` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_var(&lookup, "PORT", 8080u16)?;

        let currency_scale = parse_var(&lookup, "CURRENCY_SCALE", DEFAULT_CURRENCY_SCALE)?;
        validate_currency_scale(currency_scale).map_err(|_| ConfigError::InvalidValue {
            name: "CURRENCY_SCALE",
            value: currency_scale.to_string(),
            reason: format!("must be at most {}", MAX_CURRENCY_SCALE),
        })?;

        let reference_policy = parse_var(&lookup, "REFERENCE_POLICY", ReferencePolicy::Lenient)?;

        Ok(Self {
            host,
            port,
            pricing: PricingConfig {
                currency_scale,
                reference_policy,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
