use std::env;

use chrono_tz::Tz;
use dotenvy::dotenv;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Organization policy the accounting engine runs under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Policy {
    /// Nominal length of a working day, in hours.
    pub nominal_workday_hours: f64,
    /// Zone used for "today" and "now".
    pub time_zone: Tz,
}

impl Policy {
    pub fn nominal_workday_minutes(&self) -> f64 {
        self.nominal_workday_hours * 60.0
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            nominal_workday_hours: 7.0,
            time_zone: chrono_tz::Asia::Kolkata,
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
    pub log_level: tracing::Level,

    pub policy: Policy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let defaults = Policy::default();

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            rate_protected_per_min: parsed("RATE_PROTECTED_PER_MIN", 1000)?,
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            log_level: parsed("LOG_LEVEL", tracing::Level::DEBUG)?,
            policy: Policy {
                nominal_workday_hours: workday_hours(defaults.nominal_workday_hours)?,
                time_zone: parsed("ORG_TIME_ZONE", defaults.time_zone)?,
            },
        })
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    env::var(var).map_err(|_| ConfigError::Missing(var))
}

fn parsed<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}

fn workday_hours(default: f64) -> Result<f64, ConfigError> {
    let hours: f64 = parsed("NOMINAL_WORKDAY_HOURS", default)?;
    if hours.is_finite() && hours > 0.0 {
        Ok(hours)
    } else {
        Err(ConfigError::Invalid {
            var: "NOMINAL_WORKDAY_HOURS",
            value: hours.to_string(),
        })
    }
}
