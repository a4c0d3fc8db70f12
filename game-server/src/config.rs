use std::env;
use std::str::FromStr;
use std::time::Duration;

use game_core::{DEFAULT_ROUND_SECONDS, RoomSettings};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
    #[error("{name} must be {requirement}")]
    OutOfRange {
        name: &'static str,
        requirement: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub round_seconds: u32,
    pub timer_tick_millis: u64,
    pub max_players_per_room: usize,
    pub connection_timeout_seconds: u64,
    pub rate_limit_burst: u32,
    pub rate_limit_per_second: f64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads every setting through `lookup`, falling back to the default when it returns `None`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT", defaults.port)?,
            round_seconds: parse_var(&lookup, "ROUND_SECONDS", defaults.round_seconds)?,
            timer_tick_millis: parse_var(&lookup, "TIMER_TICK_MILLIS", defaults.timer_tick_millis)?,
            max_players_per_room: parse_var(
                &lookup,
                "MAX_PLAYERS_PER_ROOM",
                defaults.max_players_per_room,
            )?,
            connection_timeout_seconds: parse_var(
                &lookup,
                "CONNECTION_TIMEOUT_SECONDS",
                defaults.connection_timeout_seconds,
            )?,
            rate_limit_burst: parse_var(&lookup, "RATE_LIMIT_BURST", defaults.rate_limit_burst)?,
            rate_limit_per_second: parse_var(
                &lookup,
                "RATE_LIMIT_PER_SECOND",
                defaults.rate_limit_per_second,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.round_seconds == 0 {
            return Err(ConfigError::OutOfRange {
                name: "ROUND_SECONDS",
                requirement: "at least 1",
            });
        }
        if self.timer_tick_millis == 0 {
            return Err(ConfigError::OutOfRange {
                name: "TIMER_TICK_MILLIS",
                requirement: "at least 1",
            });
        }
        if self.max_players_per_room < 2 {
            return Err(ConfigError::OutOfRange {
                name: "MAX_PLAYERS_PER_ROOM",
                requirement: "at least 2",
            });
        }
        if self.rate_limit_burst == 0 {
            return Err(ConfigError::OutOfRange {
                name: "RATE_LIMIT_BURST",
                requirement: "at least 1",
            });
        }
        if self.rate_limit_per_second.is_nan() || self.rate_limit_per_second <= 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "RATE_LIMIT_PER_SECOND",
                requirement: "greater than 0",
            });
        }
        Ok(())
    }

    pub fn room_settings(&self) -> RoomSettings {
        RoomSettings {
            round_seconds: self.round_seconds,
            max_players: self.max_players_per_room,
        }
    }

    pub fn timer_tick(&self) -> Duration {
        Duration::from_millis(self.timer_tick_millis)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            round_seconds: DEFAULT_ROUND_SECONDS,
            timer_tick_millis: 1000,
            max_players_per_room: 16,
            connection_timeout_seconds: 300,
            rate_limit_burst: 240,
            rate_limit_per_second: 120.0,
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}
