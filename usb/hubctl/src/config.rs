use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fmt, fs, io};

use serde::Deserialize;
use thiserror::Error;

use crate::registry::HubRegistry;

/// Settings read from the optional configuration file.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Timeout applied to every control transfer.
    pub timeout_ms: u64,
    pub descriptor_buffer_len: u16,
    pub max_hubs: usize,
    pub log_file: Option<PathBuf>,
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_ms: 1000,
            descriptor_buffer_len: 1024,
            max_hubs: HubRegistry::<()>::DEFAULT_CAPACITY,
            log_file: None,
            log_level: LogLevel::Info,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        toml::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

/// Which hub a power command goes to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HubTarget {
    /// Position in the registry, as printed by the listing.
    Index(usize),
    Address { bus: u8, device: u8 },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    /// Any nonzero value turns the port on.
    pub fn from_level(level: i64) -> Self {
        if level != 0 {
            Self::On
        } else {
            Self::Off
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            Self::On => 1,
            Self::Off => 0,
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// What the operator asked for on the command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Options {
    pub target: HubTarget,
    /// `None` lists the hubs and stops.
    pub port: Option<u16>,
    pub power: PowerState,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            target: HubTarget::Address { bus: 0, device: 0 },
            port: None,
            power: PowerState::On,
        }
    }
}
