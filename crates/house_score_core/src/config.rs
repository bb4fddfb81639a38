//! Dashboard configuration.
//!
//! # Responsibility
//! - Describe the competing houses, carousel timing and admin identity.
//! - Load configuration from JSON files with validation.
//!
//! # Invariants
//! - House names are unique and non-blank.
//! - The carousel interval is at least one second.

use crate::auth::StaticAdminIdentity;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;

const DEFAULT_CAROUSEL_INTERVAL_SECS: u64 = 5;
const FALLBACK_HOUSE_COLOR: &str = "gray";

/// One competing house and its display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseConfig {
    pub name: String,
    pub color: String,
}

impl HouseConfig {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Configured administrator credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

/// Top-level dashboard settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Scored houses; order is the tie-break precedence.
    pub houses: Vec<HouseConfig>,
    pub carousel_interval_secs: u64,
    pub admin: Option<AdminConfig>,
    pub log_level: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            houses: vec![
                HouseConfig::new("Delany", "green"),
                HouseConfig::new("Gandhi", "yellow"),
                HouseConfig::new("Tagore", "blue"),
                HouseConfig::new("Nehru", "purple"),
            ],
            carousel_interval_secs: DEFAULT_CAROUSEL_INTERVAL_SECS,
            admin: None,
            log_level: None,
        }
    }
}

impl DashboardConfig {
    /// Parses and validates a JSON document. Missing keys take defaults.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            source: err,
        })?;
        Self::from_json_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.houses.is_empty() {
            return Err(ConfigError::NoHouses);
        }
        for (index, house) in self.houses.iter().enumerate() {
            if house.name.trim().is_empty() {
                return Err(ConfigError::BlankHouseName { index });
            }
            if self.houses[..index].iter().any(|other| other.name == house.name) {
                return Err(ConfigError::DuplicateHouse(house.name.clone()));
            }
        }
        if self.carousel_interval_secs == 0 {
            return Err(ConfigError::ZeroCarouselInterval);
        }
        Ok(())
    }

    /// House names in declaration order.
    pub fn known_houses(&self) -> Vec<String> {
        self.houses.iter().map(|house| house.name.clone()).collect()
    }

    /// Display color for a house, `gray` for unrecognized names.
    pub fn house_color(&self, house: &str) -> &str {
        self.houses
            .iter()
            .find(|candidate| candidate.name == house)
            .map_or(FALLBACK_HOUSE_COLOR, |candidate| candidate.color.as_str())
    }

    pub fn carousel_interval(&self) -> Duration {
        Duration::from_secs(self.carousel_interval_secs)
    }

    /// Identity verifier for the configured admin, if any.
    pub fn admin_identity(&self) -> Option<StaticAdminIdentity> {
        self.admin
            .as_ref()
            .map(|admin| StaticAdminIdentity::new(admin.email.clone(), admin.password.clone()))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    NoHouses,
    BlankHouseName {
        index: usize,
    },
    DuplicateHouse(String),
    ZeroCarouselInterval,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read config `{path}`: {source}"),
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::NoHouses => write!(f, "config must declare at least one house"),
            Self::BlankHouseName { index } => {
                write!(f, "house #{} has a blank name", index + 1)
            }
            Self::DuplicateHouse(name) => write!(f, "house `{name}` is declared twice"),
            Self::ZeroCarouselInterval => {
                write!(f, "carousel_interval_secs must be at least 1")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}
