//! # ECS Configuration
//!
//! Startup settings for an [`Ecs`](crate::Ecs), loaded once from TOML.
//!
//! ```toml
//! max_entities = 4096
//! grow_by = 1024
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Startup settings for the entity pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EcsConfig {
    /// Number of entity ids available at startup.
    pub max_entities: u32,
    /// Ids added when the pool runs dry. `0` keeps the pool fixed, so an
    /// exhausted pool hands out the invalid sentinel.
    pub grow_by: u32,
}

impl Default for EcsConfig {
    fn default() -> Self {
        Self {
            max_entities: 1024,
            grow_by: 0,
        }
    }
}

impl EcsConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed input, [`ConfigError::Invalid`] on
    /// out-of-range values.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Checks that ids stay representable.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if `max_entities` exceeds `i32::MAX`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if i32::try_from(self.max_entities).is_err() {
            return Err(ConfigError::Invalid(format!(
                "max_entities {} exceeds {}",
                self.max_entities,
                i32::MAX
            )));
        }
        Ok(())
    }
}
