//! Registration settings, loadable from TOML.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::{convert::CastPolicy, error::ConfigError};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Name the type is registered and looked up under.
    pub type_name: String,
    pub kind: char,
    pub type_char: char,
    /// Adopt a complete posit8_2 type that is already registered.
    pub reuse_existing: bool,
    pub cast: CastConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CastConfig {
    /// Reject out of range scalars instead of saturating them.
    pub check_overflow: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            type_name: "posit8_2".to_string(),
            kind: 'p',
            type_char: 'E',
            reuse_existing: true,
            cast: CastConfig::default(),
        }
    }
}

impl RegistryConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RegistryConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.type_name.trim().is_empty() {
            return Err(ConfigError::Invalid("type_name must not be empty".to_string()));
        }
        for (field, c) in [("kind", self.kind), ("type_char", self.type_char)] {
            if !c.is_ascii_graphic() {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a printable ASCII character, got {:?}",
                    field, c
                )));
            }
        }
        Ok(())
    }

    pub fn cast_policy(&self) -> CastPolicy {
        CastPolicy {
            check_overflow: self.cast.check_overflow,
        }
    }
}
