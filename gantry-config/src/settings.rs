//! Engine settings
//!
//! Tunables for validation and commit-time invariant checks.

use crate::error::SettingsError;

/// Longest pipeline name accepted unless overridden
pub const DEFAULT_MAX_NAME_LENGTH: usize = 255;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Maximum number of characters in a pipeline name
    pub max_name_length: usize,

    /// Reject commits whose dependency edges point at unknown pipelines
    pub enforce_upstream_exists: bool,
}

impl EngineSettings {
    /// Creates settings from environment variables
    ///
    /// Expected environment variables:
    /// - GANTRY_MAX_NAME_LENGTH (optional, default: 255)
    /// - GANTRY_ENFORCE_UPSTREAM (optional, true/false, default: true)
    pub fn from_env() -> Result<Self, SettingsError> {
        let mut settings = Self::default();

        if let Ok(value) = std::env::var("GANTRY_MAX_NAME_LENGTH") {
            settings.max_name_length = parse_var("GANTRY_MAX_NAME_LENGTH", value)?;
        }

        if let Ok(value) = std::env::var("GANTRY_ENFORCE_UPSTREAM") {
            settings.enforce_upstream_exists = parse_var("GANTRY_ENFORCE_UPSTREAM", value)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Validates the settings
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_name_length == 0 {
            return Err(SettingsError::Invalid(
                "max_name_length must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, SettingsError> {
    value
        .parse::<T>()
        .map_err(|_| SettingsError::InvalidValue { name, value })
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            enforce_upstream_exists: true,
        }
    }
}
