//! Configuration module
//!
//! Handles CLI configuration: which document to operate on and who is
//! acting.

use anyhow::Result;
use gantry_core::domain::principal::Principal;
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the JSON configuration document
    pub config_file: PathBuf,

    /// Name of the acting user
    pub user: String,
}

impl Config {
    /// The acting user as a principal
    pub fn principal(&self) -> Principal {
        Principal::new(self.user.trim())
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.config_file.as_os_str().is_empty() {
            anyhow::bail!("config_file cannot be empty");
        }

        if self.user.trim().is_empty() {
            anyhow::bail!("user cannot be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            config_file: PathBuf::from("gantry.json"),
            user: "alice".to_string(),
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = config();
        assert!(config.validate().is_ok());

        config.user = "  ".to_string();
        assert!(config.validate().is_err());

        config.user = "alice".to_string();
        config.config_file = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_principal_is_trimmed() {
        let mut config = config();
        config.user = " Alice ".to_string();
        assert_eq!(config.principal(), Principal::new("alice"));
        assert_eq!(config.principal().name(), "Alice");
    }
}
