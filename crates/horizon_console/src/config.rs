//! Configuration management for the Horizon command console.
//!
//! Handles loading and validation of the console configuration from a TOML
//! file, with command-line overrides applied on top.

use crate::cli::CliArgs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Console behaviour settings
    pub console: ConsoleSettings,
    /// Logging configuration settings
    pub logging: LoggingSettings,
}

/// Console-specific configuration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Path of the JSON world snapshot to load (empty means an empty world)
    #[serde(default)]
    pub world_file: String,
    /// Player to run commands as; the server console when unset
    #[serde(default)]
    pub act_as: Option<String>,
    /// Print command results as JSON instead of plain text
    #[serde(default)]
    pub json_output: bool,
}

/// Logging system configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            console: ConsoleSettings {
                world_file: "world.json".to_string(),
                act_as: None,
                json_output: false,
            },
            logging: LoggingSettings {
                level: "warn".to_string(),
                json_format: false,
            },
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, creates a default configuration file at the
    /// specified path and returns the default configuration.
    pub async fn load_from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Applies command-line overrides on top of the file configuration.
    pub fn apply_overrides(&mut self, args: &CliArgs) {
        if let Some(world) = &args.world {
            self.console.world_file = world.to_string_lossy().to_string();
        }

        if let Some(act_as) = &args.act_as {
            self.console.act_as = Some(act_as.clone());
        }

        if let Some(log_level) = &args.log_level {
            self.logging.level = log_level.clone();
        }

        if args.json_logs {
            self.logging.json_format = true;
        }
    }

    /// Validates the configuration for consistency and correctness.
    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        if let Some(name) = &self.console.act_as {
            if name.trim().is_empty() {
                return Err("Player name to act as cannot be empty".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;
    use tokio::fs;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(config.console.world_file, "world.json");
        assert!(config.console.act_as.is_none());
        assert!(!config.console.json_output);
        assert_eq!(config.logging.level, "warn");
        assert!(!config.logging.json_format);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "debug".to_string();
        config.console.act_as = Some("  ".to_string());
        assert!(config.validate().is_err());

        config.console.act_as = Some("Steve".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = AppConfig::default();
        let args = CliArgs {
            world: Some(PathBuf::from("arena.json")),
            act_as: Some("Alex".to_string()),
            log_level: Some("trace".to_string()),
            json_logs: true,
            ..CliArgs::default()
        };

        config.apply_overrides(&args);

        assert_eq!(config.console.world_file, "arena.json");
        assert_eq!(config.console.act_as.as_deref(), Some("Alex"));
        assert_eq!(config.logging.level, "trace");
        assert!(config.logging.json_format);
    }

    #[tokio::test]
    async fn test_load_from_nonexistent_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.toml");

        let config = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config, AppConfig::default());

        // Should create the file
        assert!(path.exists());
        let reloaded = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(reloaded, config);
    }

    #[tokio::test]
    async fn test_load_from_existing_file() {
        let toml_content = r#"
[console]
world_file = "arena.json"
act_as = "Steve"
json_output = true

[logging]
level = "debug"
"#;

        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), toml_content).await.unwrap();

        let config = AppConfig::load_from_file(&temp_file.path().to_path_buf())
            .await
            .unwrap();

        assert_eq!(config.console.world_file, "arena.json");
        assert_eq!(config.console.act_as.as_deref(), Some("Steve"));
        assert!(config.console.json_output);
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.json_format);
    }
}
