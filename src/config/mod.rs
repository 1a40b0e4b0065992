//! Configuration management
//!
//! Handles loading, validation, and merging of configuration from:
//! - TOML files
//! - CLI arguments

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod types;

pub use types::{ScreenDimensions, SwipePadding, ValueError};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Screen dimensions of the target device
    #[serde(default = "default_dimensions")]
    pub dimensions: ScreenDimensions,

    /// Swipe padding margins
    #[serde(default = "default_swipe_padding")]
    pub swipe_padding: SwipePadding,

    /// Input device node the injector writes events to
    #[serde(default = "default_input_device")]
    pub input_device: String,

    /// Path of the injector executable on the device
    #[serde(default = "default_injector_path")]
    pub injector_path: String,
}

fn default_dimensions() -> ScreenDimensions {
    ScreenDimensions {
        width: 320,
        height: 480,
    }
}

fn default_swipe_padding() -> SwipePadding {
    SwipePadding([40, 40, 40, 40])
}

fn default_input_device() -> String {
    "/dev/input/event2".to_string()
}

fn default_injector_path() -> String {
    "/data/local/orng".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dimensions: default_dimensions(),
            swipe_padding: default_swipe_padding(),
            input_device: default_input_device(),
            injector_path: default_injector_path(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Override config fields with CLI arguments
    pub fn with_overrides(
        mut self,
        dimensions: Option<ScreenDimensions>,
        swipe_padding: Option<SwipePadding>,
        input_device: Option<String>,
        injector_path: Option<String>,
    ) -> Self {
        if let Some(dimensions) = dimensions {
            self.dimensions = dimensions;
        }
        if let Some(swipe_padding) = swipe_padding {
            self.swipe_padding = swipe_padding;
        }
        if let Some(input_device) = input_device {
            self.input_device = input_device;
        }
        if let Some(injector_path) = injector_path {
            self.injector_path = injector_path;
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        ScreenDimensions::new(self.dimensions.width, self.dimensions.height)
            .context("Invalid screen dimensions")?;
        SwipePadding::new(self.swipe_padding.0).context("Invalid swipe padding")?;

        if self.input_device.is_empty() {
            anyhow::bail!("Input device path must not be empty");
        }
        if self.injector_path.is_empty() {
            anyhow::bail!("Injector path must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.dimensions, ScreenDimensions { width: 320, height: 480 });
        assert_eq!(config.swipe_padding, SwipePadding([40, 40, 40, 40]));
        assert_eq!(config.input_device, "/dev/input/event2");
        assert_eq!(config.injector_path, "/data/local/orng");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
            dimensions = [720, 1280]
            swipe_padding = [10, 20, 30, 40]
            input_device = "/dev/input/event5"
            "#,
        )
        .unwrap();

        assert_eq!(config.dimensions, ScreenDimensions { width: 720, height: 1280 });
        assert_eq!(config.swipe_padding.get(2), 30);
        assert_eq!(config.input_device, "/dev/input/event5");
        // Unset fields fall back to defaults
        assert_eq!(config.injector_path, "/data/local/orng");
    }

    #[test]
    fn test_toml_rejects_bad_geometry() {
        assert!(toml::from_str::<Config>("dimensions = [0, 480]").is_err());
        assert!(toml::from_str::<Config>("swipe_padding = [40, 40]").is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(
            Some(ScreenDimensions { width: 1080, height: 1920 }),
            None,
            Some("/dev/input/event0".to_string()),
            None,
        );

        assert_eq!(config.dimensions.width, 1080);
        assert_eq!(config.swipe_padding, SwipePadding([40, 40, 40, 40]));
        assert_eq!(config.input_device, "/dev/input/event0");
        assert_eq!(config.injector_path, "/data/local/orng");
    }

    #[test]
    fn test_validate_rejects_empty_paths() {
        let mut config = Config::default();
        config.input_device.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dimensions = [720, 1280]").unwrap();
        file.flush().unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.dimensions, ScreenDimensions { width: 720, height: 1280 });
        assert_eq!(config.input_device, "/dev/input/event2");
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(Config::load("/nonexistent/gesture-driver.toml").is_err());
    }
}
