//! Session configuration loaded from TOML.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use touch_relay_gesture::Layout;
use touch_relay_injector::{OverflowPolicy, DEFAULT_QUEUE_CAPACITY};
use tracing::info;

use crate::error::SessionError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub injector: InjectorConfig,
    #[serde(default)]
    pub layout: Layout,
}

/// Network and runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Port of the token command listener.
    #[serde(default = "default_command_port")]
    pub command_port: u16,
    /// Port the privileged frame sink listens on.
    #[serde(default = "default_sink_port")]
    pub sink_port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            command_port: default_command_port(),
            sink_port: default_sink_port(),
            log_level: default_log_level(),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn command_addr(&self) -> String {
        format!("{}:{}", self.bind, self.command_port)
    }

    #[must_use]
    pub fn sink_addr(&self) -> String {
        format!("{}:{}", self.bind, self.sink_port)
    }
}

/// Frame queue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectorConfig {
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default)]
    pub overflow: OverflowPolicy,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            overflow: OverflowPolicy::default(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_command_port() -> u16 {
    7070
}

fn default_sink_port() -> u16 {
    7171
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

/// Load configuration from the given path, or the default location.
pub fn load_config(path: Option<&str>) -> Result<Config, SessionError> {
    let config_path = match path {
        Some(p) => PathBuf::from(p),
        None => default_config_path(),
    };

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| SessionError::Config(format!("failed to read config: {e}")))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| SessionError::Config(format!("failed to parse config: {e}")))?;
        info!(path = %config_path.display(), "loaded config");
        Ok(config)
    } else {
        info!("no config file found, using defaults");
        Ok(Config::default())
    }
}

/// Write the default configuration to the given path, or the default
/// location. Refuses to overwrite an existing file.
pub fn write_default_config(path: Option<&str>) -> Result<PathBuf, SessionError> {
    let config_path = match path {
        Some(p) => PathBuf::from(p),
        None => default_config_path(),
    };

    if config_path.exists() {
        return Err(SessionError::Config(format!(
            "config already exists at {}",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| SessionError::Config(format!("failed to create config dir: {e}")))?;
    }

    let content = toml::to_string_pretty(&Config::default())
        .map_err(|e| SessionError::Config(format!("failed to serialize config: {e}")))?;
    std::fs::write(&config_path, content)
        .map_err(|e| SessionError::Config(format!("failed to write config: {e}")))?;

    Ok(config_path)
}

/// Get the default config directory path.
#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("touch-relay")
}

/// Get the default config file path.
fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use touch_relay_types::{Point, PointerId};

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("command_port = 7070"));
        assert!(toml_str.contains("sink_port = 7171"));
    }

    #[test]
    fn parse_example_config() {
        let toml_str = r#"
[session]
bind = "0.0.0.0"
command_port = 7072
sink_port = 7173
log_level = "debug"

[injector]
queue_capacity = 64
overflow = "drop-oldest"

[layout]
pin_pointer = 4

[layout.left_stick]
pointer = 0
center = { x = 300.0, y = 700.0 }
radius = 120.0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.session.command_addr(), "0.0.0.0:7072");
        assert_eq!(config.injector.queue_capacity, 64);
        assert_eq!(config.injector.overflow, OverflowPolicy::DropOldest);
        assert_eq!(config.layout.pin_pointer, PointerId(4));
        assert_eq!(config.layout.left_stick.center, Point::new(300.0, 700.0));
        // Unspecified sections keep their defaults.
        assert_eq!(config.layout.fire_stick.center, Point::new(1780.0, 650.0));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.session.command_port, 7070);
        assert_eq!(config.injector.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(config.injector.overflow, OverflowPolicy::Reject);
    }
}
