//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Debug mode: lowers the default log filter to debug.
    #[serde(default = "default_true")]
    pub debug: bool,

    // === Artifact Paths ===
    /// Path to the serialized regression model.
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Path to the serialized encoder set.
    #[serde(default = "default_encoders_path")]
    pub encoders_path: PathBuf,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_port() -> u16 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_model_path() -> PathBuf {
    PathBuf::from("random_forest_model.json")
}

fn default_encoders_path() -> PathBuf {
    PathBuf::from("encoders.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        if self.model_path.as_os_str().is_empty() {
            return Err("MODEL_PATH must not be empty".to_string());
        }

        if self.encoders_path.as_os_str().is_empty() {
            return Err("ENCODERS_PATH must not be empty".to_string());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            debug: default_true(),
            model_path: default_model_path(),
            encoders_path: default_encoders_path(),
            rust_log: default_log_level(),
        }
    }
}
