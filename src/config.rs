//! App Configuration
//!
//! Defaults can be overridden at build time with a JSON object in the
//! `TODO_UI_CONFIG` environment variable, e.g. `{"db_name":"todos-dev"}`.

use log::LevelFilter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Database the tasks are stored in
    pub db_name: String,
    /// Minimum level kept by the diagnostic log
    pub log_level: String,
    /// Number of recent log records kept in memory
    pub log_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_name: "todos".to_string(),
            log_level: "info".to_string(),
            log_capacity: 256,
        }
    }
}

impl AppConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Config baked in at build time, or the defaults
    pub fn load() -> Result<Self, serde_json::Error> {
        match option_env!("TODO_UI_CONFIG") {
            Some(raw) => Self::from_json(raw),
            None => Ok(Self::default()),
        }
    }

    /// Unknown level names fall back to `Info`
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}
