//! Service configuration

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Which store implementation backs the service. Fixed for the process
/// lifetime; there is no runtime re-selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local concurrent map.
    #[default]
    Memory,
    /// SQLite database at `db_path`.
    Sqlite,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Sqlite => "sqlite",
        }
    }
}

/// Widget service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage backend to bind at startup
    pub backend: StoreBackend,
    /// Path to the sqlite database (sqlite backend only)
    pub db_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            db_path: "widgets.db".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("config not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        tracing::info!(
            "loaded {} backend config from {}",
            config.backend.as_str(),
            path.display()
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sqlite_backend() -> Result<()> {
        let config: Config = toml::from_str(
            r#"
            backend = "sqlite"
            db_path = "/tmp/board.db"
            "#,
        )?;
        assert_eq!(config.backend, StoreBackend::Sqlite);
        assert_eq!(config.db_path, "/tmp/board.db");
        Ok(())
    }

    #[test]
    fn test_defaults_fill_missing_fields() -> Result<()> {
        let config: Config = toml::from_str("")?;
        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(config.db_path, "widgets.db");
        Ok(())
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() -> Result<()> {
        let config = Config::load("/nonexistent/widgetplane.toml")?;
        assert_eq!(config.backend, StoreBackend::Memory);
        Ok(())
    }
}
