//! Server configuration from environment variables
//!
//! - `MODEL_DIR`: directory holding the artifacts (default `.`)
//! - `MODEL_FILE`: classifier file name (default `model.json`)
//! - `SCALER_FILE`: scaler file name (default `scaler.json`)
//! - `PORT`: listen port (default 5000)

use std::path::PathBuf;

pub const DEFAULT_MODEL_FILE: &str = "model.json";
pub const DEFAULT_SCALER_FILE: &str = "scaler.json";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub model_dir: PathBuf,
    pub model_file: String,
    pub scaler_file: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("."),
            model_file: DEFAULT_MODEL_FILE.to_string(),
            scaler_file: DEFAULT_SCALER_FILE.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid PORT '{}', using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => defaults.port,
        };

        Self {
            model_dir: lookup("MODEL_DIR").map(PathBuf::from).unwrap_or(defaults.model_dir),
            model_file: lookup("MODEL_FILE").unwrap_or(defaults.model_file),
            scaler_file: lookup("SCALER_FILE").unwrap_or(defaults.scaler_file),
            port,
        }
    }

    /// Config pointing at a specific artifact directory, default file names.
    pub fn with_model_dir(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Self::default()
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(&self.model_file)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.model_dir.join(&self.scaler_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.model_path(), PathBuf::from("./model.json"));
        assert_eq!(config.scaler_path(), PathBuf::from("./scaler.json"));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("MODEL_DIR", "/opt/crops"),
            ("MODEL_FILE", "forest.json"),
            ("PORT", "8080"),
        ]));
        assert_eq!(config.model_path(), PathBuf::from("/opt/crops/forest.json"));
        assert_eq!(config.scaler_path(), PathBuf::from("/opt/crops/scaler.json"));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = ServerConfig::from_lookup(lookup_from(&[("PORT", "http")]));
        assert_eq!(config.port, DEFAULT_PORT);
    }
}
