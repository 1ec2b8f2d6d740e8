//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! analyzer settings plus the list of camera sources. Every section defaults
//! sensibly so a completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::source::CameraSource;
use crate::Error;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analyzer: AnalyzerConfig,
    pub cameras: Vec<CameraSource>,
}

/// Settings for the external stream analyzer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Custom path to the analyzer binary. When unset (or missing on disk)
    /// the binary is searched for in `PATH`.
    pub path: Option<PathBuf>,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    ///
    /// This is intentionally string-based so the caller can read the file
    /// however it sees fit.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file, failing on read or parse errors.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(ref path) = self.analyzer.path {
            if !path.exists() {
                warnings.push(format!(
                    "analyzer.path {} does not exist; falling back to PATH lookup",
                    path.display()
                ));
            }
        }

        let mut seen = HashSet::new();
        for (i, camera) in self.cameras.iter().enumerate() {
            if camera.name.is_empty() {
                warnings.push(format!("cameras[{i}].name is empty"));
            } else if !seen.insert(camera.name.as_str()) {
                warnings.push(format!(
                    "cameras[{i}].name '{}' duplicates an earlier camera",
                    camera.name
                ));
            }
            if camera.video.source.is_empty() {
                warnings.push(format!("cameras[{i}].video.source is empty"));
            }
        }

        warnings
    }

    /// Look up a camera source by name.
    pub fn camera(&self, name: &str) -> Option<&CameraSource> {
        self.cameras.iter().find(|c| c.name == name)
    }
}
