//! External analyzer detection.
//!
//! Locates the stream analyzer binary (ffmpeg) either from a configured
//! custom path or by searching `PATH`, and reports its availability for the
//! `check-tools` command.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sl_core::config::AnalyzerConfig;

/// Name of the analyzer binary searched for in `PATH`.
pub const DEFAULT_ANALYZER: &str = "ffmpeg";

/// A resolved stream analyzer binary.
#[derive(Debug, Clone)]
pub struct Analyzer {
    path: PathBuf,
}

/// Availability information for the analyzer, returned by [`Analyzer::check`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerInfo {
    /// Tool name.
    pub name: String,
    /// Whether the analyzer was found.
    pub available: bool,
    /// Version string (first line of `-version` output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

impl Analyzer {
    /// Wrap an already-resolved analyzer path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Locate the analyzer binary.
    ///
    /// If the config supplies a custom path **and** that path exists, it is
    /// used directly. Otherwise [`which::which`] searches `PATH`. Returns an
    /// [`sl_core::Error::Tool`] when the analyzer cannot be found either way.
    pub fn locate(config: &AnalyzerConfig) -> sl_core::Result<Self> {
        let resolved = if let Some(p) = config.path.as_deref() {
            if p.exists() {
                Some(p.to_path_buf())
            } else {
                // Custom path does not exist; fall back to PATH.
                which::which(DEFAULT_ANALYZER).ok()
            }
        } else {
            which::which(DEFAULT_ANALYZER).ok()
        };

        resolved.map(Self::new).ok_or_else(|| sl_core::Error::Tool {
            tool: DEFAULT_ANALYZER.to_string(),
            message: format!("{DEFAULT_ANALYZER} not found; is it installed and in PATH?"),
        })
    }

    /// Resolved path to the analyzer executable.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Executable file name, for diagnostics and error messages.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }

    /// Run `<analyzer> -version` and return the first line of stdout.
    pub fn version(&self) -> Option<String> {
        let output = std::process::Command::new(&self.path)
            .arg("-version")
            .output()
            .ok()?;

        if !output.status.success() {
            return None;
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .map(|s| s.to_string())
    }

    /// Check analyzer availability without failing.
    pub fn check(config: &AnalyzerConfig) -> AnalyzerInfo {
        match Self::locate(config) {
            Ok(analyzer) => AnalyzerInfo {
                name: DEFAULT_ANALYZER.to_string(),
                available: true,
                version: analyzer.version(),
                path: Some(analyzer.path.clone()),
            },
            Err(_) => AnalyzerInfo {
                name: DEFAULT_ANALYZER.to_string(),
                available: false,
                version: None,
                path: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn custom_path_used_when_it_exists() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "#!/bin/sh").unwrap();

        let config = AnalyzerConfig {
            path: Some(file.path().to_path_buf()),
        };
        let analyzer = Analyzer::locate(&config).unwrap();
        assert_eq!(analyzer.path(), file.path());
    }

    #[test]
    fn missing_custom_path_falls_back_to_path_lookup() {
        // We cannot guarantee ffmpeg is installed in CI, but the call itself
        // must not panic and must never resolve to the bogus path.
        let config = AnalyzerConfig {
            path: Some(PathBuf::from("/nonexistent/ffmpeg-xyz")),
        };
        if let Ok(analyzer) = Analyzer::locate(&config) {
            assert_ne!(analyzer.path(), Path::new("/nonexistent/ffmpeg-xyz"));
        }
    }

    #[test]
    fn check_reports_tool_name() {
        let info = Analyzer::check(&AnalyzerConfig::default());
        assert_eq!(info.name, DEFAULT_ANALYZER);
        if !info.available {
            assert!(info.path.is_none());
            assert!(info.version.is_none());
        }
    }

    #[test]
    fn name_is_executable_file_name() {
        let analyzer = Analyzer::new(PathBuf::from("/usr/local/bin/ffmpeg"));
        assert_eq!(analyzer.name(), "ffmpeg");
    }

    #[test]
    fn version_of_non_executable_is_none() {
        let analyzer = Analyzer::new(PathBuf::from("/nonexistent/ffmpeg-xyz"));
        assert!(analyzer.version().is_none());
    }

    #[test]
    fn analyzer_info_serialization() {
        let info = AnalyzerInfo {
            name: DEFAULT_ANALYZER.to_string(),
            available: true,
            version: Some("ffmpeg version 6.1".into()),
            path: Some(PathBuf::from("/usr/bin/ffmpeg")),
        };
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("ffmpeg"));
        let back: AnalyzerInfo = serde_json::from_str(&json).unwrap();
        assert!(back.available);
    }
}
