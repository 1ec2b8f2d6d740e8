//! Camera source descriptors consumed by the probe orchestrator.

use serde::{Deserialize, Serialize};

/// A single camera or media source to probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSource {
    /// Human-readable name, used only for diagnostics.
    pub name: String,
    /// Video stream configuration.
    pub video: VideoConfig,
}

/// Video stream settings for one camera source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Raw analyzer argument string (e.g. `-i rtsp://host/stream`).
    ///
    /// Tokenized on whitespace and appended verbatim to the analyzer's fixed
    /// flag set.
    pub source: String,
    /// Identifier distinguishing among streams of the same source (main vs.
    /// sub stream). Falls back to the source string when unset.
    pub sub_source: Option<String>,
}

impl VideoConfig {
    /// The effective sub-source identifier.
    ///
    /// Cameras without an explicit sub-source are identified by their source
    /// string, so a changed source is still detected on reconfiguration.
    pub fn sub_source(&self) -> &str {
        self.sub_source.as_deref().unwrap_or(&self.source)
    }

    /// The source string tokenized into analyzer arguments.
    ///
    /// Splitting is on runs of whitespace, so extra spacing between arguments
    /// is tolerated and an empty source yields no arguments.
    pub fn source_args(&self) -> Vec<String> {
        self.source.split_whitespace().map(str::to_string).collect()
    }
}
