//! The stream probe orchestrator.
//!
//! A [`StreamProber`] owns the probe lifecycle for one camera source: it
//! launches the analyzer with fixed analysis flags, scans stderr for codec
//! descriptor lines, and races process exit against a fixed time budget.
//! A probe that times out kills the analyzer but still resolves through the
//! process's own exit, so every cycle completes exactly once.

use std::process::Stdio;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use sl_core::{CameraSource, Error, Result};

use crate::analyzer::Analyzer;
use crate::report::CodecReport;

/// Maximum duration of one probe cycle before the analyzer is killed.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Fixed analysis flags passed ahead of the source arguments.
///
/// The analyzer is told to probe only 5000 bytes and skip duration
/// estimation, trading exhaustive stream analysis for fast codec detection.
const PROBE_ARGS: &[&str] = &[
    "-hide_banner",
    "-loglevel",
    "info",
    "-analyzeduration",
    "0",
    "-probesize",
    "5000",
];

/// Probes a camera source for its stream codecs.
///
/// One prober is constructed per camera and persists for the camera's
/// lifetime. The codec report is created empty at construction and mutated
/// in place across probe cycles; readers take snapshots via
/// [`StreamProber::codecs`].
pub struct StreamProber {
    analyzer: Analyzer,
    camera: RwLock<CameraSource>,
    report: RwLock<CodecReport>,
    probe_gate: tokio::sync::Mutex<()>,
}

impl StreamProber {
    /// Bind a prober to the given camera source and resolved analyzer.
    ///
    /// No process is launched until [`probe`](Self::probe) is called.
    pub fn new(analyzer: Analyzer, camera: CameraSource) -> Self {
        Self {
            analyzer,
            camera: RwLock::new(camera),
            report: RwLock::new(CodecReport::default()),
            probe_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// A snapshot of the current codec report.
    pub fn codecs(&self) -> CodecReport {
        self.report.read().clone()
    }

    /// Replace the held camera source, re-probing if the sub-source changed.
    ///
    /// Unrelated configuration changes (name, credentials carried in the
    /// source string under the same sub-source identifier) do not trigger a
    /// redundant re-analysis. When a probe is triggered, the call awaits its
    /// completion.
    pub async fn reconfigure(&self, camera: CameraSource) -> Result<()> {
        let changed = {
            let mut held = self.camera.write();
            let changed = held.video.sub_source() != camera.video.sub_source();
            *held = camera;
            changed
        };

        if changed {
            tracing::info!(camera = %self.camera_name(), "video source changed, probing stream");
            self.probe().await?;
        }

        Ok(())
    }

    /// Run one probe cycle and resolve with a snapshot of the codec report.
    ///
    /// The analyzer's stderr is scanned line by line for `Audio: ` and
    /// `Video: ` descriptor lines until the process exits. If the process
    /// outlives [`PROBE_TIMEOUT`], `timed_out` is flagged, the process is
    /// killed, and the cycle still resolves through the forced exit. A
    /// non-zero exit status or unrecognized output is not an error; the
    /// report resolves with whatever descriptors were captured.
    ///
    /// Overlapping calls on the same prober are serialized.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tool`] when the analyzer cannot be spawned; the
    /// report is left untouched in that case.
    pub async fn probe(&self) -> Result<CodecReport> {
        let _gate = self.probe_gate.lock().await;

        let (name, source_args) = {
            let camera = self.camera.read();
            (camera.name.clone(), camera.video.source_args())
        };

        tracing::debug!(
            camera = %name,
            analyzer = %self.analyzer.path().display(),
            "probing stream"
        );

        let mut cmd = Command::new(self.analyzer.path());
        cmd.args(PROBE_ARGS)
            .args(&source_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| Error::Tool {
            tool: self.analyzer.name(),
            message: format!("failed to spawn: {e}"),
        })?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::Probe("stderr pipe not captured".into()))?;
        let mut lines = BufReader::new(stderr).lines();

        // The cycle is underway; `probed` flips back to true once the
        // process exit is observed.
        self.report.write().probed = false;

        let deadline = tokio::time::sleep(PROBE_TIMEOUT);
        tokio::pin!(deadline);
        let mut timed_out = false;
        let mut stderr_open = true;

        // Biased ordering: the deadline is polled first so an output flood
        // cannot starve the budget, and pending lines are drained before the
        // exit is observed so nothing emitted by a fast-exiting process is
        // lost. A completed sleep must not be polled again, hence the
        // precondition on the deadline branch.
        let status = loop {
            tokio::select! {
                biased;
                _ = &mut deadline, if !timed_out => {
                    timed_out = true;
                    tracing::warn!(camera = %name, "cannot determine stream codecs, probe timed out");
                    self.report.write().timed_out = true;
                    if let Err(e) = child.start_kill() {
                        tracing::debug!(camera = %name, "failed to kill analyzer: {e}");
                    }
                }
                line = lines.next_line(), if stderr_open => match line {
                    Ok(Some(line)) => self.report.write().apply_line(&line),
                    Ok(None) => stderr_open = false,
                    Err(e) => {
                        tracing::debug!(camera = %name, "stderr read error: {e}");
                        stderr_open = false;
                    }
                },
                status = child.wait() => break status?,
            }
        };

        let report = {
            let mut report = self.report.write();
            report.probed = true;
            if !timed_out {
                report.timed_out = false;
            }
            report.clone()
        };

        tracing::debug!(
            camera = %name,
            status = %status,
            audio = ?report.audio,
            video = ?report.video,
            "probe finished"
        );

        Ok(report)
    }

    fn camera_name(&self) -> String {
        self.camera.read().name.clone()
    }
}
