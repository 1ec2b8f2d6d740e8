//! sl-probe: live stream codec probing via an external analyzer.
//!
//! A [`StreamProber`] launches the analyzer (ffmpeg) against a camera source,
//! scans its stderr for codec descriptor lines, and resolves with a
//! [`CodecReport`] within a fixed time budget.

pub mod analyzer;
pub mod prober;
pub mod report;

pub use analyzer::{Analyzer, AnalyzerInfo};
pub use prober::StreamProber;
pub use report::CodecReport;
