//! sl-core: shared types, errors, and configuration.
//!
//! This crate is the foundational dependency for the other sl-* crates,
//! providing the unified error type, the camera source descriptor, and
//! application configuration.

pub mod config;
pub mod error;
pub mod source;

// Re-export the most commonly used items at the crate root.
pub use config::{AnalyzerConfig, Config};
pub use error::{Error, Result};
pub use source::{CameraSource, VideoConfig};
