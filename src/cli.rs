use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "streamlens")]
#[command(author, version, about = "Stream codec probing for live camera sources")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe camera sources and report detected stream codecs
    Probe {
        /// Probe only the named camera from the config
        #[arg(long)]
        camera: Option<String>,

        /// Probe an ad-hoc analyzer source string instead of configured cameras
        #[arg(long, conflicts_with = "camera", allow_hyphen_values = true)]
        source: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the stream analyzer is available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
