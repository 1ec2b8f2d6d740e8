mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

use sl_core::{CameraSource, Config, VideoConfig};
use sl_probe::analyzer::DEFAULT_ANALYZER;
use sl_probe::{Analyzer, CodecReport, StreamProber};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "streamlens=trace,sl_probe=trace,sl_core=debug".to_string()
        } else {
            "streamlens=info,sl_probe=info,sl_core=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Probe {
            camera,
            source,
            json,
        } => {
            // Create tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(probe_sources(cli.config.as_deref(), camera, source, json))
        }
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("streamlens {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// One probed camera with its resulting codec report.
#[derive(serde::Serialize)]
struct ProbeOutcome {
    camera: String,
    codecs: CodecReport,
}

async fn probe_sources(
    config_path: Option<&std::path::Path>,
    camera: Option<String>,
    source: Option<String>,
    json: bool,
) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let analyzer = Analyzer::locate(&config.analyzer)?;

    let targets: Vec<CameraSource> = if let Some(source) = source {
        vec![CameraSource {
            name: "adhoc".into(),
            video: VideoConfig {
                source,
                sub_source: None,
            },
        }]
    } else if let Some(name) = camera {
        let camera = config
            .camera(&name)
            .ok_or_else(|| sl_core::Error::not_found("camera", &name))?;
        vec![camera.clone()]
    } else {
        if config.cameras.is_empty() {
            anyhow::bail!("no cameras configured; add cameras to the config or use --source");
        }
        config.cameras.clone()
    };

    tracing::info!("Probing {} camera source(s)", targets.len());

    let mut outcomes = Vec::with_capacity(targets.len());
    for target in targets {
        let name = target.name.clone();
        let prober = StreamProber::new(analyzer.clone(), target);
        let codecs = prober.probe().await?;
        outcomes.push(ProbeOutcome {
            camera: name,
            codecs,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        for outcome in &outcomes {
            print_outcome(outcome);
        }
    }

    Ok(())
}

fn print_outcome(outcome: &ProbeOutcome) {
    let codecs = &outcome.codecs;

    println!("{}:", outcome.camera);
    if codecs.timed_out {
        println!("  probe timed out");
    }
    if codecs.video_codec().is_some() {
        println!("  video: {}", codecs.video.join(", "));
    } else {
        println!("  video: none detected");
    }
    if codecs.audio_codec().is_some() {
        println!("  audio: {}", codecs.audio.join(", "));
    } else {
        println!("  audio: none detected");
    }
}

fn check_tools(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = Config::load_or_default(config_path);

    println!("Checking external tools...\n");

    let info = Analyzer::check(&config.analyzer);
    let status = if info.available { "✓" } else { "✗" };

    print!("{} {}", status, info.name);
    if let Some(ref version) = info.version {
        print!(" ({})", version);
    }
    if let Some(ref path) = info.path {
        print!(" - {}", path.display());
    }
    println!();

    println!();
    if info.available {
        println!("All required tools are available!");
    } else {
        println!(
            "{} is missing. Install it to enable stream probing.",
            info.name
        );
    }

    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = Config::load(p)?;
            println!("✓ Configuration is valid");
            match config.analyzer.path {
                Some(ref path) => println!("  Analyzer: {}", path.display()),
                None => println!("  Analyzer: {DEFAULT_ANALYZER} (PATH lookup)"),
            }
            println!("  Cameras: {}", config.cameras.len());
            for camera in &config.cameras {
                println!("    {} ({})", camera.name, camera.video.sub_source());
            }
            for warning in config.validate() {
                println!("  warning: {warning}");
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = Config::default();
            println!("Default config:");
            println!("  Cameras: {}", config.cameras.len());
        }
    }

    Ok(())
}
