use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use stagecraft_core::{DefaultAssetLoader, RasterSurface, RecordingSurface};
use stagecraft_pipeline::load_document;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the stage document (JSON)
    #[arg(value_name = "DOCUMENT")]
    document: PathBuf,

    /// Number of frames to render
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Directory for PNG frames; omit to render without rasterizing
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Override the document's frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// Print per-frame statistics as JSON lines on stdout
    #[arg(long)]
    stats: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

fn init_logging(level: LogLevel, format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level.into()).into())
        .from_env_lossy();

    let subscriber_builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Json => subscriber_builder.json().init(),
        LogFormat::Pretty => subscriber_builder.pretty().init(),
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let loader = DefaultAssetLoader;
    let path = cli.document.to_string_lossy().into_owned();
    let mut stage = load_document(&path, &loader)?;
    if let Some(fps) = cli.fps {
        stage.director.config.fps = fps;
        stage.director.config.validate()?;
    }

    info!("Document: {:?}", cli.document);
    info!(
        "Rendering {} frames at {} fps ({}x{})",
        cli.frames, stage.director.config.fps, stage.director.config.width, stage.director.config.height
    );

    match &cli.out {
        Some(dir) => {
            fs::create_dir_all(dir).with_context(|| format!("cannot create {:?}", dir))?;
            let mut surface = RasterSurface::new(stage.director.config.width, stage.director.config.height)?;
            let loaded = stage.load_images(&mut surface, &loader);
            info!("Loaded {}/{} images", loaded, stage.images.len());
            for _ in 0..cli.frames {
                let stats = stage.step(&mut surface)?;
                let file = dir.join(format!("frame_{:05}.png", stats.frame));
                surface.save_png(&file)?;
                if cli.stats {
                    println!("{}", serde_json::to_string(&stats)?);
                }
            }
            info!("Frames written to {:?}", dir);
        }
        None => {
            let mut surface = RecordingSurface::new();
            for _ in 0..cli.frames {
                surface.clear_commands();
                let stats = stage.step(&mut surface)?;
                if cli.stats {
                    println!("{}", serde_json::to_string(&stats)?);
                }
            }
        }
    }

    info!("Render complete.");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_format);

    if let Err(e) = run(cli) {
        error!("Render failed: {:#}", e);
        std::process::exit(1);
    }
}
