use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::PathBuf;
use sticker_core::{AnimationVariant, Caption, OverlayConfig, StickerOverlay, TtfOutlineProvider};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input sticker (.tgs or Lottie .json)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output sticker path
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// TrueType/OpenType font used for the caption
    #[arg(long, value_name = "FONT")]
    font: PathBuf,

    /// Top line
    #[arg(long)]
    top: Option<String>,

    /// Middle line
    #[arg(long)]
    middle: Option<String>,

    /// Bottom line
    #[arg(long)]
    bottom: Option<String>,

    /// Free-form message, wrapped over the lines
    #[arg(long, conflicts_with_all = ["top", "middle", "bottom"])]
    message: Option<String>,

    /// Caption animation; random when omitted
    #[arg(long, value_enum)]
    variant: Option<Variant>,

    /// Seed for the animation randomness
    #[arg(long)]
    seed: Option<u64>,

    /// JSON overlay configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum glyph size, overrides the configuration
    #[arg(long)]
    font_size: Option<f64>,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Variant {
    Shake,
    SpringPullTop,
    SpringPullSide,
}

impl From<Variant> for AnimationVariant {
    fn from(v: Variant) -> Self {
        match v {
            Variant::Shake => AnimationVariant::Shake,
            Variant::SpringPullTop => AnimationVariant::SpringPullTop,
            Variant::SpringPullSide => AnimationVariant::SpringPullSide,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

fn init_logging(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(cli.log_level.to_string().parse()?)
        .from_env_lossy();

    let subscriber_builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match cli.log_format {
        LogFormat::Json => subscriber_builder.json().init(),
        LogFormat::Pretty => subscriber_builder.pretty().init(),
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<OverlayConfig> {
    let mut config = match &cli.config {
        Some(path) => OverlayConfig::from_file(path)
            .with_context(|| format!("loading config {:?}", path))?,
        None => OverlayConfig::default(),
    };
    if let Some(size) = cli.font_size {
        config.font_size = size;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    let caption = match &cli.message {
        Some(message) => Caption::from_message(message, config.wrap_width),
        None => Caption::new(cli.top.clone(), cli.middle.clone(), cli.bottom.clone()),
    };
    if caption.is_empty() {
        bail!("nothing to write: pass --top, --middle, --bottom or --message");
    }

    let output_path = cli.output.clone().unwrap_or_else(|| {
        let mut p = cli.input.clone();
        p.set_file_name(format!(
            "{}.captioned.tgs",
            cli.input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("sticker")
        ));
        p
    });

    info!("Input: {:?}", cli.input);
    info!("Output: {:?}", output_path);

    let font = TtfOutlineProvider::from_file(&cli.font)
        .with_context(|| format!("loading font {:?}", cli.font))?;
    let overlay = StickerOverlay::new(font, config)?;

    let input = fs::read(&cli.input).with_context(|| format!("reading {:?}", cli.input))?;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let bytes = overlay.overlay(&input, &caption, cli.variant.map(Into::into), &mut rng)?;
    fs::write(&output_path, &bytes).with_context(|| format!("writing {:?}", output_path))?;
    info!(bytes = bytes.len(), "Sticker written.");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging(&cli) {
        eprintln!("Invalid log level: {}", e);
        std::process::exit(2);
    }

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
