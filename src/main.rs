use anyhow::{Context, Result};
use clap::Parser;
use dashframe::config::AppConfig;
use dashframe::display::{
    get_field_display_values, DataLinkResolver, FieldDisplayRequest, StaticTimeRange,
    TemplateReplacer,
};
use dashframe::frames::{parse_frames, AppendMode, CircularOptions, DataFrame, Frame};
use dashframe::stream::replay_into_circular;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

/// dashframe - Turn data frames into formatted dashboard display values
#[derive(Parser, Debug, Clone)]
#[command(name = "dashframe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file holding one frame or an array of frames
    #[arg(value_name = "FRAMES_FILE")]
    frames_file: PathBuf,

    /// Config file to use instead of the one in the user config directory
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Comma-separated reducers, e.g. "last,max"
    #[arg(long = "calcs", value_name = "IDS", value_delimiter = ',')]
    calcs: Option<Vec<String>>,

    /// Show every row instead of reduced values
    #[arg(long = "values")]
    values: bool,

    /// Maximum number of rows shown with --values
    #[arg(long = "limit", value_name = "N")]
    limit: Option<usize>,

    /// Replay frames through circular buffers of this size
    #[arg(long = "stream-capacity", value_name = "N")]
    stream_capacity: Option<usize>,

    /// Newest rows first when replaying through circular buffers
    #[arg(long = "stream-head")]
    stream_head: bool,

    /// Template variable for titles and links (e.g., -v host=web-1)
    #[arg(short = 'v', long = "var", value_name = "NAME=VALUE", value_parser = parse_variable)]
    vars: Vec<(String, String)>,

    /// Time range passed to data links as "FROM,TO"
    #[arg(long = "range", value_name = "FROM,TO", default_value = "now-6h,now")]
    range: String,

    /// Format times in UTC
    #[arg(long = "utc")]
    utc: bool,

    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,
}

/// Parse "NAME=VALUE" into a pair
fn parse_variable(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("Expected format: NAME=VALUE, got: {}", s)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting dashframe v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            AppConfig::default()
        }),
    };
    apply_cli_overrides(&mut config, &cli);

    let json = std::fs::read_to_string(&cli.frames_file)
        .with_context(|| format!("Failed to read {}", cli.frames_file.display()))?;
    let dtos = parse_frames(&json).context("Failed to parse frames")?;
    info!("Loaded {} frame(s) from {}", dtos.len(), cli.frames_file.display());

    let frames: Vec<Box<dyn Frame>> = match cli.stream_capacity {
        Some(_) => dtos
            .into_iter()
            .map(|dto| Box::new(replay_into_circular(dto, config.stream)) as Box<dyn Frame>)
            .collect(),
        None => dtos
            .into_iter()
            .map(|dto| Box::new(DataFrame::from_dto(dto)) as Box<dyn Frame>)
            .collect(),
    };
    let frame_refs: Vec<&dyn Frame> = frames.iter().map(|f| f.as_ref()).collect();

    let replacer = cli
        .vars
        .iter()
        .fold(TemplateReplacer::new(), |r, (name, value)| {
            r.with_variable(name.as_str(), value.as_str())
        });
    let (from, to) = cli
        .range
        .split_once(',')
        .with_context(|| format!("Expected --range FROM,TO, got: {}", cli.range))?;
    let linker = DataLinkResolver::new(replacer.clone(), Arc::new(StaticTimeRange::new(from, to)));

    let request = FieldDisplayRequest::new(&frame_refs, &config.display, &replacer, &linker)
        .with_utc(config.utc);
    let values = get_field_display_values(&request);
    info!("Produced {} display value(s)", values.len());

    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(calcs) = &cli.calcs {
        config.display.calcs = calcs.clone();
    }
    if cli.values {
        config.display.values = true;
    }
    if cli.limit.is_some() {
        config.display.limit = cli.limit;
    }
    if let Some(capacity) = cli.stream_capacity {
        let append = if cli.stream_head {
            AppendMode::Head
        } else {
            config.stream.append
        };
        config.stream = CircularOptions::new(capacity, append);
    }
    if cli.utc {
        config.utc = true;
    }
}
