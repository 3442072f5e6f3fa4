use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vqmatch::io::{save_rgb_image, ImageDirSource};
use vqmatch::{
    retrieve_cached, select_window, DetectionCache, Proposal, ReferenceConfig, RetrievalConfig,
    VisualCrop,
};

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "vqmatch CLI (cached visual-query retrieval)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Print the selected search window and exit without reading frames.
    #[arg(long)]
    window_only: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RetrievalConfigJson {
    recency_factor: f64,
    subsampling_factor: f64,
    context_pad: u32,
    reference_size: u32,
    pad_value: u8,
}

impl Default for RetrievalConfigJson {
    fn default() -> Self {
        let cfg = RetrievalConfig::default();
        Self {
            recency_factor: cfg.recency_factor,
            subsampling_factor: cfg.subsampling_factor,
            context_pad: cfg.reference.context_pad,
            reference_size: cfg.reference.size,
            pad_value: cfg.reference.pad_value,
        }
    }
}

impl From<&RetrievalConfigJson> for RetrievalConfig {
    fn from(value: &RetrievalConfigJson) -> Self {
        Self {
            recency_factor: value.recency_factor,
            subsampling_factor: value.subsampling_factor,
            reference: ReferenceConfig {
                context_pad: value.context_pad,
                size: value.reference_size,
                pad_value: value.pad_value,
            },
            ..RetrievalConfig::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct Config {
    frames_dir: PathBuf,
    cache_path: PathBuf,
    #[serde(default)]
    output_path: Option<PathBuf>,
    #[serde(default)]
    reference_path: Option<PathBuf>,
    query_frame: usize,
    #[serde(default = "default_topk")]
    topk: usize,
    visual_crop: VisualCrop,
    #[serde(default)]
    retrieval: RetrievalConfigJson,
}

fn default_topk() -> usize {
    1
}

#[derive(Debug, Serialize)]
struct ProposalRecord {
    frame_number: usize,
    x1: i64,
    y1: i64,
    x2: i64,
    y2: i64,
    score: f32,
}

impl From<Proposal> for ProposalRecord {
    fn from(value: Proposal) -> Self {
        Self {
            frame_number: value.bbox.frame_number,
            x1: value.bbox.x1,
            y1: value.bbox.y1,
            x2: value.bbox.x2,
            y2: value.bbox.y2,
            score: value.score,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    window: Vec<usize>,
    best_per_frame: Vec<Option<ProposalRecord>>,
    topk: Vec<ProposalRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("vqmatch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.topk == 0 {
        return Err("topk must be at least 1".into());
    }
    let retrieval_cfg = RetrievalConfig::from(&config.retrieval);

    if cli.window_only {
        let window = select_window(config.query_frame, retrieval_cfg.window_params())?;
        println!("{}", serde_json::to_string(window.as_slice())?);
        return Ok(());
    }

    let cache_text = fs::read_to_string(&config.cache_path)?;
    let cache: DetectionCache = serde_json::from_str(&cache_text)?;
    let mut source = ImageDirSource::open(&config.frames_dir)?;

    let result = retrieve_cached(
        &mut source,
        &config.visual_crop,
        config.query_frame,
        &cache,
        &retrieval_cfg,
    )?;

    if let Some(path) = &config.reference_path {
        save_rgb_image(result.reference.image(), path)?;
    }

    let output = Output {
        window: result.window.as_slice().to_vec(),
        best_per_frame: result
            .best_per_frame()
            .into_iter()
            .map(|best| best.map(ProposalRecord::from))
            .collect(),
        topk: result
            .top_k(config.topk)
            .into_iter()
            .map(ProposalRecord::from)
            .collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
