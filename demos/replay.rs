//! Replays a detections dump through the extrapolator and prints one JSON line
//! per track per frame.
//!
//! Dump format: one frame per line, `<frame_index>:<json array of detections>`,
//! e.g. `12:[{"id":3,"x":410.5,"y":220.0,"w":32.0,"h":18.0}]`. Frame indices
//! must increase; skipped indices are replayed as empty frames so idle tracks
//! age as they would on the live stream.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_derive::Serialize;
use trailcast::{Config, Detection, Extrapolating, Frame, LinearExtrapolator, Overlay, TrackPath};

#[derive(Parser)]
#[command(name = "replay", about = "Trail and linear path prediction over a detections dump")]
struct Cli {
    /// Detections dump
    input: PathBuf,

    /// JSON config, defaults are used for missing fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the configured history length
    #[arg(long)]
    max_history: Option<usize>,

    /// Overrides the configured prediction horizon
    #[arg(long)]
    horizon: Option<usize>,

    /// Emit integer pixel polylines instead of raw positions
    #[arg(long)]
    overlay: bool,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Record<'a> {
    Path {
        frame: u64,
        #[serde(flatten)]
        path: &'a TrackPath,
    },
    Overlay {
        frame: u64,
        #[serde(flatten)]
        overlay: Overlay,
    },
}

fn parse_line(line: &str) -> Result<(u64, Vec<Detection>)> {
    let (index, vector) = line.split_once(':').context("expected `<frame>:<json>`")?;

    let index = index
        .trim()
        .parse()
        .with_context(|| format!("bad frame index {:?}", index))?;
    let detections = serde_json::from_str(vector).context("bad detections json")?;

    Ok((index, detections))
}

/// Number of empty frames to replay before frame `index`
fn missing_frames(prev: Option<u64>, index: u64) -> Result<u64> {
    match prev {
        None => Ok(0),
        Some(prev) if index > prev => Ok(index - prev - 1),
        Some(prev) => anyhow::bail!("frame {} does not follow frame {}", index, prev),
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening config {}", path.display()))?;
            serde_json::from_reader(file).context("parsing config")?
        }
        None => Config::default(),
    };

    if let Some(max_history) = cli.max_history {
        config.max_history = max_history;
    }

    if let Some(horizon) = cli.horizon {
        config.future_horizon = horizon;
    }

    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let style = config.style;
    let mut extrapolator = LinearExtrapolator::new(config)?;

    let dets_file = std::fs::File::open(&cli.input)
        .with_context(|| format!("opening {}", cli.input.display()))?;
    let reader = std::io::BufReader::new(dets_file);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let src = cli.input.to_string_lossy();

    let mut prev = None;

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let at = || format!("line {}", lineno + 1);
        let (index, detections) = parse_line(line).with_context(at)?;
        let gap = missing_frames(prev, index).with_context(at)?;
        prev = Some(index);

        for _ in 0..gap {
            extrapolator.update(&Frame::default(), &src)?;
        }

        let output = extrapolator.update(&detections.into(), &src)?;

        for path in &output.paths {
            let record = if cli.overlay {
                Record::Overlay {
                    frame: index,
                    overlay: path.overlay(&style),
                }
            } else {
                Record::Path { frame: index, path }
            };

            serde_json::to_writer(&mut out, &record)?;
            writeln!(out)?;
        }
    }

    Ok(())
}
