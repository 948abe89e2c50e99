//! Chart export utility.
//!
//! Renders one of the fixed chart recipes against the configured dataset and
//! writes the chart specification as JSON, for plotting outside the terminal.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin export_chart -- <kind> [--feature <name>] [--out <file>]
//! ```
//!
//! `<kind>` is one of `summary`, `outcome`, `distribution`, `heatmap`, `box`
//! or `scatter` (or the long `dataset-summary` style names).

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use glucodash::adapters::CsvDatasetStore;
use glucodash::application::render_chart;
use glucodash::config::AppConfig;
use glucodash::domain::ChartParams;
use glucodash::ports::DatasetStore;
use glucodash::ChartKind;

struct Args {
    kind: ChartKind,
    feature: Option<String>,
    out: Option<PathBuf>,
}

fn usage() -> anyhow::Error {
    anyhow!("Usage: export_chart <kind> [--feature <name>] [--out <file>]")
}

fn parse_args() -> Result<Args> {
    let mut args = env::args().skip(1);
    let mut kind: Option<ChartKind> = None;
    let mut feature: Option<String> = None;
    let mut out: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--feature" => {
                feature = Some(args.next().ok_or_else(usage)?);
            }
            "--out" => {
                out = Some(PathBuf::from(args.next().ok_or_else(usage)?));
            }
            "-h" | "--help" => return Err(usage()),
            other => {
                if kind.is_some() {
                    return Err(usage());
                }
                kind = Some(
                    ChartKind::from_name(other)
                        .ok_or_else(|| anyhow!("Unknown chart kind: {other}"))?,
                );
            }
        }
    }

    Ok(Args {
        kind: kind.ok_or_else(usage)?,
        feature,
        out,
    })
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let config = AppConfig::from_env();

    if args.feature.is_some() && !args.kind.needs_feature() {
        bail!("{} does not take a feature", args.kind);
    }

    let dataset = CsvDatasetStore::new(&config.dataset_path)
        .load_dataset()
        .with_context(|| format!("Failed to load dataset from {:?}", config.dataset_path))?;

    let params = ChartParams {
        feature: args.feature,
    };
    let spec = render_chart(&dataset, args.kind, &params, &config.charts)?;
    let json = serde_json::to_string_pretty(&spec)?;

    match args.out {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("Failed to write {path:?}"))?;
            eprintln!("Wrote {} to {}", args.kind, path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
