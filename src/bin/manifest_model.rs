//! Model manifest utility.
//!
//! Writes `manifest.json` next to a model file, recording the SHA-256 digest
//! of every model JSON found in the directory. The dashboard checks the
//! digest at load time.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin manifest_model -- [<model_dir_or_file>]
//! ```
//!
//! Defaults to the directory of the configured model path.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};

use glucodash::adapters::logistic::manifest::{ModelManifest, MANIFEST_FILE};
use glucodash::config::AppConfig;

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let target = match args.next() {
        Some(arg) if arg == "-h" || arg == "--help" => {
            bail!("Usage: manifest_model [<model_dir_or_file>]")
        }
        Some(arg) => PathBuf::from(arg),
        None => AppConfig::from_env().model_path,
    };

    let (model_dir, candidates) = if target.is_file() {
        let name = target
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("Model path has no file name"))?
            .to_string();
        let dir = target
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        (dir, vec![name])
    } else {
        let dir = target;
        let files: Vec<String> = std::fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(".json") && name != MANIFEST_FILE)
            .collect();
        (dir, files)
    };

    if candidates.is_empty() {
        bail!("No model JSON found in {model_dir:?}");
    }

    let manifest = ModelManifest::for_files(&model_dir, &candidates)?;
    let manifest_path = model_dir.join(MANIFEST_FILE);
    manifest.write(&manifest_path)?;

    for (file, digest) in &manifest.files {
        println!("{digest}  {file}");
    }
    println!("Wrote {}", manifest_path.display());
    Ok(())
}
