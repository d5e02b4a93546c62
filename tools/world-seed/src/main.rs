//! Seed generator for the file storage engine.
//!
//! Writes a starter world in the seed layout: two villages with modest
//! stockpiles and a farm upgrade already queued for the capital. The file
//! engine upgrades the layout to the canonical one on first save.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use serde_json::{json, Value};

/// Write a starter world file for the Imperium file engine.
#[derive(Parser, Debug)]
#[command(name = "world-seed")]
struct Args {
    /// Destination of the seed file.
    #[arg(long, default_value = "data/imperium_state.json")]
    path: PathBuf,

    /// Overwrite the file if it already exists.
    #[arg(long)]
    force: bool,
}

fn seed_state() -> Value {
    json!({
        "villages": {
            "1": {"id": 1, "name": "Capitale"},
            "2": {"id": 2, "name": "Avant-Poste"},
        },
        "resources": {
            "1": {"wood": 100, "clay": 80, "iron": 90, "crop": 75},
            "2": {"wood": 60, "clay": 40, "iron": 50, "crop": 45},
        },
        "buildQueues": {
            "1": [{
                "building": "farm",
                "level": 2,
                "queuedAt": Utc::now().to_rfc3339(),
            }],
            "2": [],
        },
    })
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (pass --force to overwrite)",
            args.path.display()
        );
    }
    if let Some(parent) = args.path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let state = seed_state();
    fs::write(&args.path, serde_json::to_string_pretty(&state)?)
        .with_context(|| format!("writing {}", args.path.display()))?;

    let villages = state["villages"].as_object().map_or(0, |m| m.len());
    println!("seed written to {}", args.path.display());
    println!("{villages} villages, build queues initialized");
    Ok(())
}
