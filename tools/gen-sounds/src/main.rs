//! gen-sounds - render the built-in sound catalogue
//!
//! Writes one mono 16-bit 44.1kHz WAV file per catalogue entry into the output
//! directory, optionally with a `soundpack.json` manifest for the player app.

use std::path::PathBuf;

use anyhow::{Context, Result};
use boom_synth::pack::{MANIFEST_FILE, SoundPack};
use boom_synth::{RenderOptions, catalogue, render_catalogue, write_sound};
use clap::Parser;

const PACK_ID: &str = "synth-basics-v1";
const PACK_NAME: &str = "Synth Basics";
const PACK_VERSION: u32 = 1;

#[derive(Parser)]
#[command(name = "gen-sounds")]
#[command(about = "Render procedural drum and note samples to WAV")]
#[command(version)]
struct Cli {
    /// Output directory (created if missing)
    #[arg(short, long, default_value = ".")]
    outdir: PathBuf,

    /// Seed for noise voices; omit for fresh noise every run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Also write a soundpack.json manifest
    #[arg(short, long)]
    manifest: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    std::fs::create_dir_all(&cli.outdir)
        .with_context(|| format!("Failed to create output directory {:?}", cli.outdir))?;

    let entries = catalogue();
    let options = RenderOptions { seed: cli.seed };
    tracing::debug!("Rendering {} sounds with {:?}", entries.len(), options);

    let mut written = 0;
    let mut failed = Vec::new();
    for (entry, rendered) in entries.iter().zip(render_catalogue(&entries, options)) {
        let path = cli.outdir.join(entry.file_name());
        let result = rendered
            .result
            .and_then(|buffer| write_sound(&buffer, &path));
        match result {
            Ok(()) => {
                tracing::debug!("Wrote {:?}", path);
                written += 1;
            }
            Err(e) => {
                tracing::error!("Failed to generate {}: {}", entry.id, e);
                failed.push(entry.id);
            }
        }
    }

    if cli.manifest {
        let pack = SoundPack::from_catalogue(&entries, PACK_ID, PACK_NAME, PACK_VERSION);
        let path = cli.outdir.join(MANIFEST_FILE);
        pack.write(&path)
            .with_context(|| format!("Failed to write manifest {:?}", path))?;
        tracing::info!("Wrote manifest {:?}", path);
    }

    tracing::info!("Generated {} wav files in {}", written, cli.outdir.display());

    if !failed.is_empty() {
        anyhow::bail!("{} sound(s) failed: {}", failed.len(), failed.join(", "));
    }

    Ok(())
}
