mod audio_input;
mod corpus;
mod error;
mod metadata;
mod wavs;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use corpus::CollisionPolicy;
use log::info;
use metadata::consolidate_metadata;
use wavs::{consolidate_audio, AudioOptions};

/// Rearranges the English part of ESD into an LJSpeech-style layout:
/// `metadata.csv` with emotion-tagged text plus a flat `wavs/` directory.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the ESD input dir
    #[arg(long = "esd_dir", visible_alias = "esd-dir")]
    esd_dir: PathBuf,

    /// Path to the output dir
    #[arg(long = "output_dir", visible_alias = "output-dir")]
    output_dir: PathBuf,

    /// Resample copied WAV files to this rate, e.g. 22050
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    sample_rate: Option<u32>,

    /// What to do when two files or utterance ids share a name
    #[arg(long, value_enum, default_value_t = CollisionPolicy::Warn)]
    on_collision: CollisionPolicy,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    info!(
        "Reformatting {} into {}",
        cli.esd_dir.display(),
        cli.output_dir.display()
    );

    consolidate_metadata(&cli.esd_dir, &cli.output_dir, cli.on_collision)
        .context("Failed to consolidate transcripts")?;

    let options = AudioOptions {
        collision: cli.on_collision,
        sample_rate: cli.sample_rate,
    };
    consolidate_audio(&cli.esd_dir, &cli.output_dir, options)
        .context("Failed to consolidate audio")?;

    Ok(())
}
