// Jazz pattern MIDI converter -- CLI entry point.
//
// Reads the semicolon-separated pattern table and writes one MIDI file per
// pattern plus a combined file with every pattern back to back.
//
// Usage:
//   cargo run -p jazzpatt_midi -- [--input JazzPatt.csv] [--output-dir .]
//     [--combined JazzPatterns.midi] [--root 60] [--config render.json]
//
// With no arguments it reads JazzPatt.csv from the working directory and
// writes there. Set RUST_LOG=debug for a line per pattern.

use anyhow::Context;
use clap::Parser;
use jazzpatt_midi::batch::{
    BatchConfig, DEFAULT_COMBINED, DEFAULT_INPUT, prepare_output_dir, run_batch,
};
use jazzpatt_midi::pattern::DEFAULT_ROOT;
use jazzpatt_midi::render::RenderConfig;
use std::path::PathBuf;

/// Render jazz interval patterns as swing-phrased MIDI files.
#[derive(Parser, Debug)]
#[command(name = "jazzpatt2midi")]
#[command(about = "Convert a table of interval patterns to expressive MIDI files")]
struct Args {
    /// Semicolon-separated pattern table (intervals;id;instances)
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Directory for the generated files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// File name of the combined file
    #[arg(long, default_value = DEFAULT_COMBINED)]
    combined: String,

    /// MIDI pitch of each pattern's first note
    #[arg(long, default_value_t = DEFAULT_ROOT, allow_negative_numbers = true)]
    root: i32,

    /// JSON file overriding render timing, velocities and controller values
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let render = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("loading render config {}", path.display()))?,
        None => RenderConfig::default(),
    };

    let config = BatchConfig {
        input: args.input,
        output_dir: args.output_dir,
        combined_name: args.combined,
        root: args.root,
        render,
    };

    prepare_output_dir(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;
    let summary = run_batch(&config)
        .with_context(|| format!("converting {}", config.input.display()))?;

    log::info!(
        "Done: {} pattern files, combined file {}",
        summary.pattern_files.len(),
        summary.combined_file.display()
    );
    Ok(())
}
