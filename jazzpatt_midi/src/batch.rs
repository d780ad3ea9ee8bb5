// Batch driver: pattern table -> one MIDI file per pattern + a combined file.
//
// Rows are processed in table order. Each row is expanded from the root pitch,
// rendered once into its own track and written straight away; the same
// events are then appended to the combined track, which is written after the
// last row. Because every rendered pattern ends on a bar line followed by a
// bar of rest, patterns in the combined file each start on a fresh bar.
//
// The first error ends the run. Per-pattern files written before it are left
// in place and the combined file is not written.

use crate::error::Result;
use crate::event::Track;
use crate::midi::write_midi;
use crate::pattern::{DEFAULT_ROOT, intervals_to_pitches};
use crate::render::{RenderConfig, render_pattern};
use crate::table::{PatternRow, open_pattern_file};
use log::{debug, info};
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT: &str = "JazzPatt.csv";
pub const DEFAULT_COMBINED: &str = "JazzPatterns.midi";

/// Inputs and outputs for one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input: PathBuf,
    /// Directory receiving the per-pattern files and the combined file.
    pub output_dir: PathBuf,
    /// File name of the combined file inside `output_dir`.
    pub combined_name: String,
    pub root: i32,
    pub render: RenderConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from("."),
            combined_name: DEFAULT_COMBINED.to_string(),
            root: DEFAULT_ROOT,
            render: RenderConfig::default(),
        }
    }
}

/// Result of a completed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub pattern_files: Vec<PathBuf>,
    pub combined_file: PathBuf,
    pub combined_ticks: u64,
}

/// File name for a single pattern: `pattern_{index}_{instances}_{id}.mid`.
pub fn pattern_file_name(row: &PatternRow) -> String {
    format!(
        "pattern_{}_{}_{}.mid",
        row.index, row.instances, row.pattern_id
    )
}

/// Read the table named in `config` and write all output files.
pub fn run_batch(config: &BatchConfig) -> Result<BatchSummary> {
    info!("Reading patterns from {}", config.input.display());
    let rows = open_pattern_file(&config.input)?;
    write_patterns(rows, config)
}

/// Render and write rows as they arrive, stopping at the first error.
pub fn write_patterns<I>(rows: I, config: &BatchConfig) -> Result<BatchSummary>
where
    I: IntoIterator<Item = Result<PatternRow>>,
{
    config.render.validate()?;
    let mut combined = Track::new();
    let mut pattern_files = Vec::new();

    for row in rows {
        let row = row?;
        let pitches = intervals_to_pitches(&row.intervals, config.root);
        let mut track = Track::new();
        let summary = render_pattern(&mut track, &pitches, &config.render);

        let path = config.output_dir.join(pattern_file_name(&row));
        write_midi(&track, &path)?;
        debug!(
            "Pattern {} ({}): {} notes, {} top notes, {} ticks -> {}",
            row.index,
            row.pattern_id,
            summary.notes,
            summary.top_notes,
            summary.total_ticks,
            path.display()
        );

        combined.extend(&track);
        pattern_files.push(path);
    }

    let combined_file = config.output_dir.join(&config.combined_name);
    write_midi(&combined, &combined_file)?;
    let combined_ticks = combined.total_ticks();
    info!(
        "Wrote {} pattern files and {} ({} bars)",
        pattern_files.len(),
        combined_file.display(),
        combined_ticks / config.render.bar_ticks as u64
    );

    Ok(BatchSummary {
        pattern_files,
        combined_file,
        combined_ticks,
    })
}

/// Ensure the output directory exists.
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: usize, intervals: Vec<i32>, id: &str, instances: &str) -> PatternRow {
        PatternRow {
            index,
            intervals,
            pattern_id: id.to_string(),
            instances: instances.to_string(),
        }
    }

    #[test]
    fn test_pattern_file_name() {
        assert_eq!(
            pattern_file_name(&row(3, vec![1], "p42", "17")),
            "pattern_3_17_p42.mid"
        );
    }

    #[test]
    fn test_default_config_names() {
        let config = BatchConfig::default();
        assert_eq!(config.input, PathBuf::from("JazzPatt.csv"));
        assert_eq!(config.combined_name, "JazzPatterns.midi");
        assert_eq!(config.root, 60);
    }

    #[test]
    fn test_write_patterns_combined_is_concatenation() {
        let dir = tempfile::tempdir().unwrap();
        let config = BatchConfig {
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let rows = vec![row(1, vec![2, 2, -1], "a", "3"), row(2, vec![-5, 7], "b", "1")];

        let summary = write_patterns(rows.into_iter().map(Ok), &config).unwrap();
        assert_eq!(summary.pattern_files.len(), 2);
        assert!(summary.pattern_files.iter().all(|p| p.exists()));

        let first = crate::midi::read_midi(&summary.pattern_files[0]).unwrap();
        let second = crate::midi::read_midi(&summary.pattern_files[1]).unwrap();
        let combined = crate::midi::read_midi(&summary.combined_file).unwrap();

        let mut expected = first;
        expected.extend(&second);
        assert_eq!(combined, expected);
        assert_eq!(summary.combined_ticks, combined.total_ticks());
        assert_eq!(summary.combined_ticks % 1920, 0);
    }

    #[test]
    fn test_range_error_stops_before_combined_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = BatchConfig {
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let rows = vec![row(1, vec![1], "ok", "1"), row(2, vec![90], "high", "1")];

        assert!(write_patterns(rows.into_iter().map(Ok), &config).is_err());
        assert!(dir.path().join("pattern_1_1_ok.mid").exists());
        assert!(!dir.path().join("pattern_2_1_high.mid").exists());
        assert!(!dir.path().join("JazzPatterns.midi").exists());
    }
}
