// End-to-end tests for the table -> MIDI pipeline.
//
// Each test writes a pattern table into a temp directory, runs the batch
// exactly as the CLI does, and reads the produced files back with the
// decoder to check names, tick positions and bar alignment.

use jazzpatt_midi::Error;
use jazzpatt_midi::batch::{BatchConfig, run_batch};
use jazzpatt_midi::event::{Event, Track};
use jazzpatt_midi::midi::read_midi;
use jazzpatt_midi::pattern::intervals_to_pitches;
use jazzpatt_midi::render::{RenderConfig, render_to_track};
use std::path::Path;

const TABLE: &str = "\
intervals;pattern_id;instances
[2, 2, 1, -5];p1;31
[-1, -2, -2, 7, -3];p2;12
[];p3;4
[12, -12, 12];p4;2
";

fn config_for(dir: &Path, table: &str) -> BatchConfig {
    let input = dir.join("JazzPatt.csv");
    std::fs::write(&input, table).unwrap();
    BatchConfig {
        input,
        output_dir: dir.to_path_buf(),
        ..Default::default()
    }
}

#[test]
fn test_batch_writes_named_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), TABLE);
    let summary = run_batch(&config).unwrap();

    let names: Vec<String> = summary
        .pattern_files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "pattern_1_31_p1.mid",
            "pattern_2_12_p2.mid",
            "pattern_3_4_p3.mid",
            "pattern_4_2_p4.mid",
        ]
    );
    assert_eq!(summary.combined_file, dir.path().join("JazzPatterns.midi"));
    assert!(summary.combined_file.exists());
}

#[test]
fn test_files_reproduce_rendered_tick_positions() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), TABLE);
    let summary = run_batch(&config).unwrap();

    let patterns: [&[i32]; 4] = [&[2, 2, 1, -5], &[-1, -2, -2, 7, -3], &[], &[12, -12, 12]];
    let mut expected_combined = Track::new();
    for (intervals, path) in patterns.iter().zip(&summary.pattern_files) {
        let pitches = intervals_to_pitches(intervals, 60);
        let (expected, _) = render_to_track(&pitches, &RenderConfig::default());
        let decoded = read_midi(path).unwrap();
        assert_eq!(decoded.absolute_ticks(), expected.absolute_ticks());
        assert_eq!(decoded, expected);
        expected_combined.extend(&expected);
    }

    let combined = read_midi(&summary.combined_file).unwrap();
    assert_eq!(combined, expected_combined);
    assert_eq!(summary.combined_ticks, expected_combined.total_ticks());
}

#[test]
fn test_each_pattern_starts_on_a_bar() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), TABLE);
    let summary = run_batch(&config).unwrap();

    // Every pattern begins with its root note-on at velocity 120; those
    // onsets must all fall on bar lines in the combined file.
    let combined = read_midi(&summary.combined_file).unwrap();
    let ticks = combined.absolute_ticks();
    let onsets: Vec<u64> = combined
        .events()
        .iter()
        .zip(&ticks)
        .filter(|(e, _)| e.event == Event::NoteOn { pitch: 60, velocity: 120 })
        .map(|(_, &t)| t)
        .collect();
    assert!(onsets.len() >= 3);
    assert!(onsets.iter().all(|t| t % 1920 == 0), "onsets {onsets:?}");
    assert_eq!(combined.total_ticks() % 1920, 0);
}

#[test]
fn test_root_and_render_config_are_applied() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(dir.path(), "i;id;n\n[3];x;1\n");
    config.root = 48;
    config.render.top_velocity = 100;
    let summary = run_batch(&config).unwrap();

    let track = read_midi(&summary.pattern_files[0]).unwrap();
    assert_eq!(
        track.events()[0].event,
        Event::NoteOn { pitch: 48, velocity: 100 }
    );
}

#[test]
fn test_malformed_row_aborts_batch() {
    let dir = tempfile::tempdir().unwrap();
    let table = "intervals;id;n\n[1, 2];good;1\n(1 2);bad;1\n[3];later;1\n";
    let config = config_for(dir.path(), table);

    match run_batch(&config) {
        Err(Error::IntervalLiteral { row, .. }) => assert_eq!(row, 2),
        other => panic!("expected interval error, got {other:?}"),
    }
    // Rows before the bad one are already written; nothing after it is.
    assert!(dir.path().join("pattern_1_1_good.mid").exists());
    assert!(!dir.path().join("pattern_3_1_later.mid").exists());
    assert!(!dir.path().join("JazzPatterns.midi").exists());
}

#[test]
fn test_missing_input_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = BatchConfig {
        input: dir.path().join("absent.csv"),
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    assert!(matches!(run_batch(&config), Err(Error::Io(_))));
}
