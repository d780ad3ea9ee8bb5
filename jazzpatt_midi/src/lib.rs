// Jazz pattern to expressive MIDI converter.
//
// Takes melodic interval patterns (pitch deltas mined from a jazz phrase
// corpus) and renders each one as a short swing phrase: alternating long
// downbeats and short upbeats, accented "top notes" held across their
// sub-phrase, and breath-controller (CC 2) values shaping the line. Every
// rendered pattern is padded to a bar line and followed by a bar of silence,
// so patterns can be concatenated into one combined file.
//
// Architecture:
// - pattern.rs: interval pattern -> absolute pitch sequence
// - event.rs: timed note/controller events and the append-only Track
// - render.rs: the swing/top-note renderer with explicit state + RenderConfig
// - interpolate.rs: linear controller ramps (auxiliary, not used by render)
// - midi.rs: Standard MIDI File encode/decode of a Track via `midly`
// - table.rs: semicolon-delimited pattern table reader
// - batch.rs: per-pattern + combined file output driver
// - error.rs: crate error type
//
// Processing is single-threaded and sequential; the first failure aborts.

pub mod batch;
pub mod error;
pub mod event;
pub mod interpolate;
pub mod midi;
pub mod pattern;
pub mod render;
pub mod table;

pub use error::{Error, Result};
