// Swing-phrase renderer: pitch sequence -> timed event stream.
//
// Notes alternate downbeat/upbeat, starting on a downbeat. Downbeats last
// `downbeat_ticks` (320), upbeats `upbeat_ticks` (140); the short upbeat leaves
// room before the next accent. A downbeat note that is the first note, or
// strictly higher than the note before it, is a "top note":
//
// - the previously held top note (if any) is released, then a rest pads the
//   current sub-phrase out to the next beat boundary
// - the top note starts at `top_velocity` and is *held*, with a breath
//   controller reset (`top_breath`) and a rest marker standing in for its beat
// - the sub-phrase clock restarts
//
// Every other note is a short on/off pair at `note_velocity`, preceded by a
// breath controller value (`downbeat_breath` or `upbeat_breath`).
//
// After the last note the held top note is released, the pattern is padded to
// the next bar line, and one further bar of silence separates it from
// whatever follows in the same track.
//
// The whole walk is a small state machine; its state lives in `RenderState`
// and is advanced one pitch at a time by `RenderState::step`.

use crate::error::{Error, Result};
use crate::event::{Event, MAX_DELTA, Track};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the bar padding is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddingBasis {
    /// Everything written for the pattern, beat-alignment rests included.
    /// Each pattern then ends exactly on a bar line.
    #[default]
    Elapsed,
    /// Only the summed note durations. Alignment rests are not counted, so a
    /// pattern with more than one top note can drift off the bar grid.
    NoteDurations,
}

/// What to write for a pattern with no notes at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyPattern {
    /// Just the one-bar separator.
    #[default]
    SeparatorBar,
    /// Nothing.
    Skip,
}

/// Timing, velocity and controller constants for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Bar length in ticks (4/4 at 480 ticks per quarter).
    pub bar_ticks: u32,
    /// Beat length used to align a new top note.
    pub beat_ticks: u32,
    /// Duration of a downbeat note (and of a top note's hold marker).
    pub downbeat_ticks: u32,
    /// Duration of an upbeat note.
    pub upbeat_ticks: u32,
    pub top_velocity: u8,
    pub note_velocity: u8,
    /// Controller number carrying the breath/expression values.
    pub breath_controller: u8,
    pub top_breath: i32,
    pub downbeat_breath: i32,
    pub upbeat_breath: i32,
    pub padding_basis: PaddingBasis,
    pub empty_pattern: EmptyPattern,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            bar_ticks: 1920,
            beat_ticks: 480,
            downbeat_ticks: 320,
            upbeat_ticks: 140,
            top_velocity: 120,
            note_velocity: 30,
            breath_controller: 2,
            top_breath: 70,
            downbeat_breath: 50,
            upbeat_breath: 30,
            padding_basis: PaddingBasis::default(),
            empty_pattern: EmptyPattern::default(),
        }
    }
}

impl RenderConfig {
    /// Load from JSON. Missing fields take their default values.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: RenderConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Bar and beat lengths are divisors during rendering, and every length
    /// ends up as a single MIDI delta.
    pub fn validate(&self) -> Result<()> {
        if self.bar_ticks == 0 {
            return Err(Error::InvalidConfig("bar_ticks must be non-zero"));
        }
        if self.beat_ticks == 0 {
            return Err(Error::InvalidConfig("beat_ticks must be non-zero"));
        }
        let lengths = [
            self.bar_ticks,
            self.beat_ticks,
            self.downbeat_ticks,
            self.upbeat_ticks,
        ];
        if lengths.iter().any(|&ticks| ticks > MAX_DELTA) {
            return Err(Error::InvalidConfig(
                "tick lengths must fit in a MIDI delta (at most 268435455)",
            ));
        }
        Ok(())
    }

    fn note_ticks(&self, is_downbeat: bool) -> u32 {
        if is_downbeat {
            self.downbeat_ticks
        } else {
            self.upbeat_ticks
        }
    }

    fn breath(&self, is_downbeat: bool) -> i32 {
        if is_downbeat {
            self.downbeat_breath
        } else {
            self.upbeat_breath
        }
    }
}

/// What one call to `render_pattern` produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSummary {
    pub notes: usize,
    pub top_notes: usize,
    /// Ticks written before bar padding (notes plus alignment rests).
    pub elapsed_ticks: u64,
    /// Ticks written in total, padding and separator bar included.
    pub total_ticks: u64,
}

/// State carried from one note to the next while rendering a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderState {
    /// Top note currently held, if one has started in this pattern.
    pub sustained_top: Option<i32>,
    pub previous_pitch: Option<i32>,
    pub is_downbeat: bool,
    /// Note time since the current top note started.
    pub subpattern_ticks: u64,
    /// Summed note durations.
    pub note_ticks: u64,
    /// Note durations plus alignment rests.
    pub elapsed_ticks: u64,
    /// Velocity computed for the most recent note; reused for the final release.
    pub last_velocity: u8,
    pub notes: usize,
    pub top_notes: usize,
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderState {
    pub fn new() -> Self {
        RenderState {
            sustained_top: None,
            previous_pitch: None,
            is_downbeat: true,
            subpattern_ticks: 0,
            note_ticks: 0,
            elapsed_ticks: 0,
            last_velocity: 0,
            notes: 0,
            top_notes: 0,
        }
    }

    /// Would `pitch` be a top note if it came next?
    pub fn is_top_note(&self, pitch: i32) -> bool {
        self.is_downbeat && self.previous_pitch.is_none_or(|prev| pitch > prev)
    }

    /// Emit the events for one note and advance the state.
    pub fn step(&mut self, track: &mut Track, pitch: i32, config: &RenderConfig) {
        let is_top = self.is_top_note(pitch);
        let velocity = if is_top {
            config.top_velocity
        } else {
            config.note_velocity
        };
        let duration = config.note_ticks(self.is_downbeat);

        if is_top {
            if let Some(held) = self.sustained_top {
                track.push(0, Event::NoteOff { pitch: held, velocity });
                // At most one beat, so it fits back into u32.
                let beat = config.beat_ticks as u64;
                let align = (beat - self.subpattern_ticks % beat) as u32;
                track.rest(align);
                self.elapsed_ticks += align as u64;
            }
            track.push(0, Event::NoteOn { pitch, velocity });
            track.push(
                0,
                Event::Controller {
                    controller: config.breath_controller,
                    value: config.top_breath,
                },
            );
            // The top note keeps sounding; only time moves on.
            track.rest(duration);
            self.sustained_top = Some(pitch);
            self.subpattern_ticks = 0;
            self.top_notes += 1;
        } else {
            track.push(
                0,
                Event::Controller {
                    controller: config.breath_controller,
                    value: config.breath(self.is_downbeat),
                },
            );
            track.push(0, Event::NoteOn { pitch, velocity });
            track.push(duration, Event::NoteOff { pitch, velocity });
        }

        self.subpattern_ticks += duration as u64;
        self.note_ticks += duration as u64;
        self.elapsed_ticks += duration as u64;
        self.previous_pitch = Some(pitch);
        self.last_velocity = velocity;
        self.notes += 1;
        self.is_downbeat = !self.is_downbeat;
    }

    /// Release the held top note and pad to the bar grid.
    pub fn finish(self, track: &mut Track, config: &RenderConfig) -> RenderSummary {
        if self.notes == 0 && config.empty_pattern == EmptyPattern::Skip {
            return RenderSummary::default();
        }

        if let Some(held) = self.sustained_top {
            track.push(
                0,
                Event::NoteOff {
                    pitch: held,
                    velocity: self.last_velocity,
                },
            );
        }

        let measured = match config.padding_basis {
            PaddingBasis::Elapsed => self.elapsed_ticks,
            PaddingBasis::NoteDurations => self.note_ticks,
        };
        let bar = config.bar_ticks as u64;
        let padding = match measured % bar {
            0 => 0,
            rem => (bar - rem) as u32,
        };
        if padding > 0 {
            track.rest(padding);
        }
        track.rest(config.bar_ticks);

        RenderSummary {
            notes: self.notes,
            top_notes: self.top_notes,
            elapsed_ticks: self.elapsed_ticks,
            total_ticks: self.elapsed_ticks + padding as u64 + bar,
        }
    }
}

/// Append one rendered pattern to `track`.
///
/// `config` must have non-zero `bar_ticks` and `beat_ticks`
/// (see `RenderConfig::validate`).
pub fn render_pattern(track: &mut Track, pitches: &[i32], config: &RenderConfig) -> RenderSummary {
    let mut state = RenderState::new();
    for &pitch in pitches {
        state.step(track, pitch, config);
    }
    state.finish(track, config)
}

/// Render one pattern into a fresh track.
pub fn render_to_track(pitches: &[i32], config: &RenderConfig) -> (Track, RenderSummary) {
    let mut track = Track::new();
    let summary = render_pattern(&mut track, pitches, config);
    (track, summary)
}
