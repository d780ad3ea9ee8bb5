// MIDI output from rendered tracks.
//
// Converts a Track into a Standard MIDI File (SMF) with a single track on
// channel 0. Ticks are written as-is at 480 ticks per quarter note, which is
// the resolution every timing constant in the renderer assumes.
//
// Uses the `midly` crate for MIDI writing and reading. Output is SMF Format 1
// with one track, terminated by an End-of-Track meta event. Decoding reads
// channel events back into a Track so tick positions can be checked against
// what was rendered.

use crate::error::{Error, Result};
use crate::event::{Event, MAX_DELTA, Track};
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u28},
};
use std::path::Path;

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 480;

const CHANNEL: u8 = 0;

/// Encode a Track and write it to a file.
pub fn write_midi(track: &Track, path: &Path) -> Result<()> {
    let buf = encode_track(track)?;
    std::fs::write(path, &buf)?;
    Ok(())
}

/// Encode a Track as SMF bytes.
pub fn encode_track(track: &Track) -> Result<Vec<u8>> {
    let smf = track_to_smf(track)?;
    let mut buf = Vec::new();
    smf.write(&mut buf)
        .map_err(|err| Error::MidiWrite(err.to_string()))?;
    Ok(buf)
}

/// Convert a Track to an in-memory SMF.
fn track_to_smf(track: &Track) -> Result<Smf<'static>> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let mut events: Vec<TrackEvent<'static>> = Vec::with_capacity(track.len() + 1);
    for timed in track.events() {
        events.push(TrackEvent {
            delta: data_delta(timed.delta)?,
            kind: TrackEventKind::Midi {
                channel: u4::new(CHANNEL),
                message: to_message(timed.event)?,
            },
        });
    }
    events.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(events);

    Ok(smf)
}

fn to_message(event: Event) -> Result<MidiMessage> {
    Ok(match event {
        Event::NoteOn { pitch, velocity } => MidiMessage::NoteOn {
            key: data_byte("pitch", pitch)?,
            vel: data_byte("velocity", velocity as i32)?,
        },
        Event::NoteOff { pitch, velocity } => MidiMessage::NoteOff {
            key: data_byte("pitch", pitch)?,
            vel: data_byte("velocity", velocity as i32)?,
        },
        Event::Controller { controller, value } => MidiMessage::Controller {
            controller: data_byte("controller", controller as i32)?,
            value: data_byte("controller value", value)?,
        },
    })
}

/// A 7-bit MIDI data byte, or an error naming the offending value.
fn data_byte(what: &'static str, value: i32) -> Result<u7> {
    if (0..=127).contains(&value) {
        Ok(u7::new(value as u8))
    } else {
        Err(Error::ValueOutOfRange { what, value })
    }
}

/// A delta that fits the 28-bit variable-length encoding. `u28::new` would
/// silently mask anything larger.
fn data_delta(delta: u32) -> Result<u28> {
    if delta <= MAX_DELTA {
        Ok(u28::new(delta))
    } else {
        Err(Error::DeltaOutOfRange(delta))
    }
}

/// Read the channel events of the first track of an SMF back into a Track.
///
/// Meta and system events are dropped; their deltas are carried into the next
/// kept event so absolute tick positions are preserved. Note-on with velocity
/// 0 is kept as a note-on.
pub fn decode_track(bytes: &[u8]) -> Result<Track> {
    let smf = Smf::parse(bytes)?;
    let mut track = Track::new();
    let Some(events) = smf.tracks.first() else {
        return Ok(track);
    };

    let mut carried: u32 = 0;
    for event in events {
        carried += event.delta.as_int();
        let TrackEventKind::Midi { message, .. } = event.kind else {
            continue;
        };
        let decoded = match message {
            MidiMessage::NoteOn { key, vel } => Event::NoteOn {
                pitch: key.as_int() as i32,
                velocity: vel.as_int(),
            },
            MidiMessage::NoteOff { key, vel } => Event::NoteOff {
                pitch: key.as_int() as i32,
                velocity: vel.as_int(),
            },
            MidiMessage::Controller { controller, value } => Event::Controller {
                controller: controller.as_int(),
                value: value.as_int() as i32,
            },
            _ => continue,
        };
        track.push(carried, decoded);
        carried = 0;
    }

    Ok(track)
}

/// Read and decode a MIDI file.
pub fn read_midi(path: &Path) -> Result<Track> {
    let bytes = std::fs::read(path)?;
    decode_track(&bytes)
}
