// Timed events and the Track that collects them.
//
// A Track is an append-only list of events, each carrying the tick delta
// from the previous event. Rests have no event kind of their own: they are
// written as a note-off for pitch 0 at velocity 0, with the rest length as
// the delta. Players ignore a note-off for a key that isn't sounding, so the
// marker only moves time forward.

/// Largest delta a Standard MIDI File can carry (28-bit variable-length
/// quantity).
pub const MAX_DELTA: u32 = 0x0FFF_FFFF;

/// One note or controller event. Channel is implicit (always channel 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    NoteOn { pitch: i32, velocity: u8 },
    NoteOff { pitch: i32, velocity: u8 },
    Controller { controller: u8, value: i32 },
}

impl Event {
    /// The silence marker used for rests and alignment padding.
    pub const SILENCE: Event = Event::NoteOff {
        pitch: 0,
        velocity: 0,
    };
}

/// An event with its delta (in ticks) from the preceding event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    pub delta: u32,
    pub event: Event,
}

/// Append-only event stream for one output file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    events: Vec<TimedEvent>,
}

impl Track {
    pub fn new() -> Self {
        Track { events: Vec::new() }
    }

    /// Append an event `delta` ticks after the previous one.
    pub fn push(&mut self, delta: u32, event: Event) {
        self.events.push(TimedEvent { delta, event });
    }

    /// Append `ticks` of silence.
    pub fn rest(&mut self, ticks: u32) {
        self.push(ticks, Event::SILENCE);
    }

    /// Append every event of `other`, in order.
    pub fn extend(&mut self, other: &Track) {
        self.events.extend_from_slice(&other.events);
    }

    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total length of the track in ticks (sum of all deltas).
    pub fn total_ticks(&self) -> u64 {
        self.events.iter().map(|e| e.delta as u64).sum()
    }

    /// Absolute tick position of each event.
    pub fn absolute_ticks(&self) -> Vec<u64> {
        let mut now = 0u64;
        self.events
            .iter()
            .map(|e| {
                now += e.delta as u64;
                now
            })
            .collect()
    }
}
