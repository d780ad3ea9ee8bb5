// Linear controller ramps.
//
// Spreads a controller change from `start` to `end` over a span of ticks as a
// fixed number of evenly spaced steps. Values are truncated toward zero and
// the last step stops one increment short of `end`. The renderer doesn't use
// this; it is here for callers that want a swell under a held note.

use crate::event::{Event, Track};

/// Number of controller events written per ramp.
pub const RAMP_STEPS: u32 = 10;

/// Build the ramp as (delta, event) pairs. Every step carries a delta of
/// `duration / RAMP_STEPS` (integer division), including the first.
pub fn controller_ramp(controller: u8, start: i32, end: i32, duration: u32) -> Vec<(u32, Event)> {
    let step_ticks = duration / RAMP_STEPS;
    (0..RAMP_STEPS)
        .map(|i| {
            let fraction = i as f64 / RAMP_STEPS as f64;
            let value = (start as f64 + (end - start) as f64 * fraction) as i32;
            (step_ticks, Event::Controller { controller, value })
        })
        .collect()
}

/// Append a ramp to `track`.
pub fn interpolate_controller(track: &mut Track, controller: u8, start: i32, end: i32, duration: u32) {
    for (delta, event) in controller_ramp(controller, start, end, duration) {
        track.push(delta, event);
    }
}
