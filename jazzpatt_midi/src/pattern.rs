// Interval patterns and the pitch sequences derived from them.
//
// A pattern is stored as the signed semitone steps between consecutive notes.
// Expanding it from a root gives the absolute pitches the renderer walks.
// Pitches are not range-checked here; a pattern that climbs past 127 only
// fails once it is encoded to MIDI.

/// Default root pitch (middle C).
pub const DEFAULT_ROOT: i32 = 60;

/// Expand an interval pattern into absolute pitches starting at `root`.
///
/// The result always has `intervals.len() + 1` entries, with
/// `pitches[0] == root` and `pitches[i] == pitches[i - 1] + intervals[i - 1]`.
pub fn intervals_to_pitches(intervals: &[i32], root: i32) -> Vec<i32> {
    let mut pitches = Vec::with_capacity(intervals.len() + 1);
    let mut current = root;
    pitches.push(current);
    for &step in intervals {
        current += step;
        pitches.push(current);
    }
    pitches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_root() {
        assert_eq!(intervals_to_pitches(&[], 60), vec![60]);
        assert_eq!(intervals_to_pitches(&[3, -1], 55)[0], 55);
    }

    #[test]
    fn test_cumulative_sum() {
        let intervals = [2, 2, 1, -5, 7, 0, -12];
        let pitches = intervals_to_pitches(&intervals, DEFAULT_ROOT);
        assert_eq!(pitches.len(), intervals.len() + 1);
        for k in 1..pitches.len() {
            assert_eq!(pitches[k] - pitches[k - 1], intervals[k - 1]);
        }
        assert_eq!(pitches, vec![60, 62, 64, 65, 60, 67, 67, 55]);
    }

    #[test]
    fn test_no_range_clamping() {
        let pitches = intervals_to_pitches(&[60, 20, -200], 60);
        assert_eq!(pitches, vec![60, 120, 140, -60]);
    }
}
