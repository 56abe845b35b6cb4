use midi_analysis::Note;

use crate::types::ContourAnalysis;

/// Up/down/level direction between each pair of consecutive notes.
pub fn melody_contour(notes: &[Note]) -> Vec<i8> {
    notes
        .windows(2)
        .map(|w| match w[1].pitch.cmp(&w[0].pitch) {
            std::cmp::Ordering::Greater => 1,
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Equal => 0,
        })
        .collect()
}

/// Split notes into phrases at rests longer than one beat.
///
/// Each gap is measured from the end of the note just before to the start
/// of the next one. The last phrase always closes on the final note.
pub fn segment_phrases(notes: &[Note], ticks_per_beat: u16) -> Vec<(usize, usize)> {
    if notes.is_empty() {
        return Vec::new();
    }

    let max_gap = ticks_per_beat as i64;
    let mut phrases = Vec::new();
    let mut phrase_start = 0;

    for (i, pair) in notes.windows(2).enumerate() {
        let gap = pair[1].start_time as i64 - pair[0].end_time() as i64;
        if gap > max_gap {
            phrases.push((phrase_start, i));
            phrase_start = i + 1;
        }
    }

    phrases.push((phrase_start, notes.len() - 1));
    phrases
}

pub fn analyze_contour(notes: &[Note], ticks_per_beat: u16) -> ContourAnalysis {
    ContourAnalysis {
        contour_vector: melody_contour(notes),
        phrase_boundaries: segment_phrases(notes, ticks_per_beat),
    }
}
