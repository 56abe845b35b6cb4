use midi_analysis::Note;

use crate::types::{KeyModeAnalysis, ModeConfidences};

/// Major pentatonic templates, one per root. Enumeration order decides ties.
pub const PENTATONIC_SCALES: [(&str, [u8; 5]); 12] = [
    ("C", [0, 2, 4, 7, 9]),
    ("G", [7, 9, 11, 2, 4]),
    ("D", [2, 4, 6, 9, 11]),
    ("A", [9, 11, 1, 4, 6]),
    ("E", [4, 6, 8, 11, 1]),
    ("B", [11, 1, 3, 6, 8]),
    ("F#", [6, 8, 10, 1, 3]),
    ("Db", [1, 3, 5, 8, 10]),
    ("Ab", [8, 10, 0, 3, 5]),
    ("Eb", [3, 5, 7, 10, 0]),
    ("Bb", [10, 0, 2, 5, 7]),
    ("F", [5, 7, 9, 0, 2]),
];

const NOTE_NAMES_SHARP: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Placeholder confidences; not derived from the notes.
pub const MAJOR_PLACEHOLDER: f64 = 0.5;
pub const MINOR_PLACEHOLDER: f64 = 0.3;

/// Reported key when there is nothing to analyze.
pub const UNKNOWN_KEY: &str = "Unknown";

/// Occurrence count per pitch class (C=0 .. B=11).
pub fn pitch_class_histogram(notes: &[Note]) -> [usize; 12] {
    let mut histogram = [0usize; 12];
    for note in notes {
        histogram[(note.pitch % 12) as usize] += 1;
    }
    histogram
}

/// Infer a key by matching pitch-class counts against pentatonic templates.
///
/// Each root scores the number of notes whose pitch class is in its scale.
/// Only a strictly higher score displaces the current best, so ties go to the
/// root listed first in `PENTATONIC_SCALES`.
pub fn detect_pentatonic_key(notes: &[Note]) -> KeyModeAnalysis {
    if notes.is_empty() {
        return KeyModeAnalysis {
            inferred_key: UNKNOWN_KEY.to_string(),
            mode_confidences: ModeConfidences {
                pentatonic: 0.0,
                major: MAJOR_PLACEHOLDER,
                minor: MINOR_PLACEHOLDER,
            },
            scale_pitch_classes: Vec::new(),
        };
    }

    let histogram = pitch_class_histogram(notes);

    let mut best = &PENTATONIC_SCALES[0];
    let mut best_score = 0usize;

    for entry in &PENTATONIC_SCALES {
        let score: usize = entry.1.iter().map(|&pc| histogram[pc as usize]).sum();
        if score > best_score {
            best_score = score;
            best = entry;
        }
    }

    let (root, scale) = best;
    let scale_pitch_classes = scale
        .iter()
        .map(|&pc| NOTE_NAMES_SHARP[pc as usize].to_string())
        .collect();

    KeyModeAnalysis {
        inferred_key: root.to_string(),
        mode_confidences: ModeConfidences {
            pentatonic: best_score as f64 / notes.len() as f64,
            major: MAJOR_PLACEHOLDER,
            minor: MINOR_PLACEHOLDER,
        },
        scale_pitch_classes,
    }
}
