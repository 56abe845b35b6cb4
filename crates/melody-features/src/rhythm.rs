use midi_analysis::Note;

use crate::types::{RhythmAnalysis, RhythmPatterns};

/// How close (in beats) a duration must be to count as a bucket.
const DURATION_TOLERANCE: f64 = 0.1;

/// Share of populated bucket needed to count towards complexity.
const POPULATED_BUCKET_RATIO: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RhythmBucket {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    Dotted,
    Triplet,
}

/// Nominal beat lengths, checked in this order; first match wins.
pub const RHYTHM_TEMPLATES: [(RhythmBucket, f64); 7] = [
    (RhythmBucket::Whole, 4.0),
    (RhythmBucket::Half, 2.0),
    (RhythmBucket::Quarter, 1.0),
    (RhythmBucket::Eighth, 0.5),
    (RhythmBucket::Sixteenth, 0.25),
    (RhythmBucket::Dotted, 1.5),
    (RhythmBucket::Triplet, 0.333),
];

/// Bucket for a duration in beats, if any template is within tolerance.
pub fn classify_duration(beats: f64) -> Option<RhythmBucket> {
    RHYTHM_TEMPLATES
        .iter()
        .find(|(_, nominal)| (beats - nominal).abs() < DURATION_TOLERANCE)
        .map(|(bucket, _)| *bucket)
}

/// Off-grid lengths: strictly between 0.3 and 0.7 or 1.3 and 1.7 beats.
fn is_syncopated(beats: f64) -> bool {
    (beats > 0.3 && beats < 0.7) || (beats > 1.3 && beats < 1.7)
}

pub fn analyze_rhythm(notes: &[Note], ticks_per_beat: u16) -> RhythmAnalysis {
    if notes.is_empty() {
        return RhythmAnalysis::default();
    }

    let tpb = ticks_per_beat as f64;
    let beat_durations: Vec<f64> = notes.iter().map(|n| n.duration as f64 / tpb).collect();

    let mut counts = [0usize; 7];
    for &beats in &beat_durations {
        if let Some(bucket) = classify_duration(beats) {
            counts[bucket as usize] += 1;
        }
    }

    let total = beat_durations.len() as f64;
    let ratio = |bucket: RhythmBucket| counts[bucket as usize] as f64 / total;

    let patterns = RhythmPatterns {
        whole: ratio(RhythmBucket::Whole),
        half: ratio(RhythmBucket::Half),
        quarter: ratio(RhythmBucket::Quarter),
        eighth: ratio(RhythmBucket::Eighth),
        sixteenth: ratio(RhythmBucket::Sixteenth),
        dotted: ratio(RhythmBucket::Dotted),
        triplet: ratio(RhythmBucket::Triplet),
    };

    let complexity = patterns
        .values()
        .iter()
        .filter(|&&r| r > POPULATED_BUCKET_RATIO)
        .count();

    let syncopated = beat_durations.iter().filter(|&&b| is_syncopated(b)).count();

    RhythmAnalysis {
        complexity,
        patterns,
        syncopation_ratio: syncopated as f64 / total,
    }
}
