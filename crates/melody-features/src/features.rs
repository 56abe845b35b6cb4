use midi_analysis::{pitch_range, Note};
use tracing::debug;

use crate::analyzer::MelodyAnalyzer;
use crate::types::MelodyFeatures;

/// Run every extractor over `notes` and merge the results.
pub fn extract_features(
    analyzer: &dyn MelodyAnalyzer,
    notes: &[Note],
    ticks_per_beat: u16,
) -> MelodyFeatures {
    let rhythm = analyzer.analyze_rhythm(notes, ticks_per_beat);
    let intervals = analyzer.analyze_intervals(notes);
    let key = analyzer.analyze_key(notes);
    let contour = analyzer.analyze_contour(notes, ticks_per_beat);

    let total_ticks: u64 = notes.iter().map(|n| n.duration).sum();
    let duration_in_beats = total_ticks as f64 / ticks_per_beat as f64;

    debug!(
        notes = notes.len(),
        key = %key.inferred_key,
        rhythm_complexity = rhythm.complexity,
        phrases = contour.phrase_boundaries.len(),
        "extracted melody features"
    );

    MelodyFeatures {
        total_notes: notes.len(),
        pitch_range: pitch_range(notes).unwrap_or((0, 0)),
        duration_in_beats,

        rhythm_complexity: rhythm.complexity,
        rhythm_pattern_ratios: rhythm.patterns,
        syncopation_ratio: rhythm.syncopation_ratio,

        interval_ratio_distribution: intervals.distribution,
        stepwise_ratio: intervals.stepwise_ratio,
        leap_ratio: intervals.leap_ratio,

        inferred_key: key.inferred_key,
        mode_confidences: key.mode_confidences,
        scale_pitch_classes: key.scale_pitch_classes,

        contour_vector: contour.contour_vector,
        phrase_boundaries: contour.phrase_boundaries,
    }
}
