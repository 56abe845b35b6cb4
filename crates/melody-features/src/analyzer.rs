use midi_analysis::Note;

use crate::contour::analyze_contour;
use crate::intervals::analyze_intervals;
use crate::key::detect_pentatonic_key;
use crate::rhythm::analyze_rhythm;
use crate::types::{ContourAnalysis, IntervalAnalysis, KeyModeAnalysis, RhythmAnalysis};

/// Trait for melody feature backends.
///
/// Each extractor sees the same note list and is independent of the others.
pub trait MelodyAnalyzer: Send + Sync {
    fn analyze_rhythm(&self, notes: &[Note], ticks_per_beat: u16) -> RhythmAnalysis;

    fn analyze_intervals(&self, notes: &[Note]) -> IntervalAnalysis;

    fn analyze_key(&self, notes: &[Note]) -> KeyModeAnalysis;

    fn analyze_contour(&self, notes: &[Note], ticks_per_beat: u16) -> ContourAnalysis;
}

/// Rule-based analyzer: duration buckets, interval classes, pentatonic
/// template matching and rest-based phrase splitting.
pub struct HeuristicAnalyzer;

impl MelodyAnalyzer for HeuristicAnalyzer {
    fn analyze_rhythm(&self, notes: &[Note], ticks_per_beat: u16) -> RhythmAnalysis {
        analyze_rhythm(notes, ticks_per_beat)
    }

    fn analyze_intervals(&self, notes: &[Note]) -> IntervalAnalysis {
        analyze_intervals(notes)
    }

    fn analyze_key(&self, notes: &[Note]) -> KeyModeAnalysis {
        detect_pentatonic_key(notes)
    }

    fn analyze_contour(&self, notes: &[Note], ticks_per_beat: u16) -> ContourAnalysis {
        analyze_contour(notes, ticks_per_beat)
    }
}
