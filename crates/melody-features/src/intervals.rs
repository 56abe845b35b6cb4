use midi_analysis::Note;

use crate::types::{IntervalAnalysis, IntervalDistribution};

/// Size class of a melodic interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalClass {
    Unison,
    Step,
    SmallLeap,
    Octave,
    LargeLeap,
}

/// Classify an interval by its absolute size in semitones.
///
/// Octaves are split out before the large-leap catch-all; fifths through
/// sevenths and anything wider than an octave are large leaps.
pub fn classify_interval(semitones: i16) -> IntervalClass {
    match semitones.unsigned_abs() {
        0 => IntervalClass::Unison,
        1..=2 => IntervalClass::Step,
        3..=4 => IntervalClass::SmallLeap,
        12 => IntervalClass::Octave,
        _ => IntervalClass::LargeLeap,
    }
}

/// Signed semitone steps between consecutive notes.
pub fn intervals(notes: &[Note]) -> Vec<i16> {
    notes
        .windows(2)
        .map(|w| w[1].pitch as i16 - w[0].pitch as i16)
        .collect()
}

pub fn analyze_intervals(notes: &[Note]) -> IntervalAnalysis {
    let steps = intervals(notes);
    if steps.is_empty() {
        return IntervalAnalysis::default();
    }

    let mut unison = 0usize;
    let mut step = 0usize;
    let mut small_leap = 0usize;
    let mut large_leap = 0usize;
    let mut octave = 0usize;

    for &interval in &steps {
        match classify_interval(interval) {
            IntervalClass::Unison => unison += 1,
            IntervalClass::Step => step += 1,
            IntervalClass::SmallLeap => small_leap += 1,
            IntervalClass::Octave => octave += 1,
            IntervalClass::LargeLeap => large_leap += 1,
        }
    }

    let total = steps.len() as f64;
    let distribution = IntervalDistribution {
        unison: unison as f64 / total,
        step: step as f64 / total,
        small_leap: small_leap as f64 / total,
        large_leap: large_leap as f64 / total,
        octave: octave as f64 / total,
    };

    IntervalAnalysis {
        stepwise_ratio: distribution.step,
        leap_ratio: distribution.small_leap + distribution.large_leap,
        distribution: Some(distribution),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn notes_from_pitches(pitches: &[u8]) -> Vec<Note> {
        pitches
            .iter()
            .enumerate()
            .map(|(i, &pitch)| Note {
                pitch,
                start_time: i as u64 * 480,
                duration: 480,
                velocity: 80,
            })
            .collect()
    }

    #[test]
    fn interval_classes() {
        assert_eq!(classify_interval(0), IntervalClass::Unison);
        assert_eq!(classify_interval(-2), IntervalClass::Step);
        assert_eq!(classify_interval(4), IntervalClass::SmallLeap);
        assert_eq!(classify_interval(5), IntervalClass::LargeLeap);
        assert_eq!(classify_interval(11), IntervalClass::LargeLeap);
        assert_eq!(classify_interval(-12), IntervalClass::Octave);
        assert_eq!(classify_interval(13), IntervalClass::LargeLeap);
    }

    #[test]
    fn pentatonic_phrase() {
        // +2 +2 +3 +2
        let result = analyze_intervals(&notes_from_pitches(&[60, 62, 64, 67, 69]));

        assert_eq!(result.stepwise_ratio, 0.75);
        assert_eq!(result.leap_ratio, 0.25);
        assert_eq!(
            result.distribution,
            Some(IntervalDistribution {
                unison: 0.0,
                step: 0.75,
                small_leap: 0.25,
                large_leap: 0.0,
                octave: 0.0,
            })
        );
    }

    #[test]
    fn octave_is_not_a_leap() {
        // 0, +12, -7, +3
        let result = analyze_intervals(&notes_from_pitches(&[60, 60, 72, 65, 68]));
        let dist = result.distribution.unwrap();

        assert_eq!(dist.octave, 0.25);
        assert_eq!(dist.unison, 0.25);
        assert_eq!(result.leap_ratio, 0.5);

        let sum = dist.unison + dist.step + dist.small_leap + dist.large_leap + dist.octave;
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fewer_than_two_notes() {
        let single = analyze_intervals(&notes_from_pitches(&[60]));
        assert_eq!(single, IntervalAnalysis::default());
        assert_eq!(analyze_intervals(&[]), IntervalAnalysis::default());
    }
}
