use crate::analyze::TrackEvents;
use crate::note::{build_notes, pitch_range, Note};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Pitch band treated as plausible for a sung melody (C3 to C6).
pub const VOCAL_RANGE: (u8, u8) = (48, 84);

/// Substrings in a track name that mark it as the vocal line.
/// Matched case-insensitively; includes "lead melody" and "vocal" in Chinese.
pub const VOCAL_KEYWORDS: [&str; 6] = ["vocal", "voice", "melody", "lead", "主旋律", "人声"];

/// A track ranked as a potential lead vocal line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackCandidate {
    pub track_index: usize,
    pub track_name: String,
    pub note_count: usize,
    pub pitch_range: (u8, u8),
    pub confidence_score: f64,
    /// Why the score is what it is, in evaluation order.
    pub reasons: Vec<String>,
}

/// One scoring rule and what it contributed.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalOutcome {
    pub signal: Signal,
    pub weight: f64,
    pub reason: Option<String>,
}

impl SignalOutcome {
    fn hit(signal: Signal, weight: f64, reason: String) -> Self {
        Self {
            signal,
            weight,
            reason: Some(reason),
        }
    }

    fn miss(signal: Signal) -> Self {
        Self {
            signal,
            weight: 0.0,
            reason: None,
        }
    }

    pub fn triggered(&self) -> bool {
        self.reason.is_some()
    }
}

/// The independent signals summed into a track's confidence, in the order
/// they are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    NameMatch,
    RegisterOverlap,
    LyricCount,
    NoteCount,
    IntervalVariety,
}

/// Score one track's notes against the vocal-line heuristics.
///
/// `lyric_chars` is the lyric file's alphabetic character count, when known.
pub fn score_signals(
    track_name: &str,
    notes: &[Note],
    lyric_chars: Option<usize>,
) -> Vec<SignalOutcome> {
    let mut outcomes = Vec::with_capacity(5);
    let note_count = notes.len();

    // Rule 1: name mentions the vocal line
    let lowered = track_name.to_lowercase();
    if VOCAL_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        outcomes.push(SignalOutcome::hit(
            Signal::NameMatch,
            30.0,
            format!("track name contains vocal keyword: {}", track_name),
        ));
    } else {
        outcomes.push(SignalOutcome::miss(Signal::NameMatch));
    }

    // Rule 2: register sits inside the vocal band
    let overlap = pitch_range(notes)
        .map(|range| range_overlap(range, VOCAL_RANGE))
        .unwrap_or(0.0);
    let percent = overlap * 100.0;
    if overlap > 0.7 {
        outcomes.push(SignalOutcome::hit(
            Signal::RegisterOverlap,
            25.0,
            format!("register strongly matches vocal range: {percent:.1}%"),
        ));
    } else if overlap > 0.5 {
        outcomes.push(SignalOutcome::hit(
            Signal::RegisterOverlap,
            15.0,
            format!("register partially matches vocal range: {percent:.1}%"),
        ));
    } else {
        outcomes.push(SignalOutcome::miss(Signal::RegisterOverlap));
    }

    // Rule 3: one note per lyric character
    match lyric_chars {
        Some(chars) if chars > 0 => {
            let deviation = (1.0 - note_count as f64 / chars as f64).abs();
            let n = note_count;
            if deviation < 0.1 {
                outcomes.push(SignalOutcome::hit(
                    Signal::LyricCount,
                    20.0,
                    format!("note count closely matches lyric length: {n}≈{chars}"),
                ));
            } else if deviation < 0.3 {
                outcomes.push(SignalOutcome::hit(
                    Signal::LyricCount,
                    10.0,
                    format!("note count roughly matches lyric length: {n} vs {chars}"),
                ));
            } else {
                outcomes.push(SignalOutcome::miss(Signal::LyricCount));
            }
        }
        _ => outcomes.push(SignalOutcome::miss(Signal::LyricCount)),
    }

    // Rule 4: plausible melody length
    if (20..=200).contains(&note_count) {
        outcomes.push(SignalOutcome::hit(
            Signal::NoteCount,
            15.0,
            format!("reasonable note count: {}", note_count),
        ));
    } else if note_count > 10 {
        outcomes.push(SignalOutcome::hit(
            Signal::NoteCount,
            5.0,
            format!("acceptable note count: {}", note_count),
        ));
    } else {
        outcomes.push(SignalOutcome::miss(Signal::NoteCount));
    }

    // Rule 5: melodic movement rather than a repeated figure
    let variety = interval_variety(notes);
    if variety > 0.3 {
        outcomes.push(SignalOutcome::hit(
            Signal::IntervalVariety,
            10.0,
            format!("rich interval variety: {:.2}", variety),
        ));
    } else {
        outcomes.push(SignalOutcome::miss(Signal::IntervalVariety));
    }

    outcomes
}

/// Build a candidate for one track, or `None` if it has no notes.
pub fn score_track(track: &TrackEvents, lyric_chars: Option<usize>) -> Option<TrackCandidate> {
    let notes = build_notes(&track.events);
    let pitch_range = pitch_range(&notes)?;
    let track_name = track.label();

    let outcomes = score_signals(&track_name, &notes, lyric_chars);
    let confidence_score = outcomes.iter().map(|o| o.weight).sum();
    let reasons = outcomes.into_iter().filter_map(|o| o.reason).collect();

    Some(TrackCandidate {
        track_index: track.track_index,
        track_name,
        note_count: notes.len(),
        pitch_range,
        confidence_score,
        reasons,
    })
}

/// Score every track with notes and rank them by descending confidence.
///
/// Tracks are scored in index order and the sort is stable, so equal
/// scores stay ordered by track index.
pub fn rank_tracks(tracks: &[TrackEvents], lyric_chars: Option<usize>) -> Vec<TrackCandidate> {
    let mut candidates: Vec<TrackCandidate> = tracks
        .iter()
        .filter_map(|track| score_track(track, lyric_chars))
        .inspect(|c| {
            debug!(
                track = c.track_index,
                name = %c.track_name,
                score = c.confidence_score,
                "scored vocal candidate"
            );
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.confidence_score
            .partial_cmp(&a.confidence_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    candidates
}

/// The best-scoring candidate from a ranked list.
pub fn select_vocal_track(ranked: &[TrackCandidate]) -> Option<&TrackCandidate> {
    ranked.first()
}

/// Fraction of `range`'s span that falls inside `reference`.
pub fn range_overlap(range: (u8, u8), reference: (u8, u8)) -> f64 {
    let start = range.0.max(reference.0);
    let end = range.1.min(reference.1);

    if start >= end {
        return 0.0;
    }

    let span = range.1.saturating_sub(range.0);
    if span == 0 {
        return 0.0;
    }

    (end - start) as f64 / span as f64
}

/// Distinct absolute intervals over total consecutive intervals.
pub fn interval_variety(notes: &[Note]) -> f64 {
    if notes.len() < 2 {
        return 0.0;
    }

    let intervals: Vec<u8> = notes
        .windows(2)
        .map(|w| w[1].pitch.abs_diff(w[0].pitch))
        .collect();
    let distinct: HashSet<u8> = intervals.iter().copied().collect();

    distinct.len() as f64 / intervals.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::RawEvent;
    use pretty_assertions::assert_eq;

    fn track_from_pitches(index: usize, name: Option<&str>, pitches: &[u8]) -> TrackEvents {
        let mut events = Vec::new();
        for &p in pitches {
            events.push(RawEvent::note_on(p, 100, 0));
            events.push(RawEvent::note_off(p, 480));
        }
        TrackEvents {
            track_index: index,
            name: name.map(str::to_string),
            events,
        }
    }

    fn notes_from_pitches(pitches: &[u8]) -> Vec<Note> {
        pitches
            .iter()
            .enumerate()
            .map(|(i, &p)| Note {
                pitch: p,
                start_time: i as u64 * 480,
                duration: 480,
                velocity: 100,
            })
            .collect()
    }

    #[test]
    fn overlap_fraction() {
        assert_eq!(range_overlap((55, 75), VOCAL_RANGE), 1.0);
        assert_eq!(range_overlap((40, 60), VOCAL_RANGE), 0.6);
        assert_eq!(range_overlap((30, 47), VOCAL_RANGE), 0.0);
        // Touching at a single pitch is no overlap
        assert_eq!(range_overlap((40, 48), VOCAL_RANGE), 0.0);
        // Zero-width range
        assert_eq!(range_overlap((60, 60), VOCAL_RANGE), 0.0);
    }

    #[test]
    fn variety_counts_distinct_absolute_intervals() {
        // Intervals: +2, -2, +2, +5 -> {2, 5} over 4
        let notes = notes_from_pitches(&[60, 62, 60, 62, 67]);
        assert_eq!(interval_variety(&notes), 0.5);
        assert_eq!(interval_variety(&notes[..1]), 0.0);
    }

    #[test]
    fn name_match_is_case_insensitive() {
        let notes = notes_from_pitches(&[60]);
        for name in ["LEAD synth", "Main Vocal", "voice 2", "主旋律", "女人声"] {
            let outcomes = score_signals(name, &notes, None);
            assert!(outcomes[0].triggered(), "{} should match", name);
            assert_eq!(outcomes[0].weight, 30.0);
        }
        let outcomes = score_signals("Strings", &notes, None);
        assert!(!outcomes[0].triggered());
    }

    #[test]
    fn signals_evaluated_in_fixed_order() {
        let notes = notes_from_pitches(&[60]);
        let order: Vec<Signal> = score_signals("x", &notes, Some(5))
            .into_iter()
            .map(|o| o.signal)
            .collect();
        assert_eq!(
            order,
            vec![
                Signal::NameMatch,
                Signal::RegisterOverlap,
                Signal::LyricCount,
                Signal::NoteCount,
                Signal::IntervalVariety,
            ]
        );
    }

    #[test]
    fn lyric_count_tiers() {
        let notes = notes_from_pitches(&[60; 20]);

        let close = score_signals("x", &notes, Some(21));
        assert_eq!(close[2].weight, 20.0);

        let rough = score_signals("x", &notes, Some(25));
        assert_eq!(rough[2].weight, 10.0);

        let far = score_signals("x", &notes, Some(100));
        assert_eq!(far[2].weight, 0.0);

        let unknown = score_signals("x", &notes, Some(0));
        assert!(!unknown[2].triggered());
    }

    #[test]
    fn note_count_tiers() {
        let reasonable = score_signals("x", &notes_from_pitches(&[60; 20]), None);
        assert_eq!(reasonable[3].weight, 15.0);

        let acceptable = score_signals("x", &notes_from_pitches(&[60; 11]), None);
        assert_eq!(acceptable[3].weight, 5.0);

        let too_many = score_signals("x", &notes_from_pitches(&[60; 201]), None);
        assert_eq!(too_many[3].weight, 5.0);

        let too_few = score_signals("x", &notes_from_pitches(&[60; 10]), None);
        assert_eq!(too_few[3].weight, 0.0);
    }

    #[test]
    fn register_tiers() {
        // 40..60: 12/20 = 0.6 -> partial
        let partial = score_signals("x", &notes_from_pitches(&[40, 60]), None);
        assert_eq!(partial[1].weight, 15.0);
        assert_eq!(
            partial[1].reason.as_deref(),
            Some("register partially matches vocal range: 60.0%")
        );

        let strong = score_signals("x", &notes_from_pitches(&[55, 75]), None);
        assert_eq!(strong[1].weight, 25.0);
    }

    #[test]
    fn empty_tracks_are_not_candidates() {
        let tracks = vec![
            TrackEvents {
                track_index: 0,
                name: None,
                events: vec![RawEvent::other(0)],
            },
            track_from_pitches(1, None, &[60, 62]),
        ];

        let ranked = rank_tracks(&tracks, None);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].track_index, 1);
        assert_eq!(ranked[0].track_name, "Track 1");
    }

    #[test]
    fn ties_prefer_lower_track_index() {
        let tracks = vec![
            track_from_pitches(0, Some("pad"), &[30, 31]),
            track_from_pitches(1, Some("keys"), &[30, 31]),
            track_from_pitches(2, Some("strings"), &[30, 31]),
        ];

        let ranked = rank_tracks(&tracks, None);
        let order: Vec<usize> = ranked.iter().map(|c| c.track_index).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(select_vocal_track(&ranked).map(|c| c.track_index), Some(0));
    }

    #[test]
    fn vocal_track_beats_busy_percussion() {
        // 50 notes walking around 55..75
        let vocal_pitches: Vec<u8> = (0..50u32).map(|i| 55 + ((i * 5) % 21) as u8).collect();
        // 400 hits on kick/snare/hat, all below the vocal band
        let drum_pitches: Vec<u8> = (0..400).map(|i| [35u8, 38, 42, 46][i % 4]).collect();

        let tracks = vec![
            track_from_pitches(0, None, &drum_pitches),
            track_from_pitches(1, Some("Vocal"), &vocal_pitches),
        ];

        let ranked = rank_tracks(&tracks, None);
        let best = select_vocal_track(&ranked).unwrap();
        assert_eq!(best.track_index, 1);
        assert_eq!(best.pitch_range, (55, 75));
        assert!(best.reasons[0].contains("Vocal"));
        assert!(best.reasons[1].contains("strongly"));

        let drums = &ranked[1];
        assert!(best.confidence_score >= drums.confidence_score + 55.0);
    }

    #[test]
    fn candidate_score_is_sum_of_reasons() {
        let pitches: Vec<u8> = (0..30).map(|i| 60 + (i % 7) as u8 * 2).collect();
        let track = track_from_pitches(3, Some("melody"), &pitches);

        let candidate = score_track(&track, Some(30)).unwrap();
        // name 30 + register 25 + lyric 20 + count 15; variety 2/29 fails
        assert_eq!(candidate.confidence_score, 90.0);
        assert_eq!(candidate.reasons.len(), 4);
        assert_eq!(candidate.note_count, 30);
    }
}
