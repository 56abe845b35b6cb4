//! End-to-end analysis over MIDI files synthesized into temp directories.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use melody_features::{
    AuthoringMode, ContourAnalysis, IntervalAnalysis, KeyModeAnalysis, MelodyAnalyzer,
    ModeConfidences, RhythmAnalysis,
};
use midi_analysis::{build_notes, notes_to_midi, read_midi, ExportOptions, Note, StemTrack};
use pretty_assertions::assert_eq;
use songscout::{
    AnalysisReport, AnalysisRequest, AnalysisSuccess, ErrorKind, LyricsOutcome, SongScout,
};
use tempfile::TempDir;

fn sequential_notes(pitches: &[u8], duration: u64) -> Vec<Note> {
    pitches
        .iter()
        .enumerate()
        .map(|(i, &pitch)| Note {
            pitch,
            start_time: i as u64 * duration,
            duration,
            velocity: 96,
        })
        .collect()
}

fn write_midi(
    dir: &TempDir,
    file_name: &str,
    stems: &[StemTrack<'_>],
    options: &ExportOptions,
) -> PathBuf {
    let path = dir.path().join(file_name);
    let bytes = notes_to_midi(stems, 480, options);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn write_text(dir: &TempDir, file_name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(file_name);
    std::fs::write(&path, text).unwrap();
    path
}

fn expect_success(report: AnalysisReport) -> AnalysisSuccess {
    match report {
        AnalysisReport::Success(success) => *success,
        AnalysisReport::Error(failure) => panic!("expected success, got {failure:?}"),
    }
}

fn expect_error(report: AnalysisReport, kind: ErrorKind) {
    match report {
        AnalysisReport::Error(failure) => assert_eq!(failure.error_type, kind),
        AnalysisReport::Success(_) => panic!("expected {kind:?} error"),
    }
}

fn vocal_and_drums(dir: &TempDir) -> PathBuf {
    let vocal_pitches: Vec<u8> = (0..50u32).map(|i| 55 + ((i * 5) % 21) as u8).collect();
    let vocal = sequential_notes(&vocal_pitches, 240);

    let drum_pitches: Vec<u8> = [35u8, 38, 42, 46]
        .iter()
        .copied()
        .cycle()
        .take(400)
        .collect();
    let drums = sequential_notes(&drum_pitches, 60);

    write_midi(
        dir,
        "band.mid",
        &[
            StemTrack {
                name: Some("Vocal"),
                channel: 0,
                notes: &vocal,
            },
            StemTrack {
                name: None,
                channel: 9,
                notes: &drums,
            },
        ],
        &ExportOptions::default(),
    )
}

#[test]
fn pentatonic_line_recommends_express() {
    let dir = TempDir::new().unwrap();
    let notes = sequential_notes(&[60, 62, 64, 67, 69], 480);
    let midi = write_midi(
        &dir,
        "line.mid",
        &[StemTrack {
            name: None,
            channel: 0,
            notes: &notes,
        }],
        &ExportOptions {
            include_tempo_map: false,
            ..Default::default()
        },
    );
    let lyrics = write_text(&dir, "line.txt", "[Verse]\nhello\n");

    let request = AnalysisRequest::new(&midi).with_lyrics(&lyrics);
    let success = expect_success(SongScout::new().analyze(&request));

    assert_eq!(success.analysis_type, "professional");
    assert_eq!(success.file_info.track_count, 1);

    let tracks = &success.vocal_track_analysis;
    assert_eq!(tracks.selected_track.track_index, 0);
    assert_eq!(tracks.selected_track.track_name, "Track 0");
    assert_eq!(tracks.all_candidates.len(), 1);

    let features = &success.melody_features;
    assert_eq!(features.total_notes, 5);
    assert_eq!(features.inferred_key, "C");
    assert_eq!(features.rhythm_complexity, 1);
    assert_eq!(features.rhythm_pattern_ratios.quarter, 1.0);
    // +2 +2 +3 +2
    assert_eq!(features.stepwise_ratio, 0.75);
    assert_eq!(features.leap_ratio, 0.25);
    assert_eq!(features.phrase_boundaries, vec![(0, 4)]);

    let recommendation = &success.mode_recommendation;
    assert_eq!(recommendation.recommended, AuthoringMode::Express);
    assert_eq!(recommendation.lyric_section_count, 1);
    assert_eq!(recommendation.alternatives.len(), 3);

    assert_eq!(success.technical_info.ticks_per_beat, 480);
    assert_eq!(success.technical_info.format_type, 1);
    assert_eq!(success.technical_info.total_time, 5 * 480);
}

#[test]
fn named_vocal_beats_percussion() {
    let dir = TempDir::new().unwrap();
    let midi = vocal_and_drums(&dir);

    let success = expect_success(SongScout::new().analyze(&AnalysisRequest::new(&midi)));
    let tracks = &success.vocal_track_analysis;

    assert_eq!(tracks.selected_track.track_name, "Vocal");
    assert_eq!(tracks.selected_track.pitch_range, (55, 75));
    assert_eq!(tracks.all_candidates.len(), 2);

    let drums = &tracks.all_candidates[1];
    assert!(tracks.selection_confidence >= drums.confidence_score + 50.0);

    let reasons = &tracks.selected_track.reasons;
    assert!(reasons[0].contains("Vocal"));
    assert!(reasons[1].contains("register strongly matches"));
}

#[test]
fn tempo_only_file_has_no_vocal_track() {
    let dir = TempDir::new().unwrap();
    let midi = write_midi(&dir, "empty.mid", &[], &ExportOptions::default());

    expect_error(
        SongScout::new().analyze(&AnalysisRequest::new(&midi)),
        ErrorKind::NoVocalTrack,
    );
}

#[test]
fn zero_ticks_per_beat_is_an_analysis_error() {
    let dir = TempDir::new().unwrap();
    let notes = sequential_notes(&[60, 62, 64, 67, 69], 480);
    let stem = StemTrack {
        name: Some("Vocal"),
        channel: 0,
        notes: &notes,
    };
    let midi = dir.path().join("flat.mid");
    let bytes = notes_to_midi(&[stem], 0, &ExportOptions::default());
    std::fs::write(&midi, bytes).unwrap();

    let report = SongScout::new().analyze(&AnalysisRequest::new(&midi));
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["error_type"], "analysis_error");
    assert!(json.get("melody_features").is_none());
}

#[test]
fn unreadable_lyrics_degrade_inline() {
    let dir = TempDir::new().unwrap();
    let midi = vocal_and_drums(&dir);
    let lyrics = dir.path().join("missing.txt");
    let request = AnalysisRequest::new(&midi).with_lyrics(lyrics);

    let success = expect_success(SongScout::new().analyze(&request));
    assert!(matches!(
        success.lyrics_analysis,
        Some(LyricsOutcome::Failed { .. })
    ));
    assert_eq!(success.mode_recommendation.lyric_section_count, 0);

    let report = AnalysisReport::Success(Box::new(success));
    let json = serde_json::to_value(report).unwrap();
    assert_eq!(json["status"], "success");
    assert!(json["lyrics_analysis"]["error"].is_string());
}

#[test]
fn success_envelope_fields() {
    let dir = TempDir::new().unwrap();
    let midi = vocal_and_drums(&dir);

    let report = SongScout::new().analyze(&AnalysisRequest::new(&midi));
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["status"], "success");
    assert_eq!(json["analysis_type"], "professional");
    for key in [
        "file_info",
        "vocal_track_analysis",
        "melody_features",
        "lyrics_analysis",
        "mode_recommendation",
        "technical_info",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert!(json["lyrics_analysis"].is_null());

    let file_size = std::fs::metadata(&midi).unwrap().len();
    assert_eq!(json["file_info"]["file_size"], file_size);

    let selected = &json["vocal_track_analysis"]["selected_track"];
    assert_eq!(selected["track_index"], 1);
}

#[test]
fn melody_export_round_trips() {
    let dir = TempDir::new().unwrap();
    let midi = vocal_and_drums(&dir);
    let stem = dir.path().join("vocal-stem.mid");

    let request = AnalysisRequest::new(&midi).with_melody_export(&stem);
    let success = expect_success(SongScout::new().analyze(&request));

    let parsed = read_midi(&std::fs::read(&stem).unwrap()).unwrap();
    let exported = parsed
        .tracks
        .iter()
        .find(|t| t.name.as_deref() == Some("Vocal"))
        .expect("named stem track");

    let exported_notes = build_notes(&exported.events);
    assert_eq!(exported_notes.len(), success.melody_features.total_notes);
}

#[test]
fn failed_melody_export_keeps_report() {
    let dir = TempDir::new().unwrap();
    let midi = vocal_and_drums(&dir);
    let stem = dir.path().join("no-such-dir").join("stem.mid");

    let request = AnalysisRequest::new(&midi).with_melody_export(&stem);
    let report = SongScout::new().analyze(&request);
    assert!(report.is_success());
    assert!(!Path::new(&stem).exists());
}

/// Reports every melody as tonally ambiguous.
struct Ambiguous;

impl MelodyAnalyzer for Ambiguous {
    fn analyze_rhythm(&self, _notes: &[Note], _ticks_per_beat: u16) -> RhythmAnalysis {
        RhythmAnalysis::default()
    }

    fn analyze_intervals(&self, _notes: &[Note]) -> IntervalAnalysis {
        IntervalAnalysis::default()
    }

    fn analyze_key(&self, _notes: &[Note]) -> KeyModeAnalysis {
        KeyModeAnalysis {
            inferred_key: "C".to_string(),
            mode_confidences: ModeConfidences {
                pentatonic: 0.0,
                major: 0.0,
                minor: 0.0,
            },
            scale_pitch_classes: Vec::new(),
        }
    }

    fn analyze_contour(&self, _notes: &[Note], _ticks_per_beat: u16) -> ContourAnalysis {
        ContourAnalysis::default()
    }
}

#[test]
fn custom_analyzer_with_sectioned_lyrics_recommends_coach() {
    let dir = TempDir::new().unwrap();
    let midi = vocal_and_drums(&dir);
    let lyrics = write_text(
        &dir,
        "song.txt",
        "[Verse 1]\nla\n[Chorus]\nla\n[Verse 2]\nla\n[Bridge]\nla\n",
    );

    let scout = SongScout::with_analyzer(Arc::new(Ambiguous));
    let request = AnalysisRequest::new(&midi).with_lyrics(&lyrics);
    let success = expect_success(scout.analyze(&request));

    let recommendation = success.mode_recommendation;
    assert_eq!(recommendation.complexity_score, 30.0);
    assert_eq!(recommendation.lyric_section_count, 4);
    assert_eq!(recommendation.recommended, AuthoringMode::Coach);
}
