//! Pipeline orchestration: read, pick the vocal track, extract features,
//! recommend a mode.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use melody_features::{extract_features, recommend_for, HeuristicAnalyzer, MelodyAnalyzer};
use midi_analysis::{
    build_notes, notes_to_midi, rank_tracks, read_midi, select_vocal_track, ExportOptions, Note,
    StemTrack,
};
use tracing::{info, warn};

use crate::lyrics::read_lyrics;
use crate::report::{
    AnalysisFailure, AnalysisReport, AnalysisSuccess, ErrorKind, FileInfo, TechnicalInfo,
    VocalTrackAnalysis, ANALYSIS_TYPE,
};

/// Terminal failures of a run; each maps to one error envelope kind.
#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    #[error("MIDI file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("no suitable vocal track found")]
    NoVocalTrack,

    #[error("no notes found in vocal track {track_index}")]
    NoNotes { track_index: usize },

    #[error("analysis failed: {0:#}")]
    Analysis(#[from] anyhow::Error),
}

impl ScoutError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound(_) => ErrorKind::FileNotFound,
            Self::NoVocalTrack => ErrorKind::NoVocalTrack,
            Self::NoNotes { .. } => ErrorKind::NoNotes,
            Self::Analysis(_) => ErrorKind::AnalysisError,
        }
    }

    /// Convert to an error envelope; unexpected failures carry their cause chain.
    pub fn into_failure(self) -> AnalysisFailure {
        let failure = AnalysisFailure::new(self.kind(), self.to_string());
        match self {
            Self::Analysis(err) => {
                let trace = err.chain().map(|e| e.to_string()).collect();
                failure.with_trace(trace)
            }
            _ => failure,
        }
    }
}

/// What to analyze.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub midi_path: PathBuf,
    pub lyrics_path: Option<PathBuf>,
    /// Also write the selected track's notes here as a MIDI file.
    pub export_melody: Option<PathBuf>,
}

impl AnalysisRequest {
    pub fn new(midi_path: impl Into<PathBuf>) -> Self {
        Self {
            midi_path: midi_path.into(),
            ..Default::default()
        }
    }

    pub fn with_lyrics(mut self, path: impl Into<PathBuf>) -> Self {
        self.lyrics_path = Some(path.into());
        self
    }

    pub fn with_melody_export(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_melody = Some(path.into());
        self
    }
}

/// Vocal melody analysis engine.
pub struct SongScout {
    analyzer: Arc<dyn MelodyAnalyzer>,
}

impl Default for SongScout {
    fn default() -> Self {
        Self::new()
    }
}

impl SongScout {
    /// Create with the default heuristic analyzer.
    pub fn new() -> Self {
        Self {
            analyzer: Arc::new(HeuristicAnalyzer),
        }
    }

    /// Create with a custom feature analyzer.
    pub fn with_analyzer(analyzer: Arc<dyn MelodyAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// Run the full pipeline. Every failure is reported as an error envelope.
    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisReport {
        match self.run(request) {
            Ok(success) => AnalysisReport::Success(Box::new(success)),
            Err(e) => {
                warn!(path = %request.midi_path.display(), error = %e, "analysis failed");
                e.into_failure().into()
            }
        }
    }

    fn run(&self, request: &AnalysisRequest) -> Result<AnalysisSuccess, ScoutError> {
        let midi_path = &request.midi_path;

        let metadata = match std::fs::metadata(midi_path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScoutError::FileNotFound(midi_path.clone()));
            }
            Err(e) => {
                let action = format!("inspecting {}", midi_path.display());
                return Err(anyhow::Error::new(e).context(action).into());
            }
        };

        let bytes = std::fs::read(midi_path)
            .with_context(|| format!("reading {}", midi_path.display()))?;
        let parsed = read_midi(&bytes).context("parsing MIDI file")?;
        let context = &parsed.context;

        info!(
            path = %midi_path.display(),
            tracks = context.track_count,
            ticks_per_beat = context.ticks_per_beat,
            "loaded MIDI file"
        );

        let lyrics = request.lyrics_path.as_deref().map(read_lyrics);
        let lyric_chars = lyrics.as_ref().and_then(|l| l.total_chars());

        let candidates = rank_tracks(&parsed.tracks, lyric_chars);
        let selected = select_vocal_track(&candidates)
            .cloned()
            .ok_or(ScoutError::NoVocalTrack)?;

        info!(
            track = selected.track_index,
            name = %selected.track_name,
            score = selected.confidence_score,
            "selected vocal track"
        );

        let track = parsed
            .tracks
            .iter()
            .find(|t| t.track_index == selected.track_index)
            .ok_or_else(|| anyhow!("selected track {} is missing", selected.track_index))?;

        let notes = build_notes(&track.events);
        if notes.is_empty() {
            return Err(ScoutError::NoNotes {
                track_index: selected.track_index,
            });
        }

        let features = extract_features(self.analyzer.as_ref(), &notes, context.ticks_per_beat);

        let section_count = lyrics.as_ref().map(|l| l.section_count()).unwrap_or(0);
        let mode_recommendation = recommend_for(&features, section_count);

        if let Some(path) = &request.export_melody {
            let ticks_per_beat = context.ticks_per_beat;
            match export_melody(path, &selected.track_name, &notes, ticks_per_beat) {
                Ok(()) => {
                    info!(path = %path.display(), notes = notes.len(), "exported melody stem");
                }
                Err(e) => {
                    let error = format!("{e:#}");
                    warn!(path = %path.display(), %error, "melody export failed");
                }
            }
        }

        Ok(AnalysisSuccess {
            analysis_type: ANALYSIS_TYPE.to_string(),
            file_info: FileInfo {
                midi_path: midi_path.clone(),
                lyrics_path: request.lyrics_path.clone(),
                file_size: metadata.len(),
                track_count: context.track_count,
            },
            vocal_track_analysis: VocalTrackAnalysis {
                selection_confidence: selected.confidence_score,
                selected_track: selected,
                all_candidates: candidates,
            },
            melody_features: features,
            lyrics_analysis: lyrics,
            mode_recommendation,
            technical_info: TechnicalInfo {
                ticks_per_beat: context.ticks_per_beat,
                total_time: context.total_time,
                format_type: context.format,
            },
        })
    }
}

/// Write one track's notes as a standalone MIDI file.
pub fn export_melody(
    path: &Path,
    track_name: &str,
    notes: &[Note],
    ticks_per_beat: u16,
) -> anyhow::Result<()> {
    let stem = StemTrack {
        name: Some(track_name),
        channel: 0,
        notes,
    };
    let bytes = notes_to_midi(&[stem], ticks_per_beat, &ExportOptions::default());
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}
