//! The JSON document produced for every run.

use melody_features::{MelodyFeatures, ModeRecommendation};
use midi_analysis::TrackCandidate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::lyrics::LyricsOutcome;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub midi_path: PathBuf,
    pub lyrics_path: Option<PathBuf>,
    pub file_size: u64,
    pub track_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocalTrackAnalysis {
    pub selected_track: TrackCandidate,
    /// Every track with notes, best first.
    pub all_candidates: Vec<TrackCandidate>,
    pub selection_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalInfo {
    pub ticks_per_beat: u16,
    pub total_time: u64,
    pub format_type: u8,
}

/// Value of `analysis_type` on every success record.
pub const ANALYSIS_TYPE: &str = "professional";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSuccess {
    pub analysis_type: String,
    pub file_info: FileInfo,
    pub vocal_track_analysis: VocalTrackAnalysis,
    pub melody_features: MelodyFeatures,
    pub lyrics_analysis: Option<LyricsOutcome>,
    pub mode_recommendation: ModeRecommendation,
    pub technical_info: TechnicalInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FileNotFound,
    NoVocalTrack,
    NoNotes,
    AnalysisError,
    /// A config file could not be read or parsed; raised before analysis.
    ConfigError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// The error and each of its causes, outermost first.
    pub trace: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFailure {
    pub error_type: ErrorKind,
    pub message: String,
    /// RFC 3339 local time.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

impl AnalysisFailure {
    pub fn new(error_type: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
            timestamp: chrono::Local::now().to_rfc3339(),
            details: None,
        }
    }

    pub fn with_trace(mut self, trace: Vec<String>) -> Self {
        self.details = Some(ErrorDetails { trace });
        self
    }
}

/// Either a full analysis or a structured error; never a partial result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisReport {
    Success(Box<AnalysisSuccess>),
    Error(AnalysisFailure),
}

impl AnalysisReport {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

impl From<AnalysisFailure> for AnalysisReport {
    fn from(failure: AnalysisFailure) -> Self {
        Self::Error(failure)
    }
}
