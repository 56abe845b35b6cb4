//! songscout - find the lead vocal line in a MIDI file, describe it, and
//! recommend a songwriting workflow.
//!
//! ```rust,no_run
//! use songscout::{AnalysisRequest, SongScout};
//!
//! let request = AnalysisRequest::new("song.mid").with_lyrics("song.txt");
//! let report = SongScout::new().analyze(&request);
//! println!("{}", report.to_json(true).unwrap());
//! ```

pub mod engine;
pub mod lyrics;
pub mod report;
pub mod telemetry;

pub use engine::{export_melody, AnalysisRequest, ScoutError, SongScout};
pub use lyrics::{parse_lyrics, read_lyrics, LyricSection, LyricsAnalysis, LyricsOutcome};
pub use report::{
    AnalysisFailure, AnalysisReport, AnalysisSuccess, ErrorDetails, ErrorKind, FileInfo,
    TechnicalInfo, VocalTrackAnalysis,
};
