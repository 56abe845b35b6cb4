pub mod analyze;
pub mod midi_writer;
pub mod note;
pub mod track_score;

pub use analyze::{read_midi, MidiFileContext, ParsedMidi, TrackEvents};
pub use midi_writer::{notes_to_midi, ExportOptions, StemTrack};
pub use note::{build_notes, pitch_range, Note, RawEvent, RawEventKind, DEFAULT_VELOCITY};
pub use track_score::{
    rank_tracks, score_track, select_vocal_track, Signal, SignalOutcome, TrackCandidate,
    VOCAL_KEYWORDS, VOCAL_RANGE,
};

/// Errors from MIDI analysis operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("MIDI parse error: {0}")]
    MidiParse(String),

    #[error("MIDI header declares zero ticks per beat")]
    ZeroResolution,
}

pub type Result<T> = std::result::Result<T, Error>;
