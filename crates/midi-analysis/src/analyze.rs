use crate::note::{RawEvent, RawEventKind};
use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};
use serde::{Deserialize, Serialize};

/// Resolution used when a file carries SMPTE timecode instead of metrical timing.
pub const FALLBACK_TICKS_PER_BEAT: u16 = 480;

/// File-level timing and structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiFileContext {
    pub ticks_per_beat: u16,
    pub format: u8,
    pub track_count: usize,
    /// Sum of every delta time in every track.
    pub total_time: u64,
}

/// One track's events, owned and detached from the source bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackEvents {
    pub track_index: usize,
    pub name: Option<String>,
    pub events: Vec<RawEvent>,
}

impl TrackEvents {
    /// Display name, falling back to `Track {index}` for unnamed tracks.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("Track {}", self.track_index),
        }
    }
}

/// A parsed Standard MIDI File reduced to what the melody pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMidi {
    pub context: MidiFileContext,
    pub tracks: Vec<TrackEvents>,
}

/// Parse SMF bytes into per-track raw event lists.
///
/// A metrical header with zero ticks per beat is rejected.
pub fn read_midi(midi_bytes: &[u8]) -> crate::Result<ParsedMidi> {
    let smf = Smf::parse(midi_bytes).map_err(|e| crate::Error::MidiParse(e.to_string()))?;
    let parsed = parse_tracks(&smf);
    if parsed.context.ticks_per_beat == 0 {
        return Err(crate::Error::ZeroResolution);
    }
    Ok(parsed)
}

/// Convert an already-parsed `Smf` into owned track event lists.
pub fn parse_tracks(smf: &Smf) -> ParsedMidi {
    let ticks_per_beat = match smf.header.timing {
        midly::Timing::Metrical(ticks) => ticks.as_int(),
        midly::Timing::Timecode(_, _) => FALLBACK_TICKS_PER_BEAT,
    };

    let format = match smf.header.format {
        midly::Format::SingleTrack => 0,
        midly::Format::Parallel => 1,
        midly::Format::Sequential => 2,
    };

    let mut total_time: u64 = 0;

    let tracks: Vec<TrackEvents> = smf
        .tracks
        .iter()
        .enumerate()
        .map(|(track_index, track)| {
            let mut name = None;
            let mut events = Vec::with_capacity(track.len());

            for event in track {
                let delta_time = event.delta.as_int();
                total_time += delta_time as u64;

                let raw = match event.kind {
                    TrackEventKind::Midi { message, .. } => match message {
                        MidiMessage::NoteOn { key, vel } => RawEvent {
                            kind: RawEventKind::NoteOn,
                            pitch: key.as_int(),
                            velocity: Some(vel.as_int()),
                            delta_time,
                        },
                        MidiMessage::NoteOff { key, vel } => RawEvent {
                            kind: RawEventKind::NoteOff,
                            pitch: key.as_int(),
                            velocity: Some(vel.as_int()),
                            delta_time,
                        },
                        _ => RawEvent::other(delta_time),
                    },
                    TrackEventKind::Meta(MetaMessage::TrackName(bytes)) => {
                        if name.is_none() {
                            name = Some(String::from_utf8_lossy(bytes).into_owned());
                        }
                        RawEvent::other(delta_time)
                    }
                    _ => RawEvent::other(delta_time),
                };

                events.push(raw);
            }

            TrackEvents {
                track_index,
                name,
                events,
            }
        })
        .collect();

    ParsedMidi {
        context: MidiFileContext {
            ticks_per_beat,
            format,
            track_count: smf.tracks.len(),
            total_time,
        },
        tracks,
    }
}
