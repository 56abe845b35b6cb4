use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Velocity assumed for events that don't carry one.
pub const DEFAULT_VELOCITY: u8 = 64;

/// What a raw track event does, as far as note pairing cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawEventKind {
    NoteOn,
    NoteOff,
    /// Any non-note event. Only its delta time matters.
    Other,
}

/// A single timed event from one track, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub kind: RawEventKind,
    pub pitch: u8,
    pub velocity: Option<u8>,
    /// Ticks since the previous event in the same track.
    pub delta_time: u32,
}

impl RawEvent {
    pub fn note_on(pitch: u8, velocity: u8, delta_time: u32) -> Self {
        Self {
            kind: RawEventKind::NoteOn,
            pitch,
            velocity: Some(velocity),
            delta_time,
        }
    }

    pub fn note_off(pitch: u8, delta_time: u32) -> Self {
        Self {
            kind: RawEventKind::NoteOff,
            pitch,
            velocity: Some(0),
            delta_time,
        }
    }

    pub fn other(delta_time: u32) -> Self {
        Self {
            kind: RawEventKind::Other,
            pitch: 0,
            velocity: None,
            delta_time,
        }
    }

    fn velocity_or_default(&self) -> u8 {
        self.velocity.unwrap_or(DEFAULT_VELOCITY)
    }

    /// A note-on with velocity zero is a note-off in disguise.
    fn starts_note(&self) -> bool {
        self.kind == RawEventKind::NoteOn && self.velocity_or_default() > 0
    }

    fn stops_note(&self) -> bool {
        match self.kind {
            RawEventKind::NoteOff => true,
            RawEventKind::NoteOn => !self.starts_note(),
            RawEventKind::Other => false,
        }
    }
}

/// A reconstructed note with absolute tick timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub pitch: u8,
    pub start_time: u64,
    pub duration: u64,
    pub velocity: u8,
}

impl Note {
    pub fn end_time(&self) -> u64 {
        self.start_time + self.duration
    }
}

/// Pair note-on/note-off events of one track into notes.
///
/// Only the most recent unmatched start per pitch is remembered: a second
/// note-on for a pitch that is already sounding replaces the pending start,
/// and the earlier one never becomes a note. Stops with nothing pending are
/// ignored, as are starts that never see a stop. The note takes its velocity
/// from the stop event. Output is ordered by start time, ties keeping the
/// order in which the notes closed.
pub fn build_notes(events: &[RawEvent]) -> Vec<Note> {
    let mut current_time: u64 = 0;
    let mut active: HashMap<u8, u64> = HashMap::new();
    let mut notes = Vec::new();

    for event in events {
        current_time += event.delta_time as u64;

        if event.starts_note() {
            active.insert(event.pitch, current_time);
        } else if event.stops_note() {
            if let Some(start_time) = active.remove(&event.pitch) {
                notes.push(Note {
                    pitch: event.pitch,
                    start_time,
                    duration: current_time - start_time,
                    velocity: event.velocity_or_default(),
                });
            }
        }
    }

    // sort_by_key is stable
    notes.sort_by_key(|n| n.start_time);
    notes
}

/// Lowest and highest pitch of a note list.
pub fn pitch_range(notes: &[Note]) -> Option<(u8, u8)> {
    let min = notes.iter().map(|n| n.pitch).min()?;
    let max = notes.iter().map(|n| n.pitch).max()?;
    Some((min, max))
}
