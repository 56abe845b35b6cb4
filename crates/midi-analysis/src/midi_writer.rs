use crate::note::Note;
use serde::{Deserialize, Serialize};

/// Options for melody stem export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Emit a leading tempo track. Default: true.
    pub include_tempo_map: bool,
    /// Tempo written to the tempo track, in microseconds per beat. Default: 120 BPM.
    pub microseconds_per_beat: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_tempo_map: true,
            microseconds_per_beat: 500_000,
        }
    }
}

/// A named note list to become one MIDI track.
#[derive(Debug, Clone, Copy)]
pub struct StemTrack<'a> {
    pub name: Option<&'a str>,
    pub channel: u8,
    pub notes: &'a [Note],
}

/// Write note lists to Standard MIDI File format 1 bytes.
///
/// Track 0 is the tempo map when enabled; each stem follows as its own track
/// with an optional name and its note events.
pub fn notes_to_midi(
    stems: &[StemTrack<'_>],
    ticks_per_beat: u16,
    options: &ExportOptions,
) -> Vec<u8> {
    let mut tracks: Vec<Vec<u8>> = Vec::new();

    if options.include_tempo_map {
        tracks.push(build_tempo_track(options.microseconds_per_beat));
    }

    for stem in stems {
        tracks.push(build_note_track(stem));
    }

    build_midi_file(ticks_per_beat, &tracks)
}

fn build_tempo_track(usec: u32) -> Vec<u8> {
    let mut track_data = Vec::new();

    write_vlq(&mut track_data, 0);
    track_data.extend_from_slice(&[
        0xFF,
        0x51,
        0x03,
        (usec >> 16) as u8,
        (usec >> 8) as u8,
        usec as u8,
    ]);

    // End of track
    write_vlq(&mut track_data, 0);
    track_data.extend_from_slice(&[0xFF, 0x2F, 0x00]);

    track_data
}

/// Event ordering within a tick: releases of sounding notes, then onsets,
/// then releases of zero-length notes so they still pair with their onset.
fn event_rank(data: &[u8], zero_length: bool) -> u8 {
    let is_off = data.first().is_some_and(|b| b & 0xF0 == 0x80);
    match (is_off, zero_length) {
        (true, false) => 0,
        (false, _) => 1,
        (true, true) => 2,
    }
}

fn build_note_track(stem: &StemTrack<'_>) -> Vec<u8> {
    let channel = stem.channel & 0x0F;
    let mut events: Vec<(u64, u8, Vec<u8>)> = Vec::new();

    if let Some(name) = stem.name {
        let name_bytes = name.as_bytes();
        let mut name_event = vec![0xFF, 0x03];
        write_vlq(&mut name_event, name_bytes.len() as u32);
        name_event.extend_from_slice(name_bytes);
        events.push((0, 0, name_event));
    }

    for note in stem.notes {
        let zero_length = note.duration == 0;
        // Note-on velocity 0 would read back as a release
        let velocity = note.velocity.clamp(1, 127);
        let on = vec![0x90 | channel, note.pitch & 0x7F, velocity];
        let off = vec![0x80 | channel, note.pitch & 0x7F, 0];
        events.push((note.start_time, event_rank(&on, zero_length), on));
        events.push((note.end_time(), event_rank(&off, zero_length), off));
    }

    // Stable, so the track name stays first at tick 0
    events.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut track_data = Vec::new();
    let mut last_tick = 0u64;

    for (tick, _, data) in events {
        let delta = tick.saturating_sub(last_tick);
        write_vlq(&mut track_data, delta as u32);
        track_data.extend_from_slice(&data);
        last_tick = tick;
    }

    // End of track
    write_vlq(&mut track_data, 0);
    track_data.extend_from_slice(&[0xFF, 0x2F, 0x00]);

    track_data
}

/// Assemble a complete MIDI file from track data blobs.
fn build_midi_file(ticks_per_beat: u16, tracks: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = Vec::new();

    // MThd header
    buf.extend_from_slice(b"MThd");
    buf.extend_from_slice(&6u32.to_be_bytes());
    buf.extend_from_slice(&1u16.to_be_bytes()); // format 1
    buf.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    buf.extend_from_slice(&ticks_per_beat.to_be_bytes());

    for track_data in tracks {
        buf.extend_from_slice(b"MTrk");
        buf.extend_from_slice(&(track_data.len() as u32).to_be_bytes());
        buf.extend_from_slice(track_data);
    }

    buf
}

/// Write a variable-length quantity to a byte buffer.
fn write_vlq(buf: &mut Vec<u8>, mut value: u32) {
    if value == 0 {
        buf.push(0);
        return;
    }

    let mut bytes = Vec::new();
    bytes.push((value & 0x7F) as u8);
    value >>= 7;

    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }

    bytes.reverse();
    buf.extend_from_slice(&bytes);
}
