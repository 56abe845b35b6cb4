//! Lyric file structure: character counts and bracketed sections.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// A `[name]`-delimited block of lyric lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricSection {
    pub name: String,
    pub lines: Vec<String>,
    /// Alphabetic characters across `lines`.
    pub char_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricsAnalysis {
    /// Alphabetic characters in the whole file, headers included.
    pub total_chars: usize,
    /// Non-blank lines that don't start with `[`.
    pub total_lines: usize,
    pub sections: Vec<LyricSection>,
    pub has_structure_markers: bool,
}

/// Result of reading a lyric file. A failure is carried inline rather than
/// aborting the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LyricsOutcome {
    Parsed(LyricsAnalysis),
    Failed { error: String },
}

impl LyricsOutcome {
    /// Alphabetic character count, if the file was read and has any.
    pub fn total_chars(&self) -> Option<usize> {
        match self {
            Self::Parsed(analysis) if analysis.total_chars > 0 => Some(analysis.total_chars),
            _ => None,
        }
    }

    pub fn section_count(&self) -> usize {
        match self {
            Self::Parsed(analysis) => analysis.sections.len(),
            Self::Failed { .. } => 0,
        }
    }
}

fn alphabetic_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphabetic()).count()
}

/// Split lyric text into sections.
///
/// A trimmed line wrapped in brackets opens a section; following non-blank
/// lines belong to it until the next header. Lines before the first header
/// belong to no section.
pub fn parse_lyrics(content: &str) -> LyricsAnalysis {
    let mut sections = Vec::new();
    let mut current: Option<LyricSection> = None;
    let mut total_lines = 0;
    let mut has_structure_markers = false;

    for raw_line in content.split('\n') {
        if raw_line.starts_with('[') {
            has_structure_markers = true;
        }

        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if !line.starts_with('[') {
            total_lines += 1;
        }

        if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
            if let Some(section) = current.take() {
                sections.push(section);
            }
            current = Some(LyricSection {
                name: line[1..line.len() - 1].to_string(),
                lines: Vec::new(),
                char_count: 0,
            });
        } else if let Some(section) = current.as_mut() {
            section.char_count += alphabetic_count(line);
            section.lines.push(line.to_string());
        }
    }

    if let Some(section) = current {
        sections.push(section);
    }

    LyricsAnalysis {
        total_chars: alphabetic_count(content),
        total_lines,
        sections,
        has_structure_markers,
    }
}

/// Read and analyze a UTF-8 lyric file.
pub fn read_lyrics(path: &Path) -> LyricsOutcome {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let analysis = parse_lyrics(&content);
            debug!(
                path = %path.display(),
                chars = analysis.total_chars,
                sections = analysis.sections.len(),
                "analyzed lyrics"
            );
            LyricsOutcome::Parsed(analysis)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read lyric file");
            LyricsOutcome::Failed {
                error: format!("lyric analysis failed: {e}"),
            }
        }
    }
}
