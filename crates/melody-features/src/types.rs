use serde::{Deserialize, Serialize};

/// Share of notes falling in each duration bucket.
///
/// Durations that match no bucket aren't counted, so the ratios can sum
/// to less than one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RhythmPatterns {
    pub whole: f64,
    pub half: f64,
    pub quarter: f64,
    pub eighth: f64,
    pub sixteenth: f64,
    pub dotted: f64,
    pub triplet: f64,
}

impl RhythmPatterns {
    pub fn values(&self) -> [f64; 7] {
        [
            self.whole,
            self.half,
            self.quarter,
            self.eighth,
            self.sixteenth,
            self.dotted,
            self.triplet,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RhythmAnalysis {
    /// Number of buckets holding more than 5% of notes.
    pub complexity: usize,
    pub patterns: RhythmPatterns,
    pub syncopation_ratio: f64,
}

/// Share of consecutive intervals in each size class. Sums to one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntervalDistribution {
    pub unison: f64,
    pub step: f64,
    pub small_leap: f64,
    pub large_leap: f64,
    pub octave: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntervalAnalysis {
    /// `None` when there are fewer than two notes; written as `{}`.
    #[serde(with = "empty_when_none")]
    pub distribution: Option<IntervalDistribution>,
    pub stepwise_ratio: f64,
    /// Small and large leaps; octaves are counted separately.
    pub leap_ratio: f64,
}

/// An absent distribution is an empty JSON object rather than `null`.
mod empty_when_none {
    use super::IntervalDistribution;
    use serde::de::IgnoredAny;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Full(IntervalDistribution),
        Empty(IgnoredAny),
    }

    pub fn serialize<S>(
        value: &Option<IntervalDistribution>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(distribution) => distribution.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<IntervalDistribution>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Repr::deserialize(deserializer)? {
            Repr::Full(distribution) => Ok(Some(distribution)),
            Repr::Empty(_) => Ok(None),
        }
    }
}

/// Per-mode fit. Only `pentatonic` is measured; `major` and `minor` are
/// fixed placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeConfidences {
    pub pentatonic: f64,
    pub major: f64,
    pub minor: f64,
}

impl ModeConfidences {
    pub fn values(&self) -> [f64; 3] {
        [self.pentatonic, self.major, self.minor]
    }

    pub fn max(&self) -> f64 {
        self.values().into_iter().fold(f64::NEG_INFINITY, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyModeAnalysis {
    /// Root of the best-fitting pentatonic scale, e.g. "G" or "Eb".
    pub inferred_key: String,
    pub mode_confidences: ModeConfidences,
    /// The five scale members in template order.
    pub scale_pitch_classes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContourAnalysis {
    /// Direction of each step: -1 down, 0 level, +1 up.
    pub contour_vector: Vec<i8>,
    /// Inclusive (first, last) note indices of each phrase.
    pub phrase_boundaries: Vec<(usize, usize)>,
}

/// Everything the recommender knows about the selected melody.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MelodyFeatures {
    pub total_notes: usize,
    pub pitch_range: (u8, u8),
    pub duration_in_beats: f64,

    pub rhythm_complexity: usize,
    pub rhythm_pattern_ratios: RhythmPatterns,
    pub syncopation_ratio: f64,

    #[serde(with = "empty_when_none")]
    pub interval_ratio_distribution: Option<IntervalDistribution>,
    pub stepwise_ratio: f64,
    pub leap_ratio: f64,

    pub inferred_key: String,
    pub mode_confidences: ModeConfidences,
    pub scale_pitch_classes: Vec<String>,

    pub contour_vector: Vec<i8>,
    pub phrase_boundaries: Vec<(usize, usize)>,
}

/// Songwriting workflow a user is steered towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthoringMode {
    Express,
    Professional,
    Coach,
    Expert,
}

impl AuthoringMode {
    /// All modes in the order alternatives are listed.
    pub const ALL: [AuthoringMode; 4] = [
        AuthoringMode::Express,
        AuthoringMode::Professional,
        AuthoringMode::Coach,
        AuthoringMode::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Express => "express",
            Self::Professional => "professional",
            Self::Coach => "coach",
            Self::Expert => "expert",
        }
    }

    /// Why someone might pick this mode anyway.
    pub fn alternative_reason(&self) -> &'static str {
        match self {
            Self::Express => "use for quick prototypes or demos",
            Self::Professional => "general choice balancing quality and efficiency",
            Self::Coach => "use for learning songwriting craft or deeply personal expression",
            Self::Expert => "full control of the creative process for professional production",
        }
    }
}

impl std::fmt::Display for AuthoringMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeMode {
    pub mode: AuthoringMode,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeRecommendation {
    pub recommended: AuthoringMode,
    pub complexity_score: f64,
    pub reasoning: String,
    pub lyric_section_count: usize,
    pub alternatives: Vec<AlternativeMode>,
    /// Set only on the fallback path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
