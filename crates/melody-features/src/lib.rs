pub mod analyzer;
pub mod complexity;
pub mod contour;
pub mod features;
pub mod intervals;
pub mod key;
pub mod recommend;
pub mod rhythm;
pub mod types;

pub use analyzer::{HeuristicAnalyzer, MelodyAnalyzer};
pub use complexity::{
    complexity_score, try_complexity, ComplexityBreakdown, ComplexityError, FALLBACK_COMPLEXITY,
};
pub use features::extract_features;
pub use key::{PENTATONIC_SCALES, UNKNOWN_KEY};
pub use recommend::{
    fallback_recommendation, recommend_for, recommend_mode, try_recommend, RecommendError,
};
pub use types::{
    AlternativeMode, AuthoringMode, ContourAnalysis, IntervalAnalysis, IntervalDistribution,
    KeyModeAnalysis, MelodyFeatures, ModeConfidences, ModeRecommendation, RhythmAnalysis,
    RhythmPatterns,
};
