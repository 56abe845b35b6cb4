use tracing::{info, warn};

use crate::complexity::complexity_score;
use crate::types::{AlternativeMode, AuthoringMode, MelodyFeatures, ModeRecommendation};

/// At or above this score the melody needs fine control.
pub const EXPERT_THRESHOLD: f64 = 60.0;
/// At or below this score the melody can be generated automatically.
pub const EXPRESS_THRESHOLD: f64 = 25.0;
/// Lyric sections needed to suggest coached, step-by-step writing.
pub const COACH_SECTION_COUNT: usize = 4;

/// Complexity reported by the fallback recommendation.
pub const FALLBACK_COMPLEXITY_SCORE: f64 = 50.0;

const FALLBACK_REASONING: &str =
    "analysis ran into a problem; professional mode is the general-purpose choice";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RecommendError {
    #[error("complexity score is not a finite number ({0})")]
    NonFiniteComplexity(f64),
}

/// Pick an authoring mode; the first matching rule wins.
pub fn try_recommend(
    complexity: f64,
    section_count: usize,
) -> Result<ModeRecommendation, RecommendError> {
    if !complexity.is_finite() {
        return Err(RecommendError::NonFiniteComplexity(complexity));
    }

    let (recommended, reasoning) = if complexity >= EXPERT_THRESHOLD {
        let reasoning = format!(
            "high melodic complexity ({complexity:.1}/100); \
             expert mode gives fine-grained control"
        );
        (AuthoringMode::Expert, reasoning)
    } else if complexity <= EXPRESS_THRESHOLD {
        let reasoning = format!(
            "relatively simple melody ({complexity:.1}/100); \
             suited to automatic generation in express mode"
        );
        (AuthoringMode::Express, reasoning)
    } else if section_count >= COACH_SECTION_COUNT {
        let reasoning = format!(
            "complex song structure ({section_count} sections); \
             coach mode works through it step by step"
        );
        (AuthoringMode::Coach, reasoning)
    } else {
        let reasoning = format!(
            "moderate melodic complexity ({complexity:.1}/100); \
             professional mode balances efficiency and quality"
        );
        (AuthoringMode::Professional, reasoning)
    };

    let alternatives = AuthoringMode::ALL
        .iter()
        .filter(|&&mode| mode != recommended)
        .map(|&mode| AlternativeMode {
            mode,
            reason: mode.alternative_reason().to_string(),
        })
        .collect();

    Ok(ModeRecommendation {
        recommended,
        complexity_score: complexity,
        reasoning,
        lyric_section_count: section_count,
        alternatives,
        error: None,
    })
}

/// Fixed recommendation returned when the decision itself fails.
pub fn fallback_recommendation(error: &RecommendError) -> ModeRecommendation {
    ModeRecommendation {
        recommended: AuthoringMode::Professional,
        complexity_score: FALLBACK_COMPLEXITY_SCORE,
        reasoning: FALLBACK_REASONING.to_string(),
        lyric_section_count: 0,
        alternatives: Vec::new(),
        error: Some(format!("recommendation failed: {error}")),
    }
}

/// Like [`try_recommend`], substituting the fallback record on failure.
pub fn recommend_mode(complexity: f64, section_count: usize) -> ModeRecommendation {
    match try_recommend(complexity, section_count) {
        Ok(recommendation) => {
            info!(
                mode = %recommendation.recommended,
                complexity,
                section_count,
                "recommended authoring mode"
            );
            recommendation
        }
        Err(e) => {
            warn!(error = %e, "mode recommendation failed, using fallback");
            fallback_recommendation(&e)
        }
    }
}

/// Score the features and recommend a mode in one step.
pub fn recommend_for(features: &MelodyFeatures, section_count: usize) -> ModeRecommendation {
    recommend_mode(complexity_score(features), section_count)
}
