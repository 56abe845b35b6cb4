use tracing::warn;

use crate::types::MelodyFeatures;

/// Score used when the features can't be scored.
pub const FALLBACK_COMPLEXITY: f64 = 30.0;

const RHYTHM_CAP: f64 = 40.0;
const INTERVAL_CAP: f64 = 30.0;
const MODAL_WEIGHT: f64 = 30.0;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ComplexityError {
    #[error("{field} is not a finite number ({value})")]
    NonFinite { field: &'static str, value: f64 },
}

/// Per-component contributions to the complexity score.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexityBreakdown {
    pub rhythm: f64,
    pub interval: f64,
    pub modal: f64,
    /// Sum of the components, clamped to 0..=100.
    pub total: f64,
}

fn finite(field: &'static str, value: f64) -> Result<f64, ComplexityError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ComplexityError::NonFinite { field, value })
    }
}

/// Score the features, failing if any consumed value is NaN or infinite.
///
/// The rhythm and interval terms multiply 0..1 ratios by 0.4 and 0.3, so in
/// practice the modal term dominates.
pub fn try_complexity(features: &MelodyFeatures) -> Result<ComplexityBreakdown, ComplexityError> {
    let syncopation = finite("syncopation_ratio", features.syncopation_ratio)?;
    let sixteenth = finite("sixteenth_ratio", features.rhythm_pattern_ratios.sixteenth)?;
    let large_leap = finite(
        "large_leap_ratio",
        features
            .interval_ratio_distribution
            .as_ref()
            .map(|d| d.large_leap)
            .unwrap_or(0.0),
    )?;
    let max_confidence = finite("mode_confidence", features.mode_confidences.max())?;

    let rhythm = ((syncopation + sixteenth) * 0.4).min(RHYTHM_CAP);
    let interval = (large_leap * 0.3).min(INTERVAL_CAP);
    let modal = (1.0 - max_confidence) * MODAL_WEIGHT;

    Ok(ComplexityBreakdown {
        rhythm,
        interval,
        modal,
        total: (rhythm + interval + modal).clamp(0.0, 100.0),
    })
}

/// Complexity on a 0..=100 scale, or [`FALLBACK_COMPLEXITY`] on failure.
pub fn complexity_score(features: &MelodyFeatures) -> f64 {
    match try_complexity(features) {
        Ok(breakdown) => breakdown.total,
        Err(e) => {
            warn!(error = %e, fallback = FALLBACK_COMPLEXITY, "complexity scoring failed");
            FALLBACK_COMPLEXITY
        }
    }
}
