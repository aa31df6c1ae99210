//! Organ-function and interaction risk scoring.
//!
//! `raw = (1 - organ_function) * toxicity_multiplier * trend_factor`,
//! normalized by `NORMALIZATION_CEILING`. The constants below define the
//! comparability of stored scores and must not drift.

use serde::{Deserialize, Serialize};

use crate::models::enums::{AlertSeverity, LabType};
use crate::models::{DrugPair, LabResult, Patient};

use super::trend::{compute_trend_factor, latest_value, series_for, LabPoint};

/// Calibration ceiling: the largest plausible raw score under the
/// knowledge base's multiplier range.
pub const NORMALIZATION_CEILING: f64 = 3.6;

pub const MIN_ORGAN_FUNCTION_SCORE: f64 = 0.05;
pub const MAX_ORGAN_FUNCTION_SCORE: f64 = 1.0;

pub const CRITICAL_THRESHOLD: f64 = 0.7;
/// Scores above this escalate to critical when the trend is steep.
pub const TREND_ESCALATION_SCORE: f64 = 0.5;
pub const TREND_ESCALATION_FACTOR: f64 = 1.3;
pub const WARNING_THRESHOLD: f64 = 0.4;
pub const INFORMATIONAL_THRESHOLD: f64 = 0.2;

/// Result of scoring one drug pair against one patient's renal picture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskScore {
    pub score: f64,
    pub severity: AlertSeverity,
    pub organ_function_score: f64,
    pub toxicity_multiplier: f64,
    pub trend_factor: f64,
    pub details: String,
}

/// GFR sub-score. Missing GFR does not penalize.
fn gfr_score(current_gfr: Option<f64>) -> f64 {
    let Some(gfr) = current_gfr else {
        return 1.0;
    };

    if gfr >= 90.0 {
        1.0
    } else if gfr >= 60.0 {
        0.7 + (gfr - 60.0) * 0.01
    } else if gfr >= 30.0 {
        0.3 + (gfr - 30.0) * (0.4 / 30.0)
    } else if gfr >= 15.0 {
        0.1 + (gfr - 15.0) * (0.2 / 15.0)
    } else {
        0.05
    }
}

/// Creatinine-ratio sub-score.
fn creatinine_score(ratio: f64) -> f64 {
    if ratio <= 1.0 {
        1.0
    } else if ratio <= 1.5 {
        1.0 - (ratio - 1.0) * 0.6
    } else if ratio <= 2.0 {
        0.7 - (ratio - 1.5) * 0.6
    } else if ratio <= 3.0 {
        0.4 - (ratio - 2.0) * 0.3
    } else {
        0.1
    }
}

/// Current / baseline creatinine. An unusable baseline scores as the
/// worst ratio so corrupt reference data never hides risk.
fn creatinine_ratio(current: f64, baseline: f64) -> f64 {
    if baseline > 0.0 && baseline.is_finite() {
        current / baseline
    } else {
        f64::INFINITY
    }
}

/// Renal capacity in `[0.05, 1.0]`; the lower of the GFR and creatinine
/// signals wins.
pub fn compute_organ_function_score(
    current_creatinine: f64,
    baseline_creatinine: f64,
    current_gfr: Option<f64>,
) -> f64 {
    let gfr = gfr_score(current_gfr);
    let cr = creatinine_score(creatinine_ratio(current_creatinine, baseline_creatinine));

    gfr.min(cr)
        .min(MAX_ORGAN_FUNCTION_SCORE)
        .max(MIN_ORGAN_FUNCTION_SCORE)
}

/// Severity tier for a normalized score. The trend escalation rule is
/// evaluated before the plain warning threshold.
pub fn classify_risk_severity(score: f64, trend_factor: f64) -> AlertSeverity {
    if score > CRITICAL_THRESHOLD {
        AlertSeverity::Critical
    } else if score > TREND_ESCALATION_SCORE && trend_factor > TREND_ESCALATION_FACTOR {
        AlertSeverity::Critical
    } else if score >= WARNING_THRESHOLD {
        AlertSeverity::Warning
    } else if score >= INFORMATIONAL_THRESHOLD {
        AlertSeverity::Informational
    } else {
        AlertSeverity::Silent
    }
}

pub fn compute_risk_score(
    drug_pair: &DrugPair,
    current_creatinine: f64,
    baseline_creatinine: f64,
    current_gfr: Option<f64>,
    creatinine_series: &[LabPoint],
) -> RiskScore {
    let organ_function_score =
        compute_organ_function_score(current_creatinine, baseline_creatinine, current_gfr);
    let trend_factor = compute_trend_factor(creatinine_series);
    let toxicity_multiplier = drug_pair.toxicity_multiplier;

    let raw = (1.0 - organ_function_score) * toxicity_multiplier * trend_factor;
    let normalized = raw / NORMALIZATION_CEILING;
    let score = if normalized.is_nan() {
        0.0
    } else {
        normalized.clamp(0.0, 1.0)
    };

    let severity = classify_risk_severity(score, trend_factor);

    let gfr_text = current_gfr
        .map(|g| g.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let details = format!(
        "Organ function: {:.0}% | Toxicity multiplier: {:.1}x | Trend factor: {:.2}x | \
         Cr: {} (baseline {}) | GFR: {}",
        organ_function_score * 100.0,
        toxicity_multiplier,
        trend_factor,
        current_creatinine,
        baseline_creatinine,
        gfr_text,
    );

    RiskScore {
        score,
        severity,
        organ_function_score,
        toxicity_multiplier,
        trend_factor,
        details,
    }
}

/// The renal inputs for scoring, resolved from a patient's lab history.
#[derive(Debug, Clone)]
pub struct RenalSnapshot {
    pub current_creatinine: f64,
    pub baseline_creatinine: f64,
    pub current_gfr: Option<f64>,
    pub creatinine_series: Vec<LabPoint>,
}

impl RenalSnapshot {
    /// Latest creatinine falls back to the patient's baseline when no
    /// creatinine has been drawn yet.
    pub fn from_labs(patient: &Patient, labs: &[LabResult]) -> Self {
        Self {
            current_creatinine: latest_value(labs, LabType::Creatinine)
                .unwrap_or(patient.baseline_creatinine),
            baseline_creatinine: patient.baseline_creatinine,
            current_gfr: latest_value(labs, LabType::Gfr),
            creatinine_series: series_for(labs, LabType::Creatinine),
        }
    }

    pub fn score(&self, pair: &DrugPair) -> RiskScore {
        compute_risk_score(
            pair,
            self.current_creatinine,
            self.baseline_creatinine,
            self.current_gfr,
            &self.creatinine_series,
        )
    }
}
