use serde::Serialize;

use crate::models::enums::AlertSeverity;
use crate::models::DrugPair;

use super::risk::RiskScore;

/// Why / risk / what explanation shown next to a scored interaction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionCard {
    pub why: String,
    pub risk: String,
    pub what: String,
    pub severity: AlertSeverity,
    pub drug_pair: (String, String),
    pub risk_score: f64,
}

pub fn generate_intervention_card(
    risk: &RiskScore,
    pair: &DrugPair,
    current_creatinine: f64,
    current_gfr: Option<f64>,
) -> InterventionCard {
    let gfr_text = match current_gfr {
        Some(gfr) => format!("GFR {gfr} mL/min"),
        None => "GFR unavailable".to_string(),
    };

    let risk_text = format!(
        "{}\n\nCurrent status: Creatinine {} mg/dL, {}. \
         Organ function at {:.0}% capacity. Risk score: {:.0}% (trend factor: {:.1}x).",
        pair.risk_description,
        current_creatinine,
        gfr_text,
        risk.organ_function_score * 100.0,
        risk.score * 100.0,
        risk.trend_factor,
    );

    let what = match &pair.alternative_drug {
        Some(alt) => format!("{}\n\nSuggested alternative: {alt}", pair.recommendation),
        None => pair.recommendation.clone(),
    };

    InterventionCard {
        why: pair.mechanism.clone(),
        risk: risk_text,
        what,
        severity: risk.severity,
        drug_pair: pair.names(),
        risk_score: risk.score,
    }
}
