//! Alert triage: context-aware alerts gated on risk, and the legacy static
//! alerts they are compared against.

use chrono::Utc;
use uuid::Uuid;

use crate::models::enums::{AlertSeverity, AlertStatus, AlertType};
use crate::models::{Alert, DrugPair};

use super::risk::RiskScore;

/// Placeholder score carried by static alerts, which have no patient context.
pub const STATIC_ALERT_SCORE: f64 = 0.5;

const STATIC_RISK_PROJECTION: &str =
    "Potential for adverse interaction. No patient-specific risk assessment available.";
const STATIC_RECOMMENDATION: &str =
    "Review medication list and consider alternatives if clinically appropriate.";

fn context_title(severity: AlertSeverity, pair: &DrugPair) -> Option<String> {
    let (a, b) = (&pair.drug_a, &pair.drug_b);
    match severity {
        AlertSeverity::Critical => Some(format!("CRITICAL: {a} + {b} — Renal Clearance Compromised")),
        AlertSeverity::Warning => Some(format!("WARNING: {a} + {b} — Declining Renal Function")),
        AlertSeverity::Informational => Some(format!("INFO: {a} + {b} — Monitor Renal Trend")),
        AlertSeverity::Silent => None,
    }
}

/// Build a context-aware alert, or `None` when the risk is silent.
pub fn create_context_aware_alert(
    patient_id: &str,
    risk: &RiskScore,
    pair: &DrugPair,
    simulation_hour: u32,
) -> Option<Alert> {
    let title = context_title(risk.severity, pair)?;

    Some(Alert {
        id: Uuid::new_v4(),
        patient_id: patient_id.to_string(),
        alert_type: AlertType::ContextAware,
        severity: risk.severity,
        title,
        mechanism: pair.mechanism.clone(),
        risk_projection: pair.risk_description.clone(),
        recommendation: pair.recommendation.clone(),
        drug_pair: pair.names(),
        risk_score: risk.score,
        status: AlertStatus::Active,
        clinician_feedback: None,
        created_at: Utc::now(),
        simulation_hour,
    })
}

/// Unconditional interaction alert, as a lookup-only system would raise it.
pub fn create_static_alert(patient_id: &str, pair: &DrugPair, simulation_hour: u32) -> Alert {
    Alert {
        id: Uuid::new_v4(),
        patient_id: patient_id.to_string(),
        alert_type: AlertType::Static,
        severity: AlertSeverity::Warning,
        title: format!("Drug Interaction Alert: {} + {}", pair.drug_a, pair.drug_b),
        mechanism: format!(
            "{} and {} have a known interaction. Use caution.",
            pair.drug_a, pair.drug_b
        ),
        risk_projection: STATIC_RISK_PROJECTION.to_string(),
        recommendation: STATIC_RECOMMENDATION.to_string(),
        drug_pair: pair.names(),
        risk_score: STATIC_ALERT_SCORE,
        status: AlertStatus::Active,
        clinician_feedback: None,
        created_at: Utc::now(),
        simulation_hour,
    }
}

/// The primary static alert plus the duplicate-check and reconciliation
/// variants a legacy system fires for the same pair.
pub fn create_static_alert_variants(
    patient_id: &str,
    pair: &DrugPair,
    simulation_hour: u32,
) -> [Alert; 3] {
    let primary = create_static_alert(patient_id, pair, simulation_hour);

    let mut duplicate = create_static_alert(patient_id, pair, simulation_hour);
    duplicate.title = format!(
        "Duplicate Check: {} interaction with {}",
        pair.drug_a, pair.drug_b
    );

    let mut reconciliation = create_static_alert(patient_id, pair, simulation_hour);
    reconciliation.title = format!(
        "Medication Reconciliation: Verify {} + {}",
        pair.drug_a, pair.drug_b
    );

    [primary, duplicate, reconciliation]
}

/// True only when `next` is strictly more severe than `previous`.
pub fn should_escalate(previous: AlertSeverity, next: AlertSeverity) -> bool {
    next.rank() > previous.rank()
}
