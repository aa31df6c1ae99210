//! Shift handover summary: a read-only projection over one patient's
//! alerts, medications and labs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::enums::{AlertSeverity, LabType, TrendDirection};
use crate::models::{Alert, LabResult, Medication};

use super::trend::{compute_trend, latest_lab, series_for};

pub const HANDOVER_PERIOD: &str = "Current shift";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabTrend {
    pub lab_type: LabType,
    pub direction: TrendDirection,
    pub latest_value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoverSummary {
    pub patient_id: String,
    pub generated_at: DateTime<Utc>,
    pub period: String,
    pub active_alerts: Vec<Alert>,
    pub lab_trends: Vec<LabTrend>,
    pub active_medications: Vec<Medication>,
    pub risk_summary: String,
    pub recommendations: Vec<String>,
}

fn lab_trends(labs: &[LabResult]) -> Vec<LabTrend> {
    LabType::ALL
        .iter()
        .filter_map(|&lab_type| {
            let latest = latest_lab(labs, lab_type)?;
            Some(LabTrend {
                lab_type,
                direction: compute_trend(&series_for(labs, lab_type)),
                latest_value: latest.value,
                unit: latest.unit.clone(),
            })
        })
        .collect()
}

fn risk_summary(active_alerts: &[Alert]) -> String {
    let count = |severity: AlertSeverity| active_alerts.iter().filter(|a| a.severity == severity).count();
    let critical = count(AlertSeverity::Critical);
    let warning = count(AlertSeverity::Warning);

    if critical > 0 {
        format!("CRITICAL: {critical} critical alert(s) active. Immediate attention required.")
    } else if warning > 0 {
        format!("WARNING: {warning} warning alert(s). Close monitoring recommended.")
    } else {
        "No active alerts. Continue current monitoring protocol.".to_string()
    }
}

/// Recommendations of active critical/warning alerts, de-duplicated in
/// first-seen order.
fn recommendations(active_alerts: &[Alert]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for alert in active_alerts {
        if matches!(alert.severity, AlertSeverity::Critical | AlertSeverity::Warning)
            && !seen.contains(&alert.recommendation)
        {
            seen.push(alert.recommendation.clone());
        }
    }
    seen
}

pub fn generate_handover_summary(
    patient_id: &str,
    alerts: &[Alert],
    medications: &[Medication],
    labs: &[LabResult],
) -> HandoverSummary {
    let active_alerts: Vec<Alert> = alerts.iter().filter(|a| a.is_active()).cloned().collect();
    let active_medications = medications.iter().filter(|m| m.is_active()).cloned().collect();

    HandoverSummary {
        patient_id: patient_id.to_string(),
        generated_at: Utc::now(),
        period: HANDOVER_PERIOD.to_string(),
        lab_trends: lab_trends(labs),
        risk_summary: risk_summary(&active_alerts),
        recommendations: recommendations(&active_alerts),
        active_alerts,
        active_medications,
    }
}
