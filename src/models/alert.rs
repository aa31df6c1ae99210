use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{AlertSeverity, AlertStatus, AlertType};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    pub patient_id: String,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub title: String,
    pub mechanism: String,
    pub risk_projection: String,
    pub recommendation: String,
    /// Drug names of the originating pair, in knowledge-base order.
    pub drug_pair: (String, String),
    pub risk_score: f64,
    pub status: AlertStatus,
    pub clinician_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub simulation_hour: u32,
}

impl Alert {
    pub fn is_active(&self) -> bool {
        self.status == AlertStatus::Active
    }

    /// Unordered comparison against a pair of drug names.
    pub fn concerns_pair(&self, drug_a: &str, drug_b: &str) -> bool {
        let (a, b) = (&self.drug_pair.0, &self.drug_pair.1);
        (a == drug_a && b == drug_b) || (a == drug_b && b == drug_a)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    pub patient_id: Option<String>,
    pub alert_type: Option<AlertType>,
    pub status: Option<AlertStatus>,
}

impl AlertFilter {
    pub fn for_patient(patient_id: &str) -> Self {
        Self {
            patient_id: Some(patient_id.to_string()),
            ..Self::default()
        }
    }

    pub fn matches(&self, alert: &Alert) -> bool {
        self.patient_id
            .as_deref()
            .map_or(true, |p| alert.patient_id == p)
            && self.alert_type.map_or(true, |t| alert.alert_type == t)
            && self.status.map_or(true, |s| alert.status == s)
    }
}

/// Partial update applied by clinician action or supersession.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertUpdate {
    pub status: Option<AlertStatus>,
    pub clinician_feedback: Option<String>,
}

impl AlertUpdate {
    pub fn apply(&self, alert: &mut Alert) {
        if let Some(status) = self.status {
            alert.status = status;
        }
        if let Some(feedback) = &self.clinician_feedback {
            if !feedback.is_empty() {
                alert.clinician_feedback = Some(feedback.clone());
            }
        }
    }
}
