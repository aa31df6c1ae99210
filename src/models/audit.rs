use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{Actor, AuditAction};

/// Immutable record of an alert generation or a clinician action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: Uuid,
    pub alert_id: Option<Uuid>,
    pub patient_id: String,
    pub action: AuditAction,
    pub actor: Actor,
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(
        alert_id: Option<Uuid>,
        patient_id: &str,
        action: AuditAction,
        actor: Actor,
        details: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            alert_id,
            patient_id: patient_id.to_string(),
            action,
            actor,
            details,
            timestamp: Utc::now(),
        }
    }
}
