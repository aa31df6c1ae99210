use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::LabType;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabResult {
    pub id: Uuid,
    pub patient_id: String,
    pub lab_type: LabType,
    pub value: f64,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
}

impl LabResult {
    pub fn new(
        patient_id: &str,
        lab_type: LabType,
        value: f64,
        unit: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id: patient_id.to_string(),
            lab_type,
            value,
            unit: unit.to_string(),
            timestamp,
        }
    }
}
