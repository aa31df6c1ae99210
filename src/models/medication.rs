use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::MedicationStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: Uuid,
    pub patient_id: String,
    pub drug_name: String,
    pub drug_code: String,
    pub dose: String,
    pub route: String,
    pub frequency: String,
    pub start_time: DateTime<Utc>,
    pub status: MedicationStatus,
}

impl Medication {
    pub fn is_active(&self) -> bool {
        self.status == MedicationStatus::Active
    }
}

/// Drug codes of the active medications, in list order.
pub fn active_drug_codes(medications: &[Medication]) -> Vec<String> {
    medications
        .iter()
        .filter(|m| m.is_active())
        .map(|m| m.drug_code.clone())
        .collect()
}
