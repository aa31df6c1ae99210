use serde::{Deserialize, Serialize};

use super::enums::PatientStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub sex: String,
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    pub comorbidities: Vec<String>,
    pub baseline_creatinine: f64,
    pub baseline_gfr: f64,
    /// Ward location, e.g. "ICU Bed 4".
    pub unit: String,
    pub status: PatientStatus,
}
