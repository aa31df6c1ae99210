use serde::{Deserialize, Serialize};

use super::enums::{ClearanceRoute, LabType};

/// Knowledge-base entry describing a known interaction between two drugs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugPair {
    pub drug_a: String,
    pub drug_b: String,
    pub drug_code_a: String,
    pub drug_code_b: String,
    pub clearance_route: ClearanceRoute,
    /// Severity weight of the interaction, never below 1.0.
    pub toxicity_multiplier: f64,
    pub mechanism: String,
    pub risk_description: String,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_drug: Option<String>,
    #[serde(default)]
    pub monitoring_params: Vec<LabType>,
}

impl DrugPair {
    /// Code-based, order-independent match.
    pub fn matches_codes(&self, code_a: &str, code_b: &str) -> bool {
        (self.drug_code_a == code_a && self.drug_code_b == code_b)
            || (self.drug_code_a == code_b && self.drug_code_b == code_a)
    }

    pub fn involves(&self, code: &str) -> bool {
        self.drug_code_a == code || self.drug_code_b == code
    }

    pub fn names(&self) -> (String, String) {
        (self.drug_a.clone(), self.drug_b.clone())
    }
}
