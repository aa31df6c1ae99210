//! Scripted lab trajectories, one scenario per demonstration patient.

use serde::{Deserialize, Serialize};

use crate::engine::KnowledgeError;
use crate::models::enums::{AlertSeverity, LabType};

const BUNDLED_SCENARIOS: &str = include_str!("../../resources/scenarios.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioLab {
    pub lab_type: LabType,
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioStep {
    pub hour: u32,
    pub labs: Vec<ScenarioLab>,
    /// Score the primary interaction is expected to reach at this step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_severity: Option<AlertSeverity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub patient_id: String,
    pub description: String,
    /// Drug codes of the interaction the scenario is built around.
    pub drugs: Vec<String>,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// The step scheduled for exactly `hour`.
    pub fn step_at(&self, hour: u32) -> Option<&ScenarioStep> {
        self.steps.iter().find(|s| s.hour == hour)
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    pub fn bundled() -> Result<Self, KnowledgeError> {
        Self::from_json(BUNDLED_SCENARIOS)
    }

    /// Steps are sorted by hour on load.
    pub fn from_json(json: &str) -> Result<Self, KnowledgeError> {
        let mut scenarios: Vec<Scenario> = serde_json::from_str(json)?;
        for scenario in &mut scenarios {
            scenario.steps.sort_by_key(|s| s.hour);
        }
        Ok(Self { scenarios })
    }

    pub fn empty() -> Self {
        Self {
            scenarios: Vec::new(),
        }
    }

    pub fn for_patient(&self, patient_id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.patient_id == patient_id)
    }

    pub fn all(&self) -> &[Scenario] {
        &self.scenarios
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::schedule::SCENARIO_HOURS;

    #[test]
    fn bundled_scenarios_cover_every_hour() {
        let catalog = ScenarioCatalog::bundled().unwrap();
        assert_eq!(catalog.all().len(), 3);
        for scenario in catalog.all() {
            let hours: Vec<u32> = scenario.steps.iter().map(|s| s.hour).collect();
            assert_eq!(hours, SCENARIO_HOURS.to_vec(), "{}", scenario.id);
        }
    }

    #[test]
    fn lookup_by_patient_and_hour() {
        let catalog = ScenarioCatalog::bundled().unwrap();
        let scenario = catalog.for_patient("patient-1").unwrap();
        assert_eq!(scenario.drugs, vec!["VANC".to_string(), "GENT".to_string()]);

        let step = scenario.step_at(24).unwrap();
        let creatinine = step
            .labs
            .iter()
            .find(|l| l.lab_type == LabType::Creatinine)
            .unwrap();
        assert_eq!(creatinine.value, 2.2);
        assert!(scenario.step_at(12).is_none());
        assert!(catalog.for_patient("patient-9").is_none());
    }

    #[test]
    fn unsorted_steps_are_ordered_on_load() {
        let json = r#"[{
            "id": "s", "name": "n", "patientId": "p", "description": "d", "drugs": [],
            "steps": [
                {"hour": 16, "labs": []},
                {"hour": 0, "labs": [{"labType": "gfr", "value": 90, "unit": "mL/min"}]}
            ]
        }]"#;
        let catalog = ScenarioCatalog::from_json(json).unwrap();
        assert_eq!(catalog.all()[0].steps[0].hour, 0);
    }
}
