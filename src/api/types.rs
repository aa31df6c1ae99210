//! Shared types for the API layer: router state plus the request and
//! response bodies that are not plain domain models.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core_state::CoreState;
use crate::engine::{InterventionCard, RiskScore};
use crate::models::enums::{AlertSeverity, AlertStatus, AlertType};
use crate::models::{Alert, DrugPair, LabResult, Medication, Patient};

// ═══════════════════════════════════════════════════════════
// API context
// ═══════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

// ═══════════════════════════════════════════════════════════
// Query strings and request bodies
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientQuery {
    pub patient_id: Option<String>,
}

impl PatientQuery {
    /// The `patientId` parameter, rejecting absent or blank values.
    pub fn require(&self) -> Option<&str> {
        self.patient_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertQuery {
    pub patient_id: Option<String>,
    pub alert_type: Option<AlertType>,
}

/// Body of `POST /api/simulate`. The action is kept as a raw string so
/// unknown actions surface as a 400 from the handler, not a 422 from
/// the extractor.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    #[serde(default)]
    pub action: String,
    pub target_hour: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPatch {
    pub status: Option<AlertStatus>,
    pub clinician_feedback: Option<String>,
}

// ═══════════════════════════════════════════════════════════
// Response bodies
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// A patient row on the dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientOverview {
    #[serde(flatten)]
    pub patient: Patient,
    pub latest_creatinine: Option<f64>,
    pub latest_gfr: Option<f64>,
    pub context_aware_alert_count: usize,
    pub static_alert_count: usize,
    pub critical_alert_count: usize,
    pub highest_severity: AlertSeverity,
}

impl PatientOverview {
    /// Counts cover active alerts only.
    pub fn new(patient: Patient, labs: &[LabResult], alerts: &[Alert]) -> Self {
        use crate::engine::latest_value;
        use crate::models::enums::LabType;

        let active: Vec<&Alert> = alerts.iter().filter(|a| a.is_active()).collect();
        let count_type =
            |alert_type: AlertType| active.iter().filter(|a| a.alert_type == alert_type).count();

        let highest_severity = active
            .iter()
            .map(|a| a.severity)
            .max_by_key(|s| s.rank())
            .unwrap_or(AlertSeverity::Silent);

        Self {
            latest_creatinine: latest_value(labs, LabType::Creatinine),
            latest_gfr: latest_value(labs, LabType::Gfr),
            context_aware_alert_count: count_type(AlertType::ContextAware),
            static_alert_count: count_type(AlertType::Static),
            critical_alert_count: active
                .iter()
                .filter(|a| a.severity == AlertSeverity::Critical)
                .count(),
            highest_severity,
            patient,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PatientDetail {
    #[serde(flatten)]
    pub patient: Patient,
    pub medications: Vec<Medication>,
    /// Oldest first.
    pub labs: Vec<LabResult>,
    /// Newest first.
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRisk {
    pub drug_pair: DrugPair,
    pub risk_score: RiskScore,
    pub intervention: InterventionCard,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResponse {
    pub patient_id: String,
    pub current_creatinine: f64,
    pub current_gfr: Option<f64>,
    pub baseline_creatinine: f64,
    pub interactions: Vec<InteractionRisk>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceResponse {
    pub success: bool,
    pub hour: u32,
    pub results: Vec<crate::simulation::StepResult>,
}

/// Static versus context-aware alert load.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResponse {
    pub current_hour: u32,
    pub static_alert_count: usize,
    /// Static alerts a clinician would be expected to click through:
    /// all but one, or the dismissed count if higher.
    pub static_likely_overridden: usize,
    pub context_aware_alert_count: usize,
    pub context_aware_critical_count: usize,
    pub context_aware_acted_on: usize,
    /// Percentage fewer alerts raised by the context-aware path, rounded to
    /// a whole percent. 0 when no static alerts exist.
    pub alert_reduction_percent: f64,
}

impl ComparisonResponse {
    pub fn from_alerts(current_hour: u32, alerts: &[Alert]) -> Self {
        let (statics, contexts): (Vec<&Alert>, Vec<&Alert>) = alerts
            .iter()
            .partition(|a| a.alert_type == AlertType::Static);

        let static_dismissed = statics
            .iter()
            .filter(|a| a.status == AlertStatus::Dismissed)
            .count();
        let static_likely_overridden = if statics.is_empty() {
            0
        } else {
            (statics.len() - 1).max(static_dismissed)
        };

        let alert_reduction_percent = if statics.is_empty() {
            0.0
        } else {
            let ratio = 1.0 - contexts.len() as f64 / statics.len() as f64;
            (ratio * 100.0).round()
        };

        Self {
            current_hour,
            static_alert_count: statics.len(),
            static_likely_overridden,
            context_aware_alert_count: contexts.len(),
            context_aware_critical_count: contexts
                .iter()
                .filter(|a| a.severity == AlertSeverity::Critical)
                .count(),
            context_aware_acted_on: contexts
                .iter()
                .filter(|a| a.status == AlertStatus::Confirmed)
                .count(),
            alert_reduction_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::seed_data;
    use crate::engine::{
        create_static_alert, create_static_alert_variants, InteractionLookup, KnowledgeBase,
    };

    fn static_alerts() -> Vec<Alert> {
        let kb = KnowledgeBase::bundled().unwrap();
        create_static_alert_variants("patient-1", kb.find_pair("VANC", "GENT").unwrap(), 0)
            .to_vec()
    }

    #[test]
    fn patient_query_rejects_blank() {
        let query = PatientQuery {
            patient_id: Some("  ".into()),
        };
        assert!(query.require().is_none());
        assert!(PatientQuery::default().require().is_none());

        let query = PatientQuery {
            patient_id: Some("patient-2".into()),
        };
        assert_eq!(query.require(), Some("patient-2"));
    }

    #[test]
    fn overview_counts_only_active_alerts() {
        let seed = seed_data(chrono::Utc::now());
        let patient = seed.patients[0].clone();
        let labs: Vec<LabResult> = seed
            .labs
            .iter()
            .filter(|l| l.patient_id == patient.id)
            .cloned()
            .collect();

        let mut alerts = static_alerts();
        alerts[0].status = AlertStatus::Dismissed;

        let overview = PatientOverview::new(patient, &labs, &alerts);
        assert_eq!(overview.static_alert_count, 2);
        assert_eq!(overview.context_aware_alert_count, 0);
        assert_eq!(overview.highest_severity, AlertSeverity::Warning);
        assert!(overview.latest_creatinine.is_some());
    }

    #[test]
    fn overview_without_alerts_is_silent() {
        let seed = seed_data(chrono::Utc::now());
        let overview = PatientOverview::new(seed.patients[1].clone(), &[], &[]);
        assert_eq!(overview.highest_severity, AlertSeverity::Silent);
        assert_eq!(overview.latest_gfr, None);

        let json = serde_json::to_value(&overview).unwrap();
        assert_eq!(json["id"], "patient-2");
        assert_eq!(json["highestSeverity"], "silent");
    }

    #[test]
    fn comparison_reports_reduction() {
        let alerts = static_alerts();
        let report = ComparisonResponse::from_alerts(0, &alerts);
        assert_eq!(report.static_alert_count, 3);
        assert_eq!(report.static_likely_overridden, 2);
        assert_eq!(report.context_aware_alert_count, 0);
        assert_eq!(report.alert_reduction_percent, 100.0);

        // 26 of 27 fewer is 96.296..%, reported as a whole 96.
        let mut many: Vec<Alert> = (0..9).flat_map(|_| static_alerts()).collect();
        let kb = KnowledgeBase::bundled().unwrap();
        let mut context = create_static_alert("patient-1", kb.find_pair("VANC", "GENT").unwrap(), 8);
        context.alert_type = AlertType::ContextAware;
        many.push(context);
        let report = ComparisonResponse::from_alerts(8, &many);
        assert_eq!(report.static_alert_count, 27);
        assert_eq!(report.context_aware_alert_count, 1);
        assert_eq!(report.alert_reduction_percent, 96.0);

        let empty = ComparisonResponse::from_alerts(0, &[]);
        assert_eq!(empty.alert_reduction_percent, 0.0);
        assert_eq!(empty.static_likely_overridden, 0);
    }
}
