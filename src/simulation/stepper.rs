//! Simulation coordinator: advances the clock through the schedule,
//! appends scripted labs, scores every active interaction and persists
//! the resulting alerts with their audit trail.
//!
//! All clock transitions are serialized behind one mutex, and each hour is
//! applied at most once between resets.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::db::{ClinicalStore, StepBatch, StoreError, Supersession};
use crate::engine::{
    create_context_aware_alert, create_static_alert_variants, InteractionLookup, RenalSnapshot,
    RiskScore,
};
use crate::models::enums::{Actor, AuditAction};
use crate::models::{
    active_drug_codes, Alert, AuditLog, DrugPair, LabResult, Patient, SimulationState,
    SimulationStateUpdate,
};

use super::scenarios::{Scenario, ScenarioCatalog, ScenarioStep};
use super::schedule::{is_scheduled, next_hour};

/// Largest gap between a computed score and a scenario's scripted score
/// that still counts as on-track.
pub const EXPECTED_SCORE_TOLERANCE: f64 = 0.01;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Hour {0} is not a simulation hour")]
    UnknownHour(u32),

    #[error("Hour {0} has already been applied")]
    AlreadyApplied(u32),

    #[error("Cannot advance to hour {requested}; next hour is {expected}")]
    OutOfSequence { requested: u32, expected: u32 },

    #[error("Simulation schedule is complete")]
    ScheduleComplete,

    #[error("Simulation lock poisoned")]
    LockPoisoned,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// What one tick produced for one patient.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub patient_id: String,
    pub hour: u32,
    pub alerts: Vec<Alert>,
    pub labs: Vec<LabResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
}

/// The hour a tick applied, with the per-patient results written in that
/// same tick.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickOutcome {
    pub hour: u32,
    pub results: Vec<StepResult>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetOutcome {
    pub success: bool,
    pub message: String,
    pub hour0_results: Vec<StepResult>,
}

pub struct SimulationCoordinator {
    store: Arc<dyn ClinicalStore>,
    knowledge: Arc<dyn InteractionLookup>,
    scenarios: ScenarioCatalog,
    /// Supersede the previous active context-aware alert for a pair when a
    /// newer one is generated. Off: alerts accumulate per tick.
    supersede_stale_alerts: bool,
    step_lock: Mutex<()>,
}

impl SimulationCoordinator {
    pub fn new(
        store: Arc<dyn ClinicalStore>,
        knowledge: Arc<dyn InteractionLookup>,
        scenarios: ScenarioCatalog,
    ) -> Self {
        Self {
            store,
            knowledge,
            scenarios,
            supersede_stale_alerts: false,
            step_lock: Mutex::new(()),
        }
    }

    pub fn with_supersession(mut self, enabled: bool) -> Self {
        self.supersede_stale_alerts = enabled;
        self
    }

    pub fn scenarios(&self) -> &ScenarioCatalog {
        &self.scenarios
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, SimulationError> {
        self.step_lock.lock().map_err(|_| SimulationError::LockPoisoned)
    }

    pub fn state(&self) -> Result<SimulationState, SimulationError> {
        Ok(self.store.get_simulation_state()?)
    }

    /// Apply the step for `target_hour`, or the next scheduled hour when
    /// `None`. The tick is written in one store batch: either every lab,
    /// alert and audit entry lands together with the clock, or none does.
    pub fn advance(&self, target_hour: Option<u32>) -> Result<TickOutcome, SimulationError> {
        let _guard = self.lock()?;
        self.advance_locked(target_hour)
    }

    /// Restore seed data and return the clock to hour 0 with nothing applied.
    pub fn reset(&self) -> Result<(), SimulationError> {
        let _guard = self.lock()?;
        self.store.reset()?;
        tracing::info!("Simulation reset");
        Ok(())
    }

    /// Reset, then apply hour 0 without releasing the lock in between.
    pub fn reset_and_prime(&self) -> Result<ResetOutcome, SimulationError> {
        let _guard = self.lock()?;
        self.store.reset()?;
        tracing::info!("Simulation reset");
        let hour0_results = self.advance_locked(Some(0))?.results;
        Ok(ResetOutcome {
            success: true,
            message: "Simulation reset to hour 0".to_string(),
            hour0_results,
        })
    }

    pub fn set_playing(&self, playing: bool) -> Result<SimulationState, SimulationError> {
        let _guard = self.lock()?;
        let state = self.store.update_simulation_state(&SimulationStateUpdate {
            is_playing: Some(playing),
            ..SimulationStateUpdate::default()
        })?;
        tracing::info!(playing, "Simulation play state changed");
        Ok(state)
    }

    fn resolve_target(
        &self,
        requested: Option<u32>,
        state: &SimulationState,
    ) -> Result<u32, SimulationError> {
        let expected = next_hour(state.last_applied_hour);
        let target = match requested.or(expected) {
            Some(hour) => hour,
            None => return Err(SimulationError::ScheduleComplete),
        };

        if !is_scheduled(target) {
            return Err(SimulationError::UnknownHour(target));
        }
        if state.last_applied_hour == Some(target) {
            return Err(SimulationError::AlreadyApplied(target));
        }
        match expected {
            None => Err(SimulationError::ScheduleComplete),
            Some(expected) if expected != target => Err(SimulationError::OutOfSequence {
                requested: target,
                expected,
            }),
            Some(_) => Ok(target),
        }
    }

    fn advance_locked(&self, requested: Option<u32>) -> Result<TickOutcome, SimulationError> {
        let state = self.store.get_simulation_state()?;
        let hour = self.resolve_target(requested, &state).inspect_err(|e| {
            tracing::warn!(requested = ?requested, error = %e, "Simulation advance rejected");
        })?;

        let mut batch = StepBatch {
            state: SimulationStateUpdate {
                current_hour: Some(hour),
                last_applied_hour: Some(Some(hour)),
                ..SimulationStateUpdate::default()
            },
            ..StepBatch::default()
        };

        let mut results = Vec::new();
        for patient in self.store.get_patients()? {
            if let Some(result) = self.step_patient(&patient, hour, &mut batch)? {
                results.push(result);
            }
        }

        self.store.apply_step(&batch).inspect_err(|e| {
            tracing::error!(hour, error = %e, "Simulation step failed, nothing written");
        })?;

        tracing::info!(
            hour,
            patients = results.len(),
            alerts = batch.alerts.len(),
            "Simulation step applied"
        );
        Ok(TickOutcome { hour, results })
    }

    /// Score one patient at `hour`, queueing every write on `batch`.
    fn step_patient(
        &self,
        patient: &Patient,
        hour: u32,
        batch: &mut StepBatch,
    ) -> Result<Option<StepResult>, SimulationError> {
        let Some((scenario, step)) = self
            .scenarios
            .for_patient(&patient.id)
            .and_then(|s| s.step_at(hour).map(|step| (s, step)))
        else {
            tracing::debug!(patient_id = %patient.id, hour, "No scenario step, skipping");
            return Ok(None);
        };

        let timestamp = Utc::now() + Duration::hours(i64::from(hour));
        let labs: Vec<LabResult> = step
            .labs
            .iter()
            .map(|lab| LabResult::new(&patient.id, lab.lab_type, lab.value, &lab.unit, timestamp))
            .collect();

        // Stored history plus this tick's labs, which are not written yet.
        let mut history = self.store.get_lab_results(Some(patient.id.as_str()))?;
        history.extend(labs.iter().cloned());
        let medications = self.store.get_medications(Some(patient.id.as_str()))?;
        let pairs = self
            .knowledge
            .interacting_pairs(&active_drug_codes(&medications));
        let snapshot = RenalSnapshot::from_labs(patient, &history);

        let mut alerts = Vec::new();
        for pair in &pairs {
            let risk = snapshot.score(pair);
            if is_primary_pair(scenario, pair) {
                check_expected(scenario, step, &risk);
            }

            if let Some(alert) = create_context_aware_alert(&patient.id, &risk, pair, hour) {
                if self.supersede_stale_alerts {
                    batch.supersessions.push(Supersession {
                        patient_id: patient.id.clone(),
                        drug_a: pair.drug_a.clone(),
                        drug_b: pair.drug_b.clone(),
                    });
                }
                batch.audit_logs.push(AuditLog::new(
                    Some(alert.id),
                    &patient.id,
                    AuditAction::AlertGenerated,
                    Actor::System,
                    serde_json::json!({
                        "riskScore": risk.score,
                        "severity": risk.severity,
                        "hour": hour,
                    }),
                ));
                alerts.push(alert);
            }

            if hour == 0 {
                alerts.extend(create_static_alert_variants(&patient.id, pair, hour));
            }
        }

        batch.labs.extend(labs.iter().cloned());
        batch.alerts.extend(alerts.iter().cloned());

        Ok(Some(StepResult {
            patient_id: patient.id.clone(),
            hour,
            alerts,
            labs,
            narrative: step.narrative.clone(),
        }))
    }
}

fn is_primary_pair(scenario: &Scenario, pair: &DrugPair) -> bool {
    match scenario.drugs.as_slice() {
        [a, b] => {
            (pair.drug_code_a == *a && pair.drug_code_b == *b)
                || (pair.drug_code_a == *b && pair.drug_code_b == *a)
        }
        _ => false,
    }
}

/// Scripted expectations are calibration data; a drift is logged, never fatal.
fn check_expected(scenario: &Scenario, step: &ScenarioStep, risk: &RiskScore) {
    let score_drift = step
        .expected_score
        .map(|expected| (risk.score - expected).abs())
        .filter(|drift| *drift > EXPECTED_SCORE_TOLERANCE);
    let severity_mismatch = step.expected_severity.filter(|s| *s != risk.severity);

    if score_drift.is_some() || severity_mismatch.is_some() {
        tracing::warn!(
            scenario = %scenario.id,
            hour = step.hour,
            score = risk.score,
            severity = %risk.severity,
            expected_score = ?step.expected_score,
            expected_severity = ?step.expected_severity,
            "Scenario step drifted from its calibration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use uuid::Uuid;

    use crate::db::{MemoryStore, SqliteStore};
    use crate::engine::KnowledgeBase;
    use crate::models::enums::{AlertSeverity, AlertStatus, AlertType};
    use crate::models::{AlertFilter, AlertUpdate, Medication};
    use crate::simulation::SCENARIO_HOURS;

    /// Delegates reads to a seeded `MemoryStore`, refuses piecemeal writes
    /// and fails the first `apply_step`.
    struct FlakyStore {
        inner: MemoryStore,
        fail_next_step: AtomicBool,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                fail_next_step: AtomicBool::new(true),
            }
        }
    }

    fn refused() -> StoreError {
        StoreError::ConstraintViolation("write outside a step batch".into())
    }

    impl ClinicalStore for FlakyStore {
        fn get_patients(&self) -> Result<Vec<Patient>, StoreError> {
            self.inner.get_patients()
        }
        fn get_patient(&self, id: &str) -> Result<Option<Patient>, StoreError> {
            self.inner.get_patient(id)
        }
        fn get_medications(&self, patient_id: Option<&str>) -> Result<Vec<Medication>, StoreError> {
            self.inner.get_medications(patient_id)
        }
        fn get_lab_results(&self, patient_id: Option<&str>) -> Result<Vec<LabResult>, StoreError> {
            self.inner.get_lab_results(patient_id)
        }
        fn insert_lab_result(&self, _lab: &LabResult) -> Result<(), StoreError> {
            Err(refused())
        }
        fn get_alerts(&self, filter: &AlertFilter) -> Result<Vec<Alert>, StoreError> {
            self.inner.get_alerts(filter)
        }
        fn get_alert(&self, id: &Uuid) -> Result<Option<Alert>, StoreError> {
            self.inner.get_alert(id)
        }
        fn insert_alert(&self, _alert: &Alert) -> Result<(), StoreError> {
            Err(refused())
        }
        fn update_alert(&self, id: &Uuid, update: &AlertUpdate) -> Result<Alert, StoreError> {
            self.inner.update_alert(id, update)
        }
        fn deactivate_context_alerts(
            &self,
            _patient_id: &str,
            _drug_pair: Option<(&str, &str)>,
        ) -> Result<usize, StoreError> {
            Err(refused())
        }
        fn get_audit_logs(&self, patient_id: Option<&str>) -> Result<Vec<AuditLog>, StoreError> {
            self.inner.get_audit_logs(patient_id)
        }
        fn insert_audit_log(&self, _log: &AuditLog) -> Result<(), StoreError> {
            Err(refused())
        }
        fn get_simulation_state(&self) -> Result<SimulationState, StoreError> {
            self.inner.get_simulation_state()
        }
        fn update_simulation_state(
            &self,
            _update: &SimulationStateUpdate,
        ) -> Result<SimulationState, StoreError> {
            Err(refused())
        }
        fn apply_step(&self, batch: &StepBatch) -> Result<SimulationState, StoreError> {
            if self.fail_next_step.swap(false, Ordering::SeqCst) {
                return Err(StoreError::ConstraintViolation("disk full".into()));
            }
            self.inner.apply_step(batch)
        }
        fn reset(&self) -> Result<(), StoreError> {
            self.inner.reset()
        }
    }

    fn coordinator_with(store: Arc<dyn ClinicalStore>, supersede: bool) -> SimulationCoordinator {
        SimulationCoordinator::new(
            store,
            Arc::new(KnowledgeBase::bundled().unwrap()),
            ScenarioCatalog::bundled().unwrap(),
        )
        .with_supersession(supersede)
    }

    fn coordinator() -> (Arc<MemoryStore>, SimulationCoordinator) {
        let store = Arc::new(MemoryStore::new());
        let sim = coordinator_with(store.clone(), false);
        (store, sim)
    }

    fn interacting_pair_count(store: &dyn ClinicalStore) -> usize {
        let kb = KnowledgeBase::bundled().unwrap();
        store
            .get_patients()
            .unwrap()
            .iter()
            .map(|p| {
                let meds = store.get_medications(Some(p.id.as_str())).unwrap();
                kb.interacting_pairs(&active_drug_codes(&meds)).len()
            })
            .sum()
    }

    #[test]
    fn prime_emits_three_static_alerts_per_pair() {
        let (store, sim) = coordinator();
        let outcome = sim.reset_and_prime().unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.hour0_results.len(), 3);

        let pairs = interacting_pair_count(store.as_ref());
        assert!(pairs > 0);

        let all = store.get_alerts(&AlertFilter::default()).unwrap();
        let statics = all.iter().filter(|a| a.alert_type == AlertType::Static).count();
        assert_eq!(statics, 3 * pairs);

        let context: Vec<&Alert> = all
            .iter()
            .filter(|a| a.alert_type == AlertType::ContextAware)
            .collect();
        assert!(context.iter().all(|a| a.severity.fires()));
        // Only Maria Santos' metformin/contrast pair carries risk at admission.
        assert_eq!(context.len(), 1);
        assert_eq!(context[0].patient_id, "patient-2");
        assert_eq!(context[0].severity, AlertSeverity::Informational);

        let state = sim.state().unwrap();
        assert_eq!(state.current_hour, 0);
        assert_eq!(state.last_applied_hour, Some(0));
    }

    #[test]
    fn healthy_baseline_patient_gets_no_context_alert() {
        let (store, sim) = coordinator();
        sim.advance(Some(0)).unwrap();
        let filter = AlertFilter {
            alert_type: Some(AlertType::ContextAware),
            ..AlertFilter::for_patient("patient-1")
        };
        assert!(store.get_alerts(&filter).unwrap().is_empty());
    }

    #[test]
    fn repeated_hour_is_rejected_without_writes() {
        let (store, sim) = coordinator();
        sim.advance(Some(0)).unwrap();
        let alerts_before = store.get_alerts(&AlertFilter::default()).unwrap().len();
        let labs_before = store.get_lab_results(None).unwrap().len();

        let err = sim.advance(Some(0)).unwrap_err();
        assert!(matches!(err, SimulationError::AlreadyApplied(0)));

        assert_eq!(store.get_alerts(&AlertFilter::default()).unwrap().len(), alerts_before);
        assert_eq!(store.get_lab_results(None).unwrap().len(), labs_before);
    }

    #[test]
    fn skips_and_unknown_hours_are_rejected() {
        let (_store, sim) = coordinator();
        assert!(matches!(
            sim.advance(Some(16)).unwrap_err(),
            SimulationError::OutOfSequence { requested: 16, expected: 0 }
        ));
        assert!(matches!(
            sim.advance(Some(12)).unwrap_err(),
            SimulationError::UnknownHour(12)
        ));

        sim.advance(Some(0)).unwrap();
        sim.advance(Some(8)).unwrap();
        assert!(matches!(
            sim.advance(Some(0)).unwrap_err(),
            SimulationError::OutOfSequence { requested: 0, expected: 16 }
        ));
    }

    #[test]
    fn omitted_target_walks_schedule_to_completion() {
        let (_store, sim) = coordinator();
        for expected in crate::simulation::SCENARIO_HOURS {
            let outcome = sim.advance(None).unwrap();
            assert_eq!(outcome.hour, expected);
            assert!(outcome.results.iter().all(|r| r.hour == expected));
            assert_eq!(sim.state().unwrap().current_hour, expected);
        }
        assert!(matches!(
            sim.advance(None).unwrap_err(),
            SimulationError::ScheduleComplete
        ));
    }

    #[test]
    fn progressive_injury_raises_critical_alert_with_audit() {
        let (store, sim) = coordinator();
        for hour in [0, 8, 16] {
            sim.advance(Some(hour)).unwrap();
        }

        let alerts = store
            .get_alerts(&AlertFilter {
                alert_type: Some(AlertType::ContextAware),
                ..AlertFilter::for_patient("patient-1")
            })
            .unwrap();
        let critical = alerts
            .iter()
            .find(|a| a.concerns_pair("Vancomycin", "Gentamicin") && a.simulation_hour == 16)
            .unwrap();
        assert_eq!(critical.severity, AlertSeverity::Critical);
        assert!((critical.risk_score - 0.595).abs() < 1e-3);

        let audit = store.get_audit_logs(Some("patient-1")).unwrap();
        let entry = audit.iter().find(|l| l.alert_id == Some(critical.id)).unwrap();
        assert_eq!(entry.action, AuditAction::AlertGenerated);
        assert_eq!(entry.actor, Actor::System);
        assert_eq!(entry.details["hour"], 16);
        assert_eq!(entry.details["severity"], "critical");
    }

    #[test]
    fn lab_timestamps_advance_with_the_clock() {
        let (store, sim) = coordinator();
        sim.advance(Some(0)).unwrap();
        let results = sim.advance(Some(8)).unwrap().results;
        let new_lab = &results[0].labs[0];

        let labs = store.get_lab_results(Some(results[0].patient_id.as_str())).unwrap();
        assert!(labs.iter().all(|l| l.timestamp <= new_lab.timestamp));
    }

    #[test]
    fn alerts_accumulate_without_supersession() {
        let (store, sim) = coordinator();
        for hour in [0, 8, 16] {
            sim.advance(Some(hour)).unwrap();
        }
        let active = store
            .get_alerts(&AlertFilter {
                alert_type: Some(AlertType::ContextAware),
                status: Some(AlertStatus::Active),
                ..AlertFilter::for_patient("patient-2")
            })
            .unwrap();
        let metformin = active
            .iter()
            .filter(|a| a.concerns_pair("Metformin", "IV Contrast"))
            .count();
        assert_eq!(metformin, 3);
    }

    #[test]
    fn supersession_keeps_one_active_alert_per_pair() {
        let store: Arc<dyn ClinicalStore> = Arc::new(MemoryStore::new());
        let sim = coordinator_with(store.clone(), true);
        for hour in [0, 8, 16] {
            sim.advance(Some(hour)).unwrap();
        }

        let alerts = store
            .get_alerts(&AlertFilter {
                alert_type: Some(AlertType::ContextAware),
                ..AlertFilter::for_patient("patient-2")
            })
            .unwrap();
        let metformin: Vec<&Alert> = alerts
            .iter()
            .filter(|a| a.concerns_pair("Metformin", "IV Contrast"))
            .collect();
        assert_eq!(metformin.len(), 3);
        assert_eq!(metformin.iter().filter(|a| a.is_active()).count(), 1);
        assert_eq!(
            metformin
                .iter()
                .filter(|a| a.status == AlertStatus::Superseded)
                .count(),
            2
        );
        assert!(metformin.last().unwrap().is_active());
    }

    #[test]
    fn reset_allows_replay_from_hour_zero() {
        let (store, sim) = coordinator();
        sim.advance(Some(0)).unwrap();
        sim.advance(Some(8)).unwrap();
        sim.set_playing(true).unwrap();

        sim.reset().unwrap();
        assert_eq!(sim.state().unwrap(), SimulationState::default());
        assert!(store.get_alerts(&AlertFilter::default()).unwrap().is_empty());

        sim.advance(Some(0)).unwrap();
        assert_eq!(sim.state().unwrap().last_applied_hour, Some(0));
    }

    #[test]
    fn set_playing_toggles_flag_only() {
        let (_store, sim) = coordinator();
        let state = sim.set_playing(true).unwrap();
        assert!(state.is_playing);
        assert_eq!(state.last_applied_hour, None);
        assert!(!sim.set_playing(false).unwrap().is_playing);
    }

    #[test]
    fn patients_without_scenario_are_skipped() {
        let store = Arc::new(MemoryStore::new());
        let sim = SimulationCoordinator::new(
            store.clone(),
            Arc::new(KnowledgeBase::bundled().unwrap()),
            ScenarioCatalog::empty(),
        );
        let outcome = sim.advance(Some(0)).unwrap();
        assert_eq!(outcome.hour, 0);
        assert!(outcome.results.is_empty());
        assert!(store.get_alerts(&AlertFilter::default()).unwrap().is_empty());
        assert_eq!(sim.state().unwrap().last_applied_hour, Some(0));
    }

    #[test]
    fn failed_tick_leaves_store_untouched_and_can_be_retried() {
        let store = Arc::new(FlakyStore::new());
        let sim = coordinator_with(store.clone(), true);

        let err = sim.advance(Some(0)).unwrap_err();
        assert!(matches!(err, SimulationError::Store(_)));
        assert!(store.get_alerts(&AlertFilter::default()).unwrap().is_empty());
        assert!(store.get_audit_logs(None).unwrap().is_empty());
        assert_eq!(store.get_lab_results(Some("patient-1")).unwrap().len(), 4);
        assert_eq!(sim.state().unwrap(), SimulationState::default());

        let outcome = sim.advance(Some(0)).unwrap();
        assert_eq!(outcome.hour, 0);

        let statics = store
            .get_alerts(&AlertFilter {
                alert_type: Some(AlertType::Static),
                ..AlertFilter::for_patient("patient-1")
            })
            .unwrap();
        // Vancomycin/gentamicin, vancomycin/furosemide, gentamicin/furosemide.
        assert_eq!(statics.len(), 9);
        assert_eq!(store.get_lab_results(Some("patient-1")).unwrap().len(), 4 + 4);
        assert_eq!(sim.state().unwrap().last_applied_hour, Some(0));
    }

    #[test]
    fn scripted_trajectories_reach_their_expected_scores() {
        let (store, sim) = coordinator();
        let kb = KnowledgeBase::bundled().unwrap();

        for hour in SCENARIO_HOURS {
            let outcome = sim.advance(Some(hour)).unwrap();
            for scenario in sim.scenarios().all() {
                let step = scenario.step_at(hour).unwrap();
                let patient = store.get_patient(&scenario.patient_id).unwrap().unwrap();
                let labs = store.get_lab_results(Some(patient.id.as_str())).unwrap();
                let pair = kb.find_pair(&scenario.drugs[0], &scenario.drugs[1]).unwrap();
                let risk = RenalSnapshot::from_labs(&patient, &labs).score(pair);

                let expected = step.expected_score.unwrap();
                assert!(
                    (risk.score - expected).abs() < EXPECTED_SCORE_TOLERANCE,
                    "{} at hour {hour}: scored {:.3}, scripted {expected}",
                    scenario.id,
                    risk.score
                );
                assert_eq!(
                    Some(risk.severity),
                    step.expected_severity,
                    "{} at hour {hour}",
                    scenario.id
                );

                let result = outcome
                    .results
                    .iter()
                    .find(|r| r.patient_id == patient.id)
                    .unwrap();
                assert!(result.narrative.is_some());
                assert_eq!(result.narrative, step.narrative);
            }
        }
    }

    #[test]
    fn sqlite_store_drives_the_same_replay() {
        let store: Arc<dyn ClinicalStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let sim = coordinator_with(store.clone(), false);
        sim.reset_and_prime().unwrap();
        sim.advance(None).unwrap();

        let statics = store
            .get_alerts(&AlertFilter {
                alert_type: Some(AlertType::Static),
                ..AlertFilter::default()
            })
            .unwrap();
        assert_eq!(statics.len(), 3 * interacting_pair_count(store.as_ref()));
        assert_eq!(sim.state().unwrap().last_applied_hour, Some(8));
    }
}
