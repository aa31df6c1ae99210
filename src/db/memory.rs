use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use uuid::Uuid;

use super::seed::seed_data;
use super::{ClinicalStore, StepBatch, StoreError};
use crate::models::enums::{AlertStatus, AlertType};
use crate::models::{
    Alert, AlertFilter, AlertUpdate, AuditLog, LabResult, Medication, Patient, SimulationState,
    SimulationStateUpdate,
};

#[derive(Default)]
struct Tables {
    patients: Vec<Patient>,
    medications: Vec<Medication>,
    lab_results: Vec<LabResult>,
    alerts: Vec<Alert>,
    audit_logs: Vec<AuditLog>,
    simulation: SimulationState,
}

impl Tables {
    fn seeded() -> Self {
        let seed = seed_data(Utc::now());
        Self {
            patients: seed.patients,
            medications: seed.medications,
            lab_results: seed.labs,
            ..Self::default()
        }
    }

    fn supersede(&mut self, patient_id: &str, drug_pair: Option<(&str, &str)>) -> usize {
        let mut changed = 0;
        for alert in self.alerts.iter_mut() {
            if alert.patient_id == patient_id
                && alert.alert_type == AlertType::ContextAware
                && alert.is_active()
                && drug_pair.map_or(true, |(a, b)| alert.concerns_pair(a, b))
            {
                alert.status = AlertStatus::Superseded;
                changed += 1;
            }
        }
        changed
    }
}

/// Process-local store. All tables live behind one `RwLock`, so readers
/// proceed concurrently and each write is atomic.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// A store populated with the seed dataset.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::seeded()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn owned_by(record_patient: &str, patient_id: Option<&str>) -> bool {
    patient_id.map_or(true, |p| record_patient == p)
}

impl ClinicalStore for MemoryStore {
    fn get_patients(&self) -> Result<Vec<Patient>, StoreError> {
        Ok(self.read()?.patients.clone())
    }

    fn get_patient(&self, id: &str) -> Result<Option<Patient>, StoreError> {
        Ok(self.read()?.patients.iter().find(|p| p.id == id).cloned())
    }

    fn get_medications(&self, patient_id: Option<&str>) -> Result<Vec<Medication>, StoreError> {
        Ok(self
            .read()?
            .medications
            .iter()
            .filter(|m| owned_by(&m.patient_id, patient_id))
            .cloned()
            .collect())
    }

    fn get_lab_results(&self, patient_id: Option<&str>) -> Result<Vec<LabResult>, StoreError> {
        Ok(self
            .read()?
            .lab_results
            .iter()
            .filter(|l| owned_by(&l.patient_id, patient_id))
            .cloned()
            .collect())
    }

    fn insert_lab_result(&self, lab: &LabResult) -> Result<(), StoreError> {
        self.write()?.lab_results.push(lab.clone());
        Ok(())
    }

    fn get_alerts(&self, filter: &AlertFilter) -> Result<Vec<Alert>, StoreError> {
        Ok(self
            .read()?
            .alerts
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect())
    }

    fn get_alert(&self, id: &Uuid) -> Result<Option<Alert>, StoreError> {
        Ok(self.read()?.alerts.iter().find(|a| a.id == *id).cloned())
    }

    fn insert_alert(&self, alert: &Alert) -> Result<(), StoreError> {
        self.write()?.alerts.push(alert.clone());
        Ok(())
    }

    fn update_alert(&self, id: &Uuid, update: &AlertUpdate) -> Result<Alert, StoreError> {
        let mut tables = self.write()?;
        let alert = tables
            .alerts
            .iter_mut()
            .find(|a| a.id == *id)
            .ok_or_else(|| StoreError::not_found("alert", id))?;
        update.apply(alert);
        Ok(alert.clone())
    }

    fn deactivate_context_alerts(
        &self,
        patient_id: &str,
        drug_pair: Option<(&str, &str)>,
    ) -> Result<usize, StoreError> {
        Ok(self.write()?.supersede(patient_id, drug_pair))
    }

    fn get_audit_logs(&self, patient_id: Option<&str>) -> Result<Vec<AuditLog>, StoreError> {
        Ok(self
            .read()?
            .audit_logs
            .iter()
            .filter(|l| owned_by(&l.patient_id, patient_id))
            .cloned()
            .collect())
    }

    fn insert_audit_log(&self, log: &AuditLog) -> Result<(), StoreError> {
        self.write()?.audit_logs.push(log.clone());
        Ok(())
    }

    fn get_simulation_state(&self) -> Result<SimulationState, StoreError> {
        Ok(self.read()?.simulation.clone())
    }

    fn update_simulation_state(
        &self,
        update: &SimulationStateUpdate,
    ) -> Result<SimulationState, StoreError> {
        let mut tables = self.write()?;
        update.apply(&mut tables.simulation);
        Ok(tables.simulation.clone())
    }

    fn apply_step(&self, batch: &StepBatch) -> Result<SimulationState, StoreError> {
        // Every mutation below is infallible, so holding the write lock for
        // the whole batch is enough for all-or-nothing.
        let mut tables = self.write()?;
        for s in &batch.supersessions {
            tables.supersede(&s.patient_id, Some((s.drug_a.as_str(), s.drug_b.as_str())));
        }
        tables.lab_results.extend(batch.labs.iter().cloned());
        tables.alerts.extend(batch.alerts.iter().cloned());
        tables.audit_logs.extend(batch.audit_logs.iter().cloned());
        batch.state.apply(&mut tables.simulation);
        Ok(tables.simulation.clone())
    }

    fn reset(&self) -> Result<(), StoreError> {
        *self.write()? = Tables::seeded();
        tracing::info!("In-memory store reset to seed data");
        Ok(())
    }
}
