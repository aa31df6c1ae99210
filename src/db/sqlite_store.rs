use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use super::repository;
use super::seed::seed_data;
use super::{open_database, open_memory_database, ClinicalStore, StepBatch, StoreError};
use crate::models::{
    Alert, AlertFilter, AlertUpdate, AuditLog, LabResult, Medication, Patient, SimulationState,
    SimulationStateUpdate,
};

/// SQLite-backed store. One connection, serialized behind a `Mutex`.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file. An empty database is seeded.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::from_connection(open_database(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(open_memory_database()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        if repository::get_patients(&conn)?.is_empty() {
            load_seed(&conn)?;
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

fn load_seed(conn: &Connection) -> Result<(), StoreError> {
    let seed = seed_data(Utc::now());
    let tx = conn.unchecked_transaction()?;
    for patient in &seed.patients {
        repository::insert_patient(&tx, patient)?;
    }
    for med in &seed.medications {
        repository::insert_medication(&tx, med)?;
    }
    for lab in &seed.labs {
        repository::insert_lab_result(&tx, lab)?;
    }
    tx.commit()?;
    Ok(())
}

impl ClinicalStore for SqliteStore {
    fn get_patients(&self) -> Result<Vec<Patient>, StoreError> {
        repository::get_patients(&*self.conn()?)
    }

    fn get_patient(&self, id: &str) -> Result<Option<Patient>, StoreError> {
        repository::get_patient(&*self.conn()?, id)
    }

    fn get_medications(&self, patient_id: Option<&str>) -> Result<Vec<Medication>, StoreError> {
        repository::get_medications(&*self.conn()?, patient_id)
    }

    fn get_lab_results(&self, patient_id: Option<&str>) -> Result<Vec<LabResult>, StoreError> {
        repository::get_lab_results(&*self.conn()?, patient_id)
    }

    fn insert_lab_result(&self, lab: &LabResult) -> Result<(), StoreError> {
        repository::insert_lab_result(&*self.conn()?, lab)
    }

    fn get_alerts(&self, filter: &AlertFilter) -> Result<Vec<Alert>, StoreError> {
        repository::get_alerts(&*self.conn()?, filter)
    }

    fn get_alert(&self, id: &Uuid) -> Result<Option<Alert>, StoreError> {
        repository::get_alert(&*self.conn()?, id)
    }

    fn insert_alert(&self, alert: &Alert) -> Result<(), StoreError> {
        repository::insert_alert(&*self.conn()?, alert)
    }

    fn update_alert(&self, id: &Uuid, update: &AlertUpdate) -> Result<Alert, StoreError> {
        let conn = self.conn()?;
        let mut alert =
            repository::get_alert(&conn, id)?.ok_or_else(|| StoreError::not_found("alert", id))?;
        update.apply(&mut alert);
        repository::update_alert_fields(
            &conn,
            id,
            alert.status,
            alert.clinician_feedback.as_deref(),
        )?;
        Ok(alert)
    }

    fn deactivate_context_alerts(
        &self,
        patient_id: &str,
        drug_pair: Option<(&str, &str)>,
    ) -> Result<usize, StoreError> {
        repository::supersede_context_alerts(&*self.conn()?, patient_id, drug_pair)
    }

    fn get_audit_logs(&self, patient_id: Option<&str>) -> Result<Vec<AuditLog>, StoreError> {
        repository::get_audit_logs(&*self.conn()?, patient_id)
    }

    fn insert_audit_log(&self, log: &AuditLog) -> Result<(), StoreError> {
        repository::insert_audit_log(&*self.conn()?, log)
    }

    fn get_simulation_state(&self) -> Result<SimulationState, StoreError> {
        repository::get_simulation_state(&*self.conn()?)
    }

    fn update_simulation_state(
        &self,
        update: &SimulationStateUpdate,
    ) -> Result<SimulationState, StoreError> {
        let conn = self.conn()?;
        let mut state = repository::get_simulation_state(&conn)?;
        update.apply(&mut state);
        repository::save_simulation_state(&conn, &state)?;
        Ok(state)
    }

    fn apply_step(&self, batch: &StepBatch) -> Result<SimulationState, StoreError> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        for s in &batch.supersessions {
            repository::supersede_context_alerts(
                &tx,
                &s.patient_id,
                Some((s.drug_a.as_str(), s.drug_b.as_str())),
            )?;
        }
        for lab in &batch.labs {
            repository::insert_lab_result(&tx, lab)?;
        }
        for alert in &batch.alerts {
            repository::insert_alert(&tx, alert)?;
        }
        for log in &batch.audit_logs {
            repository::insert_audit_log(&tx, log)?;
        }
        let mut state = repository::get_simulation_state(&tx)?;
        batch.state.apply(&mut state);
        repository::save_simulation_state(&tx, &state)?;
        tx.commit()?;
        Ok(state)
    }

    fn reset(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        repository::clear_all(&conn)?;
        load_seed(&conn)?;
        tracing::info!("SQLite store reset to seed data");
        Ok(())
    }
}
