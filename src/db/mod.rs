//! Clinical data store: the `ClinicalStore` seam plus its in-memory and
//! SQLite implementations.

pub mod memory;
pub mod repository;
pub mod seed;
pub mod sqlite;
pub mod sqlite_store;

pub use memory::MemoryStore;
pub use sqlite::{open_database, open_memory_database};
pub use sqlite_store::SqliteStore;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Alert, AlertFilter, AlertUpdate, AuditLog, LabResult, Medication, Patient, SimulationState,
    SimulationStateUpdate,
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },
}

impl StoreError {
    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}

/// Everything one simulation tick writes. Stores apply a batch
/// all-or-nothing: supersessions first, then the new records, then the
/// clock update.
#[derive(Debug, Default)]
pub struct StepBatch {
    pub labs: Vec<LabResult>,
    pub supersessions: Vec<Supersession>,
    pub alerts: Vec<Alert>,
    pub audit_logs: Vec<AuditLog>,
    pub state: SimulationStateUpdate,
}

/// Active context-aware alerts for one patient and drug pair to retire.
#[derive(Debug, Clone)]
pub struct Supersession {
    pub patient_id: String,
    pub drug_a: String,
    pub drug_b: String,
}

/// Storage collaborator for the engine and the HTTP layer.
///
/// Lab results and audit entries are append-only. List operations return
/// records in insertion order; presentation ordering is the caller's job.
pub trait ClinicalStore: Send + Sync {
    fn get_patients(&self) -> Result<Vec<Patient>, StoreError>;
    fn get_patient(&self, id: &str) -> Result<Option<Patient>, StoreError>;

    fn get_medications(&self, patient_id: Option<&str>) -> Result<Vec<Medication>, StoreError>;

    fn get_lab_results(&self, patient_id: Option<&str>) -> Result<Vec<LabResult>, StoreError>;
    fn insert_lab_result(&self, lab: &LabResult) -> Result<(), StoreError>;

    fn get_alerts(&self, filter: &AlertFilter) -> Result<Vec<Alert>, StoreError>;
    fn get_alert(&self, id: &Uuid) -> Result<Option<Alert>, StoreError>;
    fn insert_alert(&self, alert: &Alert) -> Result<(), StoreError>;
    /// Apply `update` and return the alert as stored afterwards.
    fn update_alert(&self, id: &Uuid, update: &AlertUpdate) -> Result<Alert, StoreError>;
    /// Mark active context-aware alerts for the patient as superseded,
    /// restricted to one drug pair when given. Returns the number changed.
    fn deactivate_context_alerts(
        &self,
        patient_id: &str,
        drug_pair: Option<(&str, &str)>,
    ) -> Result<usize, StoreError>;

    fn get_audit_logs(&self, patient_id: Option<&str>) -> Result<Vec<AuditLog>, StoreError>;
    fn insert_audit_log(&self, log: &AuditLog) -> Result<(), StoreError>;

    fn get_simulation_state(&self) -> Result<SimulationState, StoreError>;
    fn update_simulation_state(
        &self,
        update: &SimulationStateUpdate,
    ) -> Result<SimulationState, StoreError>;

    /// Apply one tick atomically and return the resulting clock. On error
    /// nothing from the batch is visible.
    fn apply_step(&self, batch: &StepBatch) -> Result<SimulationState, StoreError>;

    /// Drop all generated data and restore the seed dataset.
    fn reset(&self) -> Result<(), StoreError>;
}
