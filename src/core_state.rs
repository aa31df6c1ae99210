//! Shared application state: the clinical store, the interaction knowledge
//! base and the simulation coordinator, wired once at startup and shared
//! by every HTTP handler through an `Arc`.

use std::sync::Arc;

use thiserror::Error;

use crate::config::{AppConfig, StoreKind};
use crate::db::{ClinicalStore, MemoryStore, SqliteStore, StoreError};
use crate::engine::{InteractionLookup, KnowledgeBase, KnowledgeError};
use crate::simulation::{ScenarioCatalog, SimulationCoordinator};

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    store: Arc<dyn ClinicalStore>,
    knowledge: Arc<dyn InteractionLookup>,
    simulation: SimulationCoordinator,
}

impl CoreState {
    /// Build state from configuration, opening the configured store.
    pub fn from_config(config: &AppConfig) -> Result<Self, CoreError> {
        let store: Arc<dyn ClinicalStore> = match config.store {
            StoreKind::Memory => Arc::new(MemoryStore::new()),
            StoreKind::Sqlite => {
                if let Some(parent) = config.db_path.parent() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| CoreError::DataDir(e.to_string()))?;
                }
                tracing::info!(path = %config.db_path.display(), "Opening SQLite store");
                Arc::new(SqliteStore::open(&config.db_path)?)
            }
        };

        Self::assemble(
            store,
            Arc::new(KnowledgeBase::bundled()?),
            ScenarioCatalog::bundled()?,
            config.supersede_alerts,
        )
    }

    /// In-memory store with the bundled knowledge base and scenarios.
    pub fn in_memory() -> Result<Self, CoreError> {
        Self::assemble(
            Arc::new(MemoryStore::new()),
            Arc::new(KnowledgeBase::bundled()?),
            ScenarioCatalog::bundled()?,
            false,
        )
    }

    pub fn assemble(
        store: Arc<dyn ClinicalStore>,
        knowledge: Arc<dyn InteractionLookup>,
        scenarios: ScenarioCatalog,
        supersede_alerts: bool,
    ) -> Result<Self, CoreError> {
        let simulation = SimulationCoordinator::new(store.clone(), knowledge.clone(), scenarios)
            .with_supersession(supersede_alerts);
        Ok(Self {
            store,
            knowledge,
            simulation,
        })
    }

    pub fn store(&self) -> &dyn ClinicalStore {
        self.store.as_ref()
    }

    pub fn knowledge(&self) -> &dyn InteractionLookup {
        self.knowledge.as_ref()
    }

    pub fn simulation(&self) -> &SimulationCoordinator {
        &self.simulation
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Reference data error: {0}")]
    Knowledge(#[from] KnowledgeError),
    #[error("Cannot prepare data directory: {0}")]
    DataDir(String),
}
