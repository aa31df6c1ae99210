//! Time-stepped replay of scripted clinical scenarios.

pub mod scenarios;
pub mod schedule;
pub mod stepper;

pub use scenarios::{Scenario, ScenarioCatalog, ScenarioLab, ScenarioStep};
pub use schedule::{next_hour, SCENARIO_HOURS};
pub use stepper::{
    ResetOutcome, SimulationCoordinator, SimulationError, StepResult, TickOutcome,
    EXPECTED_SCORE_TOLERANCE,
};
