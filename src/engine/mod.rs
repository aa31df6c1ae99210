//! Clinical risk engine: pure, synchronous computations over patient data.

pub mod handover;
pub mod intervention;
pub mod knowledge;
pub mod risk;
pub mod trend;
pub mod triage;

pub use handover::{generate_handover_summary, HandoverSummary, LabTrend};
pub use intervention::{generate_intervention_card, InterventionCard};
pub use knowledge::{InteractionLookup, KnowledgeBase, KnowledgeError};
pub use risk::{
    classify_risk_severity, compute_organ_function_score, compute_risk_score, RenalSnapshot,
    RiskScore,
};
pub use trend::{compute_trend, compute_trend_factor, latest_value, LabPoint};
pub use triage::{
    create_context_aware_alert, create_static_alert, create_static_alert_variants,
    should_escalate,
};
