//! API endpoint handlers, one module per dashboard view.

pub mod alerts;
pub mod audit;
pub mod comparison;
pub mod handover;
pub mod health;
pub mod patients;
pub mod risk;
pub mod simulate;
