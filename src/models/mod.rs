pub mod alert;
pub mod audit;
pub mod drug_pair;
pub mod enums;
pub mod lab;
pub mod medication;
pub mod patient;
pub mod simulation;

pub use alert::*;
pub use audit::*;
pub use drug_pair::*;
pub use lab::*;
pub use medication::*;
pub use patient::*;
pub use simulation::*;
