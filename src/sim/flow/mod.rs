//! Constrained-acceleration cavity flow: operators, solver and marcher.

pub mod config;
pub mod constraint;
pub mod forcing;
pub mod mass;
pub mod projection;
pub mod recorder;
pub mod result;
pub mod simulation;
pub mod solver;

pub use config::FlowConfig;
pub use result::CaseResult;
pub use simulation::{FlowSimulation, run_case};
