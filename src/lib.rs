pub mod grid;
pub mod io;
pub mod sim;

// Prelude
pub use grid::{CavityGrid, PointCategory};
pub use sim::flow::{CaseResult, FlowConfig, FlowSimulation, run_case};
