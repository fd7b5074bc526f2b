//! Signal-processing building blocks shared by the vital estimators.

pub mod butterworth;
pub mod peaks;
pub mod spectrum;
pub mod stats;
pub mod trend;
