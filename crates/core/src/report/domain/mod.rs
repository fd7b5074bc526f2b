pub mod aggregator;
pub mod behavior_summary;
pub mod health_score;
pub mod rate_summary;
pub mod rules;
pub mod session_report;
pub mod trend;
pub mod vital_summary;
