pub mod collected_session;
pub mod metric_sample;
pub mod session;
pub mod session_config;
pub mod session_error;
pub mod session_snapshot;
