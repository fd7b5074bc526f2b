pub mod collect_vitals_use_case;
pub mod collection_error;
pub mod infrastructure;
pub mod session_logger;
pub mod session_runner;
