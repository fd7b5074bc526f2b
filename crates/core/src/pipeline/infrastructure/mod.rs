pub mod sequential_session_runner;
pub mod threaded_session_runner;
