use super::metric_sample::SampleLog;
use super::session_config::SessionConfig;
use crate::vitals::domain::blink_detector::BlinkReading;
use crate::vitals::domain::estimate::Estimate;
use crate::vitals::domain::hrv_analyzer::HrvMetrics;

/// Everything a finished collection hands to the aggregator: the periodic
/// samples plus the whole-session estimates.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectedSession {
    pub config: SessionConfig,
    pub frames_captured: usize,
    pub samples: SampleLog,
    pub final_heart_rate: Estimate<f64>,
    pub final_breathing_rate: Estimate<f64>,
    /// Last blink reading of the session, if the eyes were ever seen.
    pub final_blink: Option<BlinkReading>,
    pub hrv: Estimate<HrvMetrics>,
}

impl CollectedSession {
    /// Captured length in seconds at the configured frame rate.
    pub fn duration_seconds(&self) -> f64 {
        self.frames_captured as f64 / self.config.sample_rate()
    }
}
