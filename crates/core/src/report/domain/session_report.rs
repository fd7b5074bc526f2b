//! The end-of-session report. Field order and names are the JSON keys
//! consumers read; every key is present whether or not its metric was
//! detected.

use serde::Serialize;

use super::behavior_summary::{
    ActionUnitSummary, EmotionSummary, GazeSummary, HeadPoseSummary, HrvSummary,
    MovementSummary, PostureSummary,
};
use super::health_score::OverallHealth;
use super::rate_summary::RateSummary;
use super::rules::RiskFactor;
use super::vital_summary::VitalSummary;
use crate::vitals::domain::blink_detector::BlinkReading;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionReport {
    pub session_summary: SessionSummary,
    pub physiological_vitals: PhysiologicalVitals,
    pub eye_attention: EyeAttention,
    pub posture_behavior: PostureBehavior,
    pub emotion: VitalSummary<EmotionSummary>,
    pub facial_action_units: ActionUnitSummary,
    pub capture_info: CaptureInfo,
}

impl SessionReport {
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSummary {
    pub overall_health_status: OverallHealth,
    pub key_findings: Vec<String>,
    pub recommendations: Vec<String>,
    pub risk_factors: Vec<RiskFactor>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PhysiologicalVitals {
    pub heart_rate: RateSummary<f64>,
    pub breathing_rate: RateSummary<f64>,
    pub hrv: VitalSummary<HrvSummary>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EyeAttention {
    pub blink_rate: RateSummary<BlinkReading>,
    pub gaze: VitalSummary<GazeSummary>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PostureBehavior {
    pub posture: VitalSummary<PostureSummary>,
    pub head_pose: VitalSummary<HeadPoseSummary>,
    pub movement: VitalSummary<MovementSummary>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CaptureInfo {
    pub frames_captured: usize,
    pub duration_seconds: f64,
    pub fps: u32,
    /// Behavioral sampling points reached.
    pub behavioral_samples: usize,
    /// Heart rate samples taken.
    pub vital_samples: usize,
    pub sample_intervals: SampleIntervals,
    pub data_quality: DataQuality,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SampleIntervals {
    pub behavioral: String,
    pub vitals: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DataQuality {
    pub hr_samples_collected: usize,
    pub br_samples_collected: usize,
    pub blink_samples_collected: usize,
    pub behavioral_samples_collected: usize,
    pub hrv_calculated: bool,
}
