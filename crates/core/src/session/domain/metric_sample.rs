use serde::Serialize;

use crate::perception::domain::action_units::ActionUnitSet;
use crate::perception::domain::emotion::EmotionReading;
use crate::vitals::domain::blink_detector::BlinkReading;
use crate::vitals::domain::gaze_classifier::GazeReading;
use crate::vitals::domain::head_pose_estimator::HeadAngles;
use crate::vitals::domain::movement_detector::MovementReading;
use crate::vitals::domain::posture_scorer::PostureReading;

/// One periodic reading of a metric. `timestamp` is seconds into the
/// session at the frame that triggered the sample.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricSample<T> {
    pub timestamp: f64,
    pub value: T,
}

impl<T> MetricSample<T> {
    pub fn new(timestamp: f64, value: T) -> Self {
        Self { timestamp, value }
    }
}

/// Every sample taken during collection, per metric, in timestamp order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleLog {
    pub heart_rate: Vec<MetricSample<f64>>,
    pub breathing_rate: Vec<MetricSample<f64>>,
    pub blink: Vec<MetricSample<BlinkReading>>,
    pub posture: Vec<MetricSample<PostureReading>>,
    pub head_pose: Vec<MetricSample<HeadAngles>>,
    pub gaze: Vec<MetricSample<GazeReading>>,
    pub movement: Vec<MetricSample<MovementReading>>,
    pub emotion: Vec<MetricSample<EmotionReading>>,
    pub action_units: Vec<MetricSample<ActionUnitSet>>,
    /// Behavioral sampling points reached, whether or not anything was seen.
    pub behavioral_ticks: usize,
    pub vital_ticks: usize,
}
