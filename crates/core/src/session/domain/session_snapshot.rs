use serde::Serialize;

use super::session::SessionState;
use crate::vitals::domain::blink_detector::BlinkReading;
use crate::vitals::domain::gaze_classifier::GazeDirection;
use crate::vitals::domain::head_pose_estimator::HeadAngles;
use crate::vitals::domain::movement_detector::FidgetLevel;
use crate::vitals::domain::posture_scorer::PostureReading;

/// Read-only view of a session in progress, published to observers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub frames_captured: usize,
    pub target_frames: usize,
    pub elapsed_seconds: f64,
    pub heart_rate: Option<f64>,
    pub breathing_rate: Option<f64>,
    pub blink: Option<BlinkReading>,
    pub gaze: Option<GazeDirection>,
    pub head_pose: Option<HeadAngles>,
    pub posture: Option<PostureReading>,
    pub movement: Option<FidgetLevel>,
    pub emotion: Option<String>,
    pub active_action_units: Option<usize>,
}

impl SessionSnapshot {
    /// Fraction of the target frames captured, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.target_frames == 0 {
            return 1.0;
        }
        (self.frames_captured as f64 / self.target_frames as f64).min(1.0)
    }
}
