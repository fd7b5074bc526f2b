use super::action_units::ActionUnitSet;
use super::emotion::EmotionReading;
use super::face_landmarks::FaceLandmarks;
use super::pose_landmarks::PoseLandmarks;
use crate::shared::roi_patch::RoiSample;

/// Everything the perception model observed in one captured frame.
///
/// Any part may be absent; the session skips the features that depend on it.
#[derive(Clone, Debug, Default)]
pub struct FrameSample {
    pub width: u32,
    pub height: u32,
    pub face: Option<FaceLandmarks>,
    pub pose: Option<PoseLandmarks>,
    pub roi: Option<RoiSample>,
    pub emotion: Option<EmotionReading>,
    pub action_units: Option<ActionUnitSet>,
}

impl FrameSample {
    /// A frame in which nothing was detected.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}
