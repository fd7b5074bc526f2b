use crate::perception::domain::action_units::{ActionUnitDetector, ActionUnitSet};
use crate::perception::domain::face_landmarks::{
    FaceLandmarks, BROW_INNER, BROW_OUTER, LOWER_LIP, MOUTH_LEFT, MOUTH_RIGHT, UPPER_LIP,
};

/// Lip corner puller.
pub const AU_SMILE: &str = "AU12";
/// Inner brow raiser.
pub const AU_BROW_RAISE: &str = "AU01";
/// Lips part.
pub const AU_LIPS_PART: &str = "AU25";

/// Action units from normalised landmark distances.
///
/// Coarse but model-free: used when the provider does not emit action
/// units of its own.
#[derive(Clone, Debug)]
pub struct LandmarkActionUnitDetector {
    smile_span: f64,
    brow_raise: f64,
    lips_apart: f64,
}

impl LandmarkActionUnitDetector {
    pub fn new(smile_span: f64, brow_raise: f64, lips_apart: f64) -> Self {
        Self {
            smile_span,
            brow_raise,
            lips_apart,
        }
    }
}

impl Default for LandmarkActionUnitDetector {
    fn default() -> Self {
        Self::new(0.3, 0.02, 0.02)
    }
}

impl ActionUnitDetector for LandmarkActionUnitDetector {
    fn detect(&self, face: &FaceLandmarks) -> Option<ActionUnitSet> {
        let mouth_width = (face.point(MOUTH_LEFT)?.x - face.point(MOUTH_RIGHT)?.x).abs();
        let brow_delta = (face.point(BROW_INNER)?.y - face.point(BROW_OUTER)?.y).abs();
        let lip_gap = (face.point(UPPER_LIP)?.y - face.point(LOWER_LIP)?.y).abs();

        let mut units = ActionUnitSet::new();
        units.set(AU_SMILE, mouth_width > self.smile_span);
        units.set(AU_BROW_RAISE, brow_delta > self.brow_raise);
        units.set(AU_LIPS_PART, lip_gap > self.lips_apart);
        Some(units)
    }
}
