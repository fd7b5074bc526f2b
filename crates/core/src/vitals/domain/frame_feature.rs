use super::blink_detector::eye_aspect_ratio;
use super::gaze_classifier::iris_offset;
use super::movement_detector::UpperBodyKeypoints;
use super::posture_scorer::TorsoGeometry;
use crate::perception::domain::action_units::{ActionUnitDetector, ActionUnitSet};
use crate::perception::domain::emotion::EmotionReading;
use crate::perception::domain::face_landmarks::{
    FaceLandmarks, HEAD_POSE_POINTS, LEFT_EYE, LEFT_EYE_INNER, LEFT_EYE_OUTER, LEFT_IRIS_CENTER,
    RIGHT_EYE,
};
use crate::perception::domain::frame_sample::FrameSample;
use crate::perception::domain::pose_landmarks::UPPER_BODY;
use crate::shared::point::Point2;
use crate::shared::roi_patch::Rgb;

/// Everything measured from one frame. Missing parts are `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameFeature {
    pub index: usize,
    /// Seconds since the session started.
    pub timestamp: f64,
    pub roi: Option<Rgb>,
    pub ear: Option<f64>,
    pub iris_offset: Option<f64>,
    pub head_points: Option<HeadPosePoints>,
    pub torso: Option<TorsoGeometry>,
    pub upper_body: Option<UpperBodyKeypoints>,
    pub emotion: Option<EmotionReading>,
    pub action_units: Option<ActionUnitSet>,
}

/// Head-pose landmarks in pixels with the frame size they were taken at.
/// Solved only when a behavioral sample is due.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadPosePoints {
    pub points: [Point2; 6],
    pub width: u32,
    pub height: u32,
}

/// Turns a [`FrameSample`] into a [`FrameFeature`].
pub struct FeatureExtractor {
    sample_rate: f64,
    action_units: Option<Box<dyn ActionUnitDetector>>,
}

impl FeatureExtractor {
    pub fn new(fps: f64) -> Self {
        Self {
            sample_rate: fps,
            action_units: None,
        }
    }

    /// Fills in action units for frames whose provider supplied none.
    pub fn with_action_unit_detector(mut self, detector: Box<dyn ActionUnitDetector>) -> Self {
        self.action_units = Some(detector);
        self
    }

    pub fn extract(&self, index: usize, sample: &FrameSample) -> FrameFeature {
        let face = sample.face.as_ref();
        let pose = sample.pose.as_ref();

        FrameFeature {
            index,
            timestamp: index as f64 / self.sample_rate,
            roi: sample.roi.as_ref().and_then(|roi| roi.channel_means()),
            ear: face.and_then(|f| mean_ear(f, sample.width, sample.height)),
            iris_offset: face.and_then(left_iris_offset),
            head_points: face.and_then(|f| {
                Some(HeadPosePoints {
                    points: f.pixels(&HEAD_POSE_POINTS, sample.width, sample.height)?,
                    width: sample.width,
                    height: sample.height,
                })
            }),
            torso: pose.and_then(TorsoGeometry::from_pose),
            upper_body: pose.and_then(|p| p.select(&UPPER_BODY)),
            emotion: sample.emotion.clone(),
            action_units: sample.action_units.clone().or_else(|| {
                let detector = self.action_units.as_ref()?;
                detector.detect(face?)
            }),
        }
    }
}

/// Eye aspect ratio averaged over both eyes, in pixel space.
fn mean_ear(face: &FaceLandmarks, width: u32, height: u32) -> Option<f64> {
    let left = eye_aspect_ratio(&face.pixels(&LEFT_EYE, width, height)?)?;
    let right = eye_aspect_ratio(&face.pixels(&RIGHT_EYE, width, height)?)?;
    Some((left + right) / 2.0)
}

fn left_iris_offset(face: &FaceLandmarks) -> Option<f64> {
    Some(iris_offset(
        face.point(LEFT_EYE_OUTER)?,
        face.point(LEFT_EYE_INNER)?,
        face.point(LEFT_IRIS_CENTER)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::domain::pose_landmarks::PoseLandmarks;
    use crate::perception::infrastructure::landmark_action_unit_detector::LandmarkActionUnitDetector;
    use crate::shared::roi_patch::RoiSample;
    use crate::test_support::{face_mesh, upright_pose};
    use crate::vitals::domain::head_pose_estimator::HeadPoseEstimator;
    use approx::assert_relative_eq;

    fn full_sample() -> FrameSample {
        FrameSample {
            width: 640,
            height: 480,
            face: Some(face_mesh(0.3, 0.02)),
            pose: Some(upright_pose(0.5)),
            roi: Some(RoiSample::Means(Rgb::new(150.0, 100.0, 80.0))),
            emotion: Some(EmotionReading::new("neutral", 0.8)),
            action_units: None,
        }
    }

    #[test]
    fn test_extracts_every_feature() {
        let feature = FeatureExtractor::new(30.0).extract(45, &full_sample());
        assert_eq!(feature.index, 45);
        assert_relative_eq!(feature.timestamp, 1.5);
        assert_eq!(feature.roi, Some(Rgb::new(150.0, 100.0, 80.0)));
        assert_relative_eq!(feature.ear.unwrap(), 0.3, epsilon = 1e-9);
        assert_relative_eq!(feature.iris_offset.unwrap(), 0.02, epsilon = 1e-9);
        let points = feature.head_points.expect("head pose points");
        assert_eq!((points.width, points.height), (640, 480));
        let head = HeadPoseEstimator::new()
            .estimate(&points.points, points.width, points.height)
            .into_value()
            .expect("head pose");
        assert!(head.pitch.abs() < 1.0 && head.yaw.abs() < 1.0 && head.roll.abs() < 1.0);
        assert!(feature.torso.is_some());
        assert!(feature.upper_body.is_some());
        assert_eq!(feature.emotion.unwrap().label, "neutral");
        assert!(feature.action_units.is_none());
    }

    #[test]
    fn test_empty_frame_has_no_features() {
        let feature = FeatureExtractor::new(30.0).extract(0, &FrameSample::empty(640, 480));
        assert!(feature.roi.is_none());
        assert!(feature.ear.is_none());
        assert!(feature.iris_offset.is_none());
        assert!(feature.head_points.is_none());
        assert!(feature.torso.is_none());
        assert!(feature.upper_body.is_none());
    }

    #[test]
    fn test_detector_fills_missing_action_units() {
        let extractor = FeatureExtractor::new(30.0)
            .with_action_unit_detector(Box::new(LandmarkActionUnitDetector::default()));
        let feature = extractor.extract(0, &full_sample());
        assert!(feature.action_units.is_some());
    }

    #[test]
    fn test_provider_action_units_take_precedence() {
        let extractor = FeatureExtractor::new(30.0)
            .with_action_unit_detector(Box::new(LandmarkActionUnitDetector::default()));
        let mut sample = full_sample();
        sample.action_units = Some(ActionUnitSet::from_active(["AU45"]));
        let feature = extractor.extract(0, &sample);
        assert!(feature.action_units.unwrap().is_active("AU45"));
    }

    #[test]
    fn test_pose_without_face() {
        let sample = FrameSample {
            pose: Some(PoseLandmarks::new(upright_pose(0.5).points().to_vec())),
            ..FrameSample::empty(640, 480)
        };
        let feature = FeatureExtractor::new(30.0).extract(0, &sample);
        assert!(feature.ear.is_none());
        assert!(feature.torso.is_some());
    }
}
