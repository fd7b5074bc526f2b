//! Deterministic synthetic inputs shared by unit tests.

use std::collections::VecDeque;
use std::f64::consts::PI;
use std::sync::{Arc, Mutex};

use crate::perception::domain::emotion::EmotionReading;
use crate::perception::domain::face_landmarks::{
    FaceLandmarks, CHIN, LEFT_EYE, LEFT_EYE_OUTER, LEFT_IRIS_CENTER, MOUTH_LEFT, MOUTH_RIGHT,
    NOSE_TIP, RIGHT_EYE, RIGHT_EYE_OUTER,
};
use crate::perception::domain::frame_sample::FrameSample;
use crate::perception::domain::landmark_provider::{LandmarkProvider, ProviderError, SourceInfo};
use crate::perception::domain::pose_landmarks::{
    PoseLandmarks, LEFT_ELBOW, LEFT_HIP, LEFT_SHOULDER, LEFT_WRIST, NOSE, RIGHT_ELBOW, RIGHT_HIP,
    RIGHT_SHOULDER, RIGHT_WRIST,
};
use crate::shared::point::Point2;
use crate::shared::roi_patch::{Rgb, RoiSample};
use crate::vitals::domain::head_pose_estimator::MODEL_POINTS;

pub const FRAME_WIDTH: u32 = 640;
pub const FRAME_HEIGHT: u32 = 480;

const FACE_DEPTH: f64 = 2500.0;
const EYE_WIDTH_PX: f64 = 40.0;
const PULSE_HZ: f64 = 1.2;
const BREATH_HZ: f64 = 0.25;

/// Skin means carrying a pulse at `freq_hz`, with the channel phase
/// differences a real face shows.
pub fn pulse_roi(freq_hz: f64, fps: f64, frames: usize) -> Vec<Rgb> {
    (0..frames).map(|i| pulse_sample(freq_hz, fps, i)).collect()
}

fn pulse_sample(freq_hz: f64, fps: f64, index: usize) -> Rgb {
    let theta = 2.0 * PI * freq_hz * index as f64 / fps;
    Rgb::new(
        150.0 + 0.5 * theta.sin(),
        100.0 + 1.5 * (theta + 0.6).sin(),
        80.0 + 0.3 * (theta + 2.5).sin(),
    )
}

/// Mean shoulder height rising and falling at `freq_hz`.
pub fn shoulder_wave(freq_hz: f64, fps: f64, samples: usize) -> Vec<f64> {
    (0..samples)
        .map(|i| 0.5 + 0.01 * (2.0 * PI * freq_hz * i as f64 / fps).sin())
        .collect()
}

/// Pixel position of a model point for a frontal face.
fn frontal_pixel(model: [f64; 3]) -> Point2 {
    // Facing the camera flips y and z.
    let (x, y, z) = (model[0], -model[1], FACE_DEPTH - model[2]);
    let focal = f64::from(FRAME_WIDTH);
    Point2::new(
        focal * x / z + f64::from(FRAME_WIDTH) / 2.0,
        focal * y / z + f64::from(FRAME_HEIGHT) / 2.0,
    )
}

fn normalised(p: Point2) -> Point2 {
    Point2::new(p.x / f64::from(FRAME_WIDTH), p.y / f64::from(FRAME_HEIGHT))
}

/// Places an eye contour whose pixel-space aspect ratio is `ear`.
fn place_eye(points: &mut [Point2], indices: &[usize; 6], start: Point2, ear: f64) {
    let w = EYE_WIDTH_PX;
    let h = ear * w / 2.0;
    let offsets = [
        (0.0, 0.0),
        (w / 3.0, -h),
        (2.0 * w / 3.0, -h),
        (w, 0.0),
        (2.0 * w / 3.0, h),
        (w / 3.0, h),
    ];
    for (&index, (dx, dy)) in indices.iter().zip(offsets) {
        points[index] = normalised(Point2::new(start.x + dx, start.y + dy));
    }
}

/// A frontal 478-point face mesh for a 640x480 frame with the given eye
/// aspect ratio and left-iris offset.
pub fn face_mesh(ear: f64, gaze_offset: f64) -> FaceLandmarks {
    let mut points = vec![Point2::new(0.5, 0.5); 478];
    for (&index, model) in [NOSE_TIP, CHIN, LEFT_EYE_OUTER, RIGHT_EYE_OUTER, MOUTH_LEFT, MOUTH_RIGHT]
        .iter()
        .zip(MODEL_POINTS)
    {
        points[index] = normalised(frontal_pixel(model));
    }

    let left_outer = frontal_pixel(MODEL_POINTS[2]);
    let right_outer = frontal_pixel(MODEL_POINTS[3]);
    place_eye(&mut points, &LEFT_EYE, left_outer, ear);
    // The right contour starts at its inner corner and ends on 263.
    place_eye(
        &mut points,
        &RIGHT_EYE,
        Point2::new(right_outer.x - EYE_WIDTH_PX, right_outer.y),
        ear,
    );

    let iris_x = left_outer.x + EYE_WIDTH_PX / 2.0 + gaze_offset * EYE_WIDTH_PX;
    points[LEFT_IRIS_CENTER] = normalised(Point2::new(iris_x, left_outer.y));
    FaceLandmarks::new(points)
}

/// A seated, level upper body with shoulders at height `shoulder_y`.
pub fn upright_pose(shoulder_y: f64) -> PoseLandmarks {
    let mut points = vec![Point2::new(0.5, 0.5); 33];
    points[NOSE] = Point2::new(0.5, shoulder_y - 0.15);
    points[LEFT_SHOULDER] = Point2::new(0.6, shoulder_y);
    points[RIGHT_SHOULDER] = Point2::new(0.4, shoulder_y);
    points[LEFT_ELBOW] = Point2::new(0.65, shoulder_y + 0.2);
    points[RIGHT_ELBOW] = Point2::new(0.35, shoulder_y + 0.2);
    points[LEFT_WRIST] = Point2::new(0.6, shoulder_y + 0.35);
    points[RIGHT_WRIST] = Point2::new(0.4, shoulder_y + 0.35);
    points[LEFT_HIP] = Point2::new(0.58, shoulder_y + 0.4);
    points[RIGHT_HIP] = Point2::new(0.42, shoulder_y + 0.4);
    PoseLandmarks::new(points)
}

/// A calm, well-lit participant: 72 BPM pulse, 15 breaths per minute, a
/// three-frame blink every three seconds, centred gaze, level posture.
pub fn healthy_frame(index: usize, fps: f64) -> FrameSample {
    let blinking = index % 90 >= 45 && index % 90 < 48;
    let ear = if blinking { 0.15 } else { 0.3 };
    let shoulder_y = 0.5 + 0.01 * (2.0 * PI * BREATH_HZ * index as f64 / fps).sin();
    let label = if (index / 30) % 4 == 3 { "happy" } else { "neutral" };

    FrameSample {
        width: FRAME_WIDTH,
        height: FRAME_HEIGHT,
        face: Some(face_mesh(ear, 0.0)),
        pose: Some(upright_pose(shoulder_y)),
        roi: Some(RoiSample::Means(pulse_sample(PULSE_HZ, fps, index))),
        emotion: Some(EmotionReading::new(label, 0.9)),
        action_units: None,
    }
}

pub fn healthy_frames(count: usize, fps: f64) -> Vec<FrameSample> {
    (0..count).map(|i| healthy_frame(i, fps)).collect()
}

/// Frames in which the model found nobody.
pub fn empty_frames(count: usize) -> Vec<FrameSample> {
    (0..count)
        .map(|_| FrameSample::empty(FRAME_WIDTH, FRAME_HEIGHT))
        .collect()
}

/// Serves a fixed list of frames.
pub struct ScriptedProvider {
    frames: VecDeque<FrameSample>,
    open: bool,
    fail_open: bool,
    /// Read error raised once this many frames have been served.
    fail_after: Option<usize>,
    served: usize,
    pub closed: Arc<Mutex<bool>>,
}

impl ScriptedProvider {
    pub fn new(frames: Vec<FrameSample>) -> Self {
        Self {
            frames: frames.into(),
            open: false,
            fail_open: false,
            fail_after: None,
            served: 0,
            closed: Arc::new(Mutex::new(false)),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            fail_open: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn failing_after(frames: Vec<FrameSample>, served: usize) -> Self {
        Self {
            fail_after: Some(served),
            ..Self::new(frames)
        }
    }
}

impl LandmarkProvider for ScriptedProvider {
    fn open(&mut self) -> Result<SourceInfo, ProviderError> {
        if self.fail_open {
            return Err(ProviderError::Unavailable(
                "scripted".to_string(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "no camera"),
            ));
        }
        self.open = true;
        Ok(SourceInfo {
            description: "scripted".to_string(),
            source_path: None,
            fps: Some(30.0),
        })
    }

    fn next_frame(&mut self) -> Result<Option<FrameSample>, ProviderError> {
        if !self.open {
            return Err(ProviderError::NotOpen);
        }
        if self.fail_after == Some(self.served) {
            return Err(ProviderError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "camera unplugged",
            )));
        }
        self.served += 1;
        Ok(self.frames.pop_front())
    }

    fn close(&mut self) {
        self.open = false;
        *self.closed.lock().unwrap() = true;
    }
}
