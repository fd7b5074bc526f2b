use serde::Serialize;

use crate::perception::domain::pose_landmarks::{
    PoseLandmarks, LEFT_SHOULDER, NOSE, RIGHT_SHOULDER,
};
use crate::shared::point::Point2;
use crate::shared::rounding::round_to;

pub const MAX_SHOULDER_SLOPE: f64 = 0.08;
pub const MAX_FORWARD_LEAN: f64 = 0.20;
const SLOPE_PENALTY: u32 = 30;
const LEAN_PENALTY: u32 = 40;
const GOOD_SCORE: u32 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostureStatus {
    Good,
    Poor,
}

/// Shoulder and nose positions for one frame, normalised.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TorsoGeometry {
    pub nose: Point2,
    pub left_shoulder: Point2,
    pub right_shoulder: Point2,
}

impl TorsoGeometry {
    /// `None` unless the nose and both shoulders are present.
    pub fn from_pose(pose: &PoseLandmarks) -> Option<Self> {
        Some(Self {
            nose: pose.point(NOSE)?,
            left_shoulder: pose.point(LEFT_SHOULDER)?,
            right_shoulder: pose.point(RIGHT_SHOULDER)?,
        })
    }

    /// Mean shoulder height: the breathing signal.
    pub fn shoulder_height(&self) -> f64 {
        (self.left_shoulder.y + self.right_shoulder.y) / 2.0
    }

    pub fn shoulder_slope(&self) -> f64 {
        (self.left_shoulder.y - self.right_shoulder.y).abs()
    }

    pub fn forward_lean(&self) -> f64 {
        (self.nose.y - self.shoulder_height()).abs()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PostureReading {
    pub status: PostureStatus,
    pub score: u32,
    pub shoulder_slope: f64,
    pub forward_lean: f64,
}

pub fn score(torso: &TorsoGeometry) -> PostureReading {
    score_measurements(torso.shoulder_slope(), torso.forward_lean())
}

/// Starts at 100 and deducts for tilted shoulders and a forward head.
pub fn score_measurements(shoulder_slope: f64, forward_lean: f64) -> PostureReading {
    let mut score = 100u32;
    if shoulder_slope > MAX_SHOULDER_SLOPE {
        score = score.saturating_sub(SLOPE_PENALTY);
    }
    if forward_lean > MAX_FORWARD_LEAN {
        score = score.saturating_sub(LEAN_PENALTY);
    }
    PostureReading {
        status: if score >= GOOD_SCORE {
            PostureStatus::Good
        } else {
            PostureStatus::Poor
        },
        score,
        shoulder_slope: round_to(shoulder_slope, 3),
        forward_lean: round_to(forward_lean, 3),
    }
}
