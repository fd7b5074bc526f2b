//! Body landmarks in normalised image coordinates, indexed like MediaPipe
//! Pose (33 points).

use crate::shared::point::Point2;

pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;

/// Shoulders, elbows and wrists: the joints tracked for fidgeting.
pub const UPPER_BODY: [usize; 6] = [
    LEFT_SHOULDER,
    RIGHT_SHOULDER,
    LEFT_ELBOW,
    RIGHT_ELBOW,
    LEFT_WRIST,
    RIGHT_WRIST,
];

#[derive(Clone, Debug, PartialEq)]
pub struct PoseLandmarks {
    points: Vec<Point2>,
}

impl PoseLandmarks {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<Point2> {
        self.points.get(index).copied().filter(Point2::is_finite)
    }

    pub fn select<const N: usize>(&self, indices: &[usize; N]) -> Option<[Point2; N]> {
        let mut out = [Point2::default(); N];
        for (slot, &index) in out.iter_mut().zip(indices) {
            *slot = self.point(index)?;
        }
        Some(out)
    }
}
