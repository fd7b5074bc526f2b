//! Face mesh landmarks in normalised image coordinates, indexed like the
//! MediaPipe Face Mesh (468 points, 478 with iris refinement).

use crate::shared::point::Point2;

/// Outer corner, two upper lid points, inner corner, two lower lid points.
pub const LEFT_EYE: [usize; 6] = [33, 160, 158, 133, 153, 144];
pub const RIGHT_EYE: [usize; 6] = [362, 385, 387, 263, 373, 380];

pub const LEFT_EYE_OUTER: usize = 33;
pub const LEFT_EYE_INNER: usize = 133;
pub const LEFT_IRIS_CENTER: usize = 468;

pub const NOSE_TIP: usize = 1;
pub const CHIN: usize = 152;
pub const RIGHT_EYE_OUTER: usize = 263;
pub const MOUTH_LEFT: usize = 61;
pub const MOUTH_RIGHT: usize = 291;

pub const UPPER_LIP: usize = 13;
pub const LOWER_LIP: usize = 14;
pub const BROW_INNER: usize = 70;
pub const BROW_OUTER: usize = 63;

/// Landmarks fed to the head pose solver, in model-point order.
pub const HEAD_POSE_POINTS: [usize; 6] = [
    NOSE_TIP,
    CHIN,
    LEFT_EYE_OUTER,
    RIGHT_EYE_OUTER,
    MOUTH_LEFT,
    MOUTH_RIGHT,
];

#[derive(Clone, Debug, PartialEq)]
pub struct FaceLandmarks {
    points: Vec<Point2>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Normalised point, or `None` if the mesh has no such index or the
    /// value is not finite.
    pub fn point(&self, index: usize) -> Option<Point2> {
        self.points.get(index).copied().filter(Point2::is_finite)
    }

    pub fn pixel(&self, index: usize, width: u32, height: u32) -> Option<Point2> {
        self.point(index).map(|p| p.to_pixels(width, height))
    }

    /// Several landmarks at once in pixel space; `None` if any is missing.
    pub fn pixels<const N: usize>(
        &self,
        indices: &[usize; N],
        width: u32,
        height: u32,
    ) -> Option<[Point2; N]> {
        let mut out = [Point2::default(); N];
        for (slot, &index) in out.iter_mut().zip(indices) {
            *slot = self.pixel(index, width, height)?;
        }
        Some(out)
    }
}
