use serde::Serialize;

use crate::shared::point::Point2;
use crate::shared::rounding::round_to;

/// Iris offsets within this fraction of the eye width count as centred.
pub const CENTER_TOLERANCE: f64 = 0.08;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GazeDirection {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GazeReading {
    pub direction: GazeDirection,
    pub ratio: f64,
}

/// Horizontal iris offset from the eye centre, as a fraction of the eye
/// width. Zero for a degenerate eye.
pub fn iris_offset(outer_corner: Point2, inner_corner: Point2, iris: Point2) -> f64 {
    let eye_width = (inner_corner.x - outer_corner.x).abs();
    if eye_width == 0.0 {
        return 0.0;
    }
    let eye_center = (outer_corner.x + inner_corner.x) / 2.0;
    (iris.x - eye_center) / eye_width
}

pub fn classify(offset: f64) -> GazeReading {
    let direction = if offset < -CENTER_TOLERANCE {
        GazeDirection::Left
    } else if offset > CENTER_TOLERANCE {
        GazeDirection::Right
    } else {
        GazeDirection::Center
    };
    GazeReading {
        direction,
        ratio: round_to(offset, 3),
    }
}
