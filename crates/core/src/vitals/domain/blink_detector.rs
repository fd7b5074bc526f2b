use serde::Serialize;

use crate::shared::point::Point2;
use crate::shared::rounding::round_to;

pub const EAR_THRESHOLD: f64 = 0.25;
/// Consecutive closed frames that make a blink rather than a flicker.
pub const MIN_CLOSED_FRAMES: usize = 2;
/// Frames observed before a rate is reported.
pub const MIN_RATE_FRAMES: usize = 30;

/// Eye aspect ratio from six eye contour points ordered outer corner,
/// upper lid, upper lid, inner corner, lower lid, lower lid.
///
/// `None` when the eye has no horizontal span.
pub fn eye_aspect_ratio(eye: &[Point2; 6]) -> Option<f64> {
    let vertical_a = eye[1].distance(&eye[5]);
    let vertical_b = eye[2].distance(&eye[4]);
    let horizontal = eye[0].distance(&eye[3]);
    if horizontal <= 0.0 {
        return None;
    }
    Some((vertical_a + vertical_b) / (2.0 * horizontal))
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BlinkReading {
    pub ear: f64,
    pub blink_count: u32,
    /// Blinks per minute; 0 until enough frames were observed.
    pub blink_rate: f64,
}

/// Counts blinks from a stream of per-frame eye aspect ratios.
#[derive(Clone, Debug)]
pub struct BlinkDetector {
    sample_rate: f64,
    closed_frames: usize,
    blink_count: u32,
    frames_observed: usize,
}

impl BlinkDetector {
    pub fn new(fps: f64) -> Self {
        Self {
            sample_rate: fps,
            closed_frames: 0,
            blink_count: 0,
            frames_observed: 0,
        }
    }

    pub fn update(&mut self, ear: f64) -> BlinkReading {
        self.frames_observed += 1;
        if ear < EAR_THRESHOLD {
            self.closed_frames += 1;
        } else {
            if self.closed_frames >= MIN_CLOSED_FRAMES {
                self.blink_count += 1;
            }
            self.closed_frames = 0;
        }
        BlinkReading {
            ear: round_to(ear, 3),
            blink_count: self.blink_count,
            blink_rate: round_to(self.rate(), 1),
        }
    }

    pub fn blink_count(&self) -> u32 {
        self.blink_count
    }

    pub fn frames_observed(&self) -> usize {
        self.frames_observed
    }

    fn rate(&self) -> f64 {
        if self.frames_observed < MIN_RATE_FRAMES || self.sample_rate <= 0.0 {
            return 0.0;
        }
        let minutes = self.frames_observed as f64 / self.sample_rate / 60.0;
        f64::from(self.blink_count) / minutes
    }
}
