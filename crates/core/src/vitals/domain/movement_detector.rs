use std::collections::VecDeque;

use serde::Serialize;

use crate::shared::point::Point2;

pub const HISTORY_LEN: usize = 30;
pub const LOW_MOVEMENT: f64 = 0.01;
pub const MODERATE_MOVEMENT: f64 = 0.03;

/// Shoulders, elbows and wrists, normalised.
pub type UpperBodyKeypoints = [Point2; 6];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FidgetLevel {
    Low,
    Moderate,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MovementReading {
    pub fidget_level: FidgetLevel,
    pub restlessness_score: u32,
}

/// Rolling average of upper-body joint displacement between frames.
#[derive(Clone, Debug, Default)]
pub struct MovementDetector {
    previous: Option<UpperBodyKeypoints>,
    history: VecDeque<f64>,
}

impl MovementDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, keypoints: &UpperBodyKeypoints) -> MovementReading {
        let Some(previous) = self.previous.replace(*keypoints) else {
            return MovementReading {
                fidget_level: FidgetLevel::Low,
                restlessness_score: 0,
            };
        };

        let displacement = keypoints
            .iter()
            .zip(previous.iter())
            .map(|(now, before)| now.distance(before))
            .sum::<f64>()
            / keypoints.len() as f64;
        self.history.push_back(displacement);
        if self.history.len() > HISTORY_LEN {
            self.history.pop_front();
        }

        let movement = self.history.iter().sum::<f64>() / self.history.len() as f64;
        MovementReading {
            fidget_level: classify(movement),
            restlessness_score: ((movement * 1000.0).floor() as u32).min(100),
        }
    }
}

pub fn classify(movement: f64) -> FidgetLevel {
    if movement < LOW_MOVEMENT {
        FidgetLevel::Low
    } else if movement < MODERATE_MOVEMENT {
        FidgetLevel::Moderate
    } else {
        FidgetLevel::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn shifted(dx: f64) -> UpperBodyKeypoints {
        [
            Point2::new(0.6 + dx, 0.5),
            Point2::new(0.4 + dx, 0.5),
            Point2::new(0.65 + dx, 0.7),
            Point2::new(0.35 + dx, 0.7),
            Point2::new(0.6 + dx, 0.85),
            Point2::new(0.4 + dx, 0.85),
        ]
    }

    #[test]
    fn test_first_frame_is_calm() {
        let mut detector = MovementDetector::new();
        let reading = detector.update(&shifted(0.0));
        assert_eq!(reading.fidget_level, FidgetLevel::Low);
        assert_eq!(reading.restlessness_score, 0);
    }

    #[test]
    fn test_still_body_stays_low() {
        let mut detector = MovementDetector::new();
        for _ in 0..10 {
            detector.update(&shifted(0.0));
        }
        assert_eq!(detector.update(&shifted(0.0)).fidget_level, FidgetLevel::Low);
    }

    #[test]
    fn test_constant_sway_is_high() {
        let mut detector = MovementDetector::new();
        let mut reading = detector.update(&shifted(0.0));
        for i in 1..=40 {
            // Sway 0.0555 left and right every frame.
            let dx = if i % 2 == 0 { 0.0 } else { 0.0555 };
            reading = detector.update(&shifted(dx));
        }
        assert_eq!(reading.fidget_level, FidgetLevel::High);
        assert_eq!(reading.restlessness_score, 55);
    }

    #[test]
    fn test_history_forgets_old_motion() {
        let mut detector = MovementDetector::new();
        detector.update(&shifted(0.0));
        detector.update(&shifted(0.5));
        let mut reading = detector.update(&shifted(0.5));
        assert_eq!(reading.restlessness_score, 100);
        for _ in 0..HISTORY_LEN {
            reading = detector.update(&shifted(0.5));
        }
        assert_eq!(reading.fidget_level, FidgetLevel::Low);
        assert_eq!(reading.restlessness_score, 0);
    }

    #[rstest]
    #[case(0.0, FidgetLevel::Low)]
    #[case(0.0099, FidgetLevel::Low)]
    #[case(0.01, FidgetLevel::Moderate)]
    #[case(0.0299, FidgetLevel::Moderate)]
    #[case(0.03, FidgetLevel::High)]
    fn test_classify(#[case] movement: f64, #[case] expected: FidgetLevel) {
        assert_eq!(classify(movement), expected);
    }
}
