use serde::Serialize;

use super::session_error::SessionError;
use crate::shared::constants::{
    DEFAULT_BEHAVIORAL_INTERVAL, DEFAULT_DURATION_SECONDS, DEFAULT_FPS, DEFAULT_VITAL_INTERVAL,
    VITAL_WINDOW_INTERVALS,
};

/// Capture length and sampling cadences, fixed when a session starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionConfig {
    pub duration_seconds: u32,
    pub fps: u32,
    /// Frames between posture, gaze, head, movement and emotion samples.
    pub behavioral_interval: usize,
    /// Frames between heart rate, breathing and blink samples.
    pub vital_interval: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_seconds: DEFAULT_DURATION_SECONDS,
            fps: DEFAULT_FPS,
            behavioral_interval: DEFAULT_BEHAVIORAL_INTERVAL,
            vital_interval: DEFAULT_VITAL_INTERVAL,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.duration_seconds == 0 {
            return Err(SessionError::InvalidConfig(
                "duration must be at least one second".into(),
            ));
        }
        if self.fps == 0 {
            return Err(SessionError::InvalidConfig("fps must be positive".into()));
        }
        if self.behavioral_interval == 0 {
            return Err(SessionError::InvalidConfig(
                "behavioral interval must be at least one frame".into(),
            ));
        }
        if self.vital_interval == 0 {
            return Err(SessionError::InvalidConfig(
                "vital interval must be at least one frame".into(),
            ));
        }
        Ok(())
    }

    /// Frames after which collection stops.
    pub fn target_frames(&self) -> usize {
        self.duration_seconds as usize * self.fps as usize
    }

    pub fn sample_rate(&self) -> f64 {
        f64::from(self.fps)
    }

    /// Trailing frames fed to the heart and breathing estimators at each
    /// vital sample.
    pub fn vital_window(&self) -> usize {
        self.vital_interval * VITAL_WINDOW_INTERVALS
    }

    /// "every 30 frames (1s)"
    pub fn describe_interval(&self, frames: usize) -> String {
        let seconds = frames as f64 / self.sample_rate();
        if seconds.fract() == 0.0 {
            format!("every {frames} frames ({seconds:.0}s)")
        } else {
            format!("every {frames} frames ({seconds:.1}s)")
        }
    }
}
