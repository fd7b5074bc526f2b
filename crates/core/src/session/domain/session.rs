//! One collection session: feeds frames through the feature extractor and
//! per-frame detectors, takes periodic metric samples, and hands the result
//! to the aggregator once capture ends.

use std::fmt;

use serde::Serialize;

use super::collected_session::CollectedSession;
use super::metric_sample::{MetricSample, SampleLog};
use super::session_config::SessionConfig;
use super::session_error::SessionError;
use super::session_snapshot::SessionSnapshot;
use crate::perception::domain::action_units::ActionUnitDetector;
use crate::perception::domain::frame_sample::FrameSample;
use crate::report::domain::aggregator::aggregate;
use crate::report::domain::session_report::SessionReport;
use crate::shared::roi_patch::Rgb;
use crate::vitals::domain::blink_detector::{BlinkDetector, BlinkReading};
use crate::vitals::domain::breathing_estimator::BreathingEstimator;
use crate::vitals::domain::estimate::Estimate;
use crate::vitals::domain::frame_feature::{FeatureExtractor, FrameFeature};
use crate::vitals::domain::gaze_classifier;
use crate::vitals::domain::head_pose_estimator::HeadPoseEstimator;
use crate::vitals::domain::heart_rate_estimator::HeartRateEstimator;
use crate::vitals::domain::hrv_analyzer::HrvAnalyzer;
use crate::vitals::domain::movement_detector::{MovementDetector, MovementReading};
use crate::vitals::domain::posture_scorer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Collecting,
    Finalizing,
    Complete,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Collecting => "collecting",
            SessionState::Finalizing => "finalizing",
            SessionState::Complete => "complete",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-frame readings from the stateful detectors, kept for the next
/// sample tick.
#[derive(Clone, Copy, Debug, Default)]
struct FrameReadings {
    blink: Option<BlinkReading>,
    movement: Option<MovementReading>,
}

pub struct Session {
    config: SessionConfig,
    state: SessionState,
    extractor: FeatureExtractor,
    heart_rate: HeartRateEstimator,
    breathing: BreathingEstimator,
    hrv: HrvAnalyzer,
    head_pose: HeadPoseEstimator,
    blinks: BlinkDetector,
    movement: MovementDetector,
    features: Vec<FrameFeature>,
    /// Mean shoulder height of every frame with a usable pose.
    shoulder_heights: Vec<f64>,
    last_blink: Option<BlinkReading>,
    samples: SampleLog,
    collected: Option<CollectedSession>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let fps = config.sample_rate();
        Ok(Self {
            state: SessionState::Collecting,
            extractor: FeatureExtractor::new(fps),
            heart_rate: HeartRateEstimator::new(fps),
            breathing: BreathingEstimator::new(fps),
            hrv: HrvAnalyzer::new(fps),
            head_pose: HeadPoseEstimator::new(),
            blinks: BlinkDetector::new(fps),
            movement: MovementDetector::new(),
            features: Vec::with_capacity(config.target_frames()),
            shoulder_heights: Vec::new(),
            last_blink: None,
            samples: SampleLog::default(),
            collected: None,
            config,
        })
    }

    /// Derives action units from the face mesh when frames carry none.
    pub fn with_action_unit_detector(mut self, detector: Box<dyn ActionUnitDetector>) -> Self {
        self.extractor = self.extractor.with_action_unit_detector(detector);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn frames_captured(&self) -> usize {
        self.features.len()
    }

    /// Samples taken so far, or the full log once finalized.
    pub fn samples(&self) -> &SampleLog {
        self.collected.as_ref().map_or(&self.samples, |c| &c.samples)
    }

    /// The finalized buffers, once [`Session::finalize`] has run.
    pub fn collected(&self) -> Option<&CollectedSession> {
        self.collected.as_ref()
    }

    /// Adds one frame. Moves to `Finalizing` once the configured duration
    /// has been captured.
    pub fn push_frame(&mut self, sample: &FrameSample) -> Result<SessionState, SessionError> {
        if self.state != SessionState::Collecting {
            return Err(SessionError::NotCollecting(self.state));
        }

        let feature = self.extractor.extract(self.features.len(), sample);
        let readings = self.update_detectors(&feature);
        self.features.push(feature);

        let frame_count = self.features.len();
        if frame_count % self.config.vital_interval == 0 {
            self.sample_vitals(frame_count, readings.blink);
        }
        if frame_count % self.config.behavioral_interval == 0 {
            self.sample_behavior(frame_count, readings.movement);
        }

        if frame_count >= self.config.target_frames() {
            log::info!("Collected {frame_count} frames, finalizing");
            self.state = SessionState::Finalizing;
        }
        Ok(self.state)
    }

    /// Ends collection early with whatever was captured.
    pub fn stop(&mut self) -> Result<SessionState, SessionError> {
        match self.state {
            SessionState::Collecting => {
                log::info!(
                    "Collection stopped after {} of {} frames",
                    self.features.len(),
                    self.config.target_frames()
                );
                self.state = SessionState::Finalizing;
                Ok(self.state)
            }
            SessionState::Finalizing => Ok(self.state),
            SessionState::Complete => Err(SessionError::AlreadyComplete),
        }
    }

    /// Re-runs heart rate, breathing and HRV over the whole session.
    pub fn finalize(&mut self) -> Result<&CollectedSession, SessionError> {
        match self.state {
            SessionState::Collecting => return Err(SessionError::StillCollecting),
            SessionState::Complete => return Err(SessionError::AlreadyComplete),
            SessionState::Finalizing => {}
        }
        if self.collected.is_some() {
            return Err(SessionError::AlreadyFinalized);
        }

        let rois: Vec<Rgb> = self.features.iter().filter_map(|f| f.roi).collect();
        let final_heart_rate = if rois.is_empty() {
            Estimate::NotDetected
        } else {
            self.heart_rate.estimate(&rois)
        };
        let final_breathing_rate = if self.shoulder_heights.is_empty() {
            Estimate::NotDetected
        } else {
            self.breathing.estimate(&self.shoulder_heights)
        };
        let green: Vec<f64> = rois.iter().map(|c| c.g).collect();
        let hrv = self.hrv.analyze(&green);
        log::debug!(
            "Final estimates: heart rate {}, breathing {}, HRV {}",
            final_heart_rate.label(),
            final_breathing_rate.label(),
            hrv.label()
        );

        Ok(self.collected.insert(CollectedSession {
            config: self.config.clone(),
            frames_captured: self.features.len(),
            samples: std::mem::take(&mut self.samples),
            final_heart_rate,
            final_breathing_rate,
            final_blink: self.last_blink,
            hrv,
        }))
    }

    /// Builds the report and completes the session. Finalizes first when
    /// that has not happened yet.
    pub fn complete(&mut self) -> Result<SessionReport, SessionError> {
        if self.collected.is_none() {
            self.finalize()?;
        }
        if self.state == SessionState::Complete {
            return Err(SessionError::AlreadyComplete);
        }
        let collected = self.collected.as_ref().ok_or(SessionError::StillCollecting)?;
        let report = aggregate(collected);
        self.state = SessionState::Complete;
        log::info!(
            "Session complete: score {} ({})",
            report.session_summary.overall_health_status.score,
            report.session_summary.overall_health_status.status.as_str()
        );
        Ok(report)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let samples = self.samples();
        let frames_captured = self.features.len();
        SessionSnapshot {
            state: self.state,
            frames_captured,
            target_frames: self.config.target_frames(),
            elapsed_seconds: frames_captured as f64 / self.config.sample_rate(),
            heart_rate: samples.heart_rate.last().map(|s| s.value),
            breathing_rate: samples.breathing_rate.last().map(|s| s.value),
            blink: self.last_blink,
            gaze: samples.gaze.last().map(|s| s.value.direction),
            head_pose: samples.head_pose.last().map(|s| s.value),
            posture: samples.posture.last().map(|s| s.value),
            movement: samples.movement.last().map(|s| s.value.fidget_level),
            emotion: samples.emotion.last().map(|s| s.value.label.clone()),
            active_action_units: samples
                .action_units
                .last()
                .map(|s| s.value.active_count()),
        }
    }

    fn update_detectors(&mut self, feature: &FrameFeature) -> FrameReadings {
        if let Some(torso) = &feature.torso {
            self.shoulder_heights.push(torso.shoulder_height());
        }
        let blink = feature.ear.map(|ear| self.blinks.update(ear));
        if blink.is_some() {
            self.last_blink = blink;
        }
        FrameReadings {
            blink,
            movement: feature
                .upper_body
                .as_ref()
                .map(|keypoints| self.movement.update(keypoints)),
        }
    }

    fn timestamp(&self, frame_count: usize) -> f64 {
        frame_count as f64 / self.config.sample_rate()
    }

    fn sample_vitals(&mut self, frame_count: usize, blink: Option<BlinkReading>) {
        let timestamp = self.timestamp(frame_count);
        let window = self.config.vital_window();
        self.samples.vital_ticks += 1;

        let start = self.features.len().saturating_sub(window);
        let rois: Vec<Rgb> = self.features[start..].iter().filter_map(|f| f.roi).collect();
        match self.heart_rate.estimate(&rois) {
            Estimate::Detected(bpm) => {
                self.samples.heart_rate.push(MetricSample::new(timestamp, bpm));
            }
            other => log::debug!("Heart rate at {timestamp:.1}s: {}", other.label()),
        }

        let start = self.shoulder_heights.len().saturating_sub(window);
        match self.breathing.estimate(&self.shoulder_heights[start..]) {
            Estimate::Detected(rate) => {
                self.samples
                    .breathing_rate
                    .push(MetricSample::new(timestamp, rate));
            }
            other => log::debug!("Breathing rate at {timestamp:.1}s: {}", other.label()),
        }

        if let Some(reading) = blink {
            self.samples.blink.push(MetricSample::new(timestamp, reading));
        }
    }

    fn sample_behavior(&mut self, frame_count: usize, movement: Option<MovementReading>) {
        let timestamp = self.timestamp(frame_count);
        self.samples.behavioral_ticks += 1;
        let Some(feature) = self.features.last() else {
            return;
        };
        let samples = &mut self.samples;

        if let Some(torso) = &feature.torso {
            samples
                .posture
                .push(MetricSample::new(timestamp, posture_scorer::score(torso)));
        }
        if let Some(head) = feature.head_points.and_then(|frame| {
            self.head_pose
                .estimate(&frame.points, frame.width, frame.height)
                .into_value()
        }) {
            samples.head_pose.push(MetricSample::new(timestamp, head));
        }
        if let Some(offset) = feature.iris_offset {
            samples
                .gaze
                .push(MetricSample::new(timestamp, gaze_classifier::classify(offset)));
        }
        if let Some(reading) = movement {
            samples.movement.push(MetricSample::new(timestamp, reading));
        }
        if let Some(emotion) = &feature.emotion {
            samples
                .emotion
                .push(MetricSample::new(timestamp, emotion.clone()));
        }
        if let Some(units) = &feature.action_units {
            samples
                .action_units
                .push(MetricSample::new(timestamp, units.clone()));
        }
    }
}
