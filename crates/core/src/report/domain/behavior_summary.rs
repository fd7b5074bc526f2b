use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::vital_summary::VitalSummary;
use crate::dsp::stats::mean;
use crate::perception::domain::action_units::ActionUnitSet;
use crate::perception::domain::emotion::EmotionReading;
use crate::session::domain::metric_sample::MetricSample;
use crate::shared::rounding::{percentage, round_to};
use crate::vitals::domain::gaze_classifier::{GazeDirection, GazeReading};
use crate::vitals::domain::head_pose_estimator::HeadAngles;
use crate::vitals::domain::hrv_analyzer::{HrvMetrics, StressLevel};
use crate::vitals::domain::movement_detector::{FidgetLevel, MovementReading};
use crate::vitals::domain::posture_scorer::{PostureReading, PostureStatus};

/// Pitch below this many degrees reads as a forward head.
pub const FORWARD_HEAD_PITCH: f64 = -15.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HrvSummary {
    pub status: &'static str,
    pub sdnn: f64,
    pub rmssd: f64,
    pub mean_hr: f64,
    pub hrv_score: u32,
    pub stress_level: StressLevel,
    pub interpretation: &'static str,
}

impl From<&HrvMetrics> for HrvSummary {
    fn from(metrics: &HrvMetrics) -> Self {
        Self {
            status: "calculated",
            sdnn: metrics.sdnn,
            rmssd: metrics.rmssd,
            mean_hr: metrics.mean_hr,
            hrv_score: metrics.hrv_score,
            stress_level: metrics.stress_level,
            interpretation: metrics.stress_level.interpretation(),
        }
    }
}

// --- Posture ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostureConsistency {
    Excellent,
    Moderate,
    Poor,
}

impl PostureConsistency {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostureConsistency::Excellent => "excellent",
            PostureConsistency::Moderate => "moderate",
            PostureConsistency::Poor => "poor",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PostureSummary {
    pub status: PostureConsistency,
    pub average_score: f64,
    /// Share of samples with good posture.
    pub consistency_percentage: f64,
    pub good_samples: usize,
    pub poor_samples: usize,
    pub recommendation: &'static str,
    pub samples: Vec<MetricSample<PostureReading>>,
}

pub fn summarize_posture(samples: &[MetricSample<PostureReading>]) -> VitalSummary<PostureSummary> {
    let scores: Vec<f64> = samples.iter().map(|s| f64::from(s.value.score)).collect();
    let Some(average_score) = mean(&scores) else {
        return VitalSummary::NotDetected;
    };
    let good = samples
        .iter()
        .filter(|s| s.value.status == PostureStatus::Good)
        .count();
    let consistency = percentage(good, samples.len());
    let (status, recommendation) = if consistency >= 70.0 {
        (
            PostureConsistency::Excellent,
            "Posture is consistently good throughout the session.",
        )
    } else if consistency >= 50.0 {
        (
            PostureConsistency::Moderate,
            "Posture varies. Detected slouching in some samples.",
        )
    } else {
        (
            PostureConsistency::Poor,
            "Frequent poor posture detected. Consider ergonomic adjustments.",
        )
    };

    VitalSummary::Detected(PostureSummary {
        status,
        average_score: round_to(average_score, 1),
        consistency_percentage: round_to(consistency, 1),
        good_samples: good,
        poor_samples: samples.len() - good,
        recommendation,
        samples: samples.to_vec(),
    })
}

// --- Head pose ---

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeadPoseSummary {
    pub average_pitch: f64,
    pub average_yaw: f64,
    pub average_roll: f64,
    pub forward_head_percentage: f64,
    pub recommendation: String,
    pub samples: Vec<MetricSample<HeadAngles>>,
}

pub fn summarize_head_pose(samples: &[MetricSample<HeadAngles>]) -> VitalSummary<HeadPoseSummary> {
    let average = |f: fn(&HeadAngles) -> f64| {
        let values: Vec<f64> = samples.iter().map(|s| f(&s.value)).collect();
        mean(&values)
    };
    let (Some(pitch), Some(yaw), Some(roll)) = (
        average(|a| a.pitch),
        average(|a| a.yaw),
        average(|a| a.roll),
    ) else {
        return VitalSummary::NotDetected;
    };
    let forward = samples
        .iter()
        .filter(|s| s.value.pitch < FORWARD_HEAD_PITCH)
        .count();
    let forward_pct = percentage(forward, samples.len());

    VitalSummary::Detected(HeadPoseSummary {
        average_pitch: round_to(pitch, 1),
        average_yaw: round_to(yaw, 1),
        average_roll: round_to(roll, 1),
        forward_head_percentage: round_to(forward_pct, 1),
        recommendation: if forward_pct > 30.0 {
            format!("Forward head detected in {forward_pct:.0}% of samples")
        } else {
            "Head position is generally neutral".to_string()
        },
        samples: samples.to_vec(),
    })
}

// --- Gaze ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GazeFocus {
    Focused,
    Distracted,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GazeSummary {
    pub status: GazeFocus,
    pub center_gaze_percentage: f64,
    pub recommendation: String,
    pub samples: Vec<MetricSample<GazeReading>>,
}

pub fn summarize_gaze(samples: &[MetricSample<GazeReading>]) -> VitalSummary<GazeSummary> {
    if samples.is_empty() {
        return VitalSummary::NotDetected;
    }
    let centred = samples
        .iter()
        .filter(|s| s.value.direction == GazeDirection::Center)
        .count();
    let focus = percentage(centred, samples.len());
    let (status, recommendation) = if focus >= 70.0 {
        (
            GazeFocus::Focused,
            format!("Maintained center focus in {focus:.0}% of samples"),
        )
    } else {
        (
            GazeFocus::Distracted,
            format!("Gaze wandered in {:.0}% of samples", 100.0 - focus),
        )
    };
    VitalSummary::Detected(GazeSummary {
        status,
        center_gaze_percentage: round_to(focus, 1),
        recommendation,
        samples: samples.to_vec(),
    })
}

// --- Movement ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Restlessness {
    Calm,
    Moderate,
    Restless,
}

impl Restlessness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Restlessness::Calm => "calm",
            Restlessness::Moderate => "moderate",
            Restlessness::Restless => "restless",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovementSummary {
    pub status: Restlessness,
    /// Share of samples with high fidgeting.
    pub restlessness_percentage: f64,
    pub recommendation: String,
    pub samples: Vec<MetricSample<MovementReading>>,
}

pub fn summarize_movement(samples: &[MetricSample<MovementReading>]) -> VitalSummary<MovementSummary> {
    if samples.is_empty() {
        return VitalSummary::NotDetected;
    }
    let high = samples
        .iter()
        .filter(|s| s.value.fidget_level == FidgetLevel::High)
        .count();
    let restless = percentage(high, samples.len());
    let (status, recommendation) = if restless < 20.0 {
        (
            Restlessness::Calm,
            "Movement levels are normal throughout session".to_string(),
        )
    } else if restless < 50.0 {
        (
            Restlessness::Moderate,
            format!("Restlessness detected in {restless:.0}% of samples"),
        )
    } else {
        (
            Restlessness::Restless,
            format!("High movement in {restless:.0}% of samples - may indicate discomfort"),
        )
    };
    VitalSummary::Detected(MovementSummary {
        status,
        restlessness_percentage: round_to(restless, 1),
        recommendation,
        samples: samples.to_vec(),
    })
}

// --- Emotion ---

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmotionSummary {
    pub dominant_emotion: String,
    pub dominant_percentage: f64,
    pub emotion_distribution: BTreeMap<String, usize>,
    pub recommendation: String,
    pub samples: Vec<MetricSample<EmotionReading>>,
}

/// The most frequent label wins; on a tie, the one observed first.
pub fn summarize_emotion(samples: &[MetricSample<EmotionReading>]) -> VitalSummary<EmotionSummary> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for sample in samples {
        *counts.entry(sample.value.label.as_str()).or_default() += 1;
    }

    let mut dominant: Option<(&str, usize)> = None;
    for sample in samples {
        let label = sample.value.label.as_str();
        let count = counts.get(label).copied().unwrap_or(0);
        if dominant.map_or(true, |(_, best)| count > best) {
            dominant = Some((label, count));
        }
    }
    let Some((label, count)) = dominant else {
        return VitalSummary::NotDetected;
    };
    let share = percentage(count, samples.len());

    VitalSummary::Detected(EmotionSummary {
        dominant_emotion: label.to_string(),
        dominant_percentage: round_to(share, 1),
        emotion_distribution: counts
            .iter()
            .map(|(label, &count)| (label.to_string(), count))
            .collect(),
        recommendation: format!(
            "Predominantly {label} throughout session ({share:.0}% of samples)"
        ),
        samples: samples.to_vec(),
    })
}

// --- Facial action units ---

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionUnitSummary {
    pub average_active: f64,
    pub samples: Vec<MetricSample<ActionUnitSet>>,
}

pub fn summarize_action_units(samples: &[MetricSample<ActionUnitSet>]) -> ActionUnitSummary {
    let counts: Vec<f64> = samples
        .iter()
        .map(|s| s.value.active_count() as f64)
        .collect();
    ActionUnitSummary {
        average_active: mean(&counts).map_or(0.0, |avg| round_to(avg, 2)),
        samples: samples.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vitals::domain::gaze_classifier::classify;
    use crate::vitals::domain::posture_scorer::score_measurements;
    use approx::assert_relative_eq;

    fn at<T>(values: Vec<T>) -> Vec<MetricSample<T>> {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| MetricSample::new((i + 1) as f64, v))
            .collect()
    }

    // --- Posture tests ---

    #[test]
    fn test_posture_consistency_bands() {
        let good = score_measurements(0.0, 0.1);
        let poor = score_measurements(0.1, 0.25);

        let excellent = summarize_posture(&at(vec![good, good, good, poor]));
        let summary = excellent.value().unwrap();
        assert_eq!(summary.status, PostureConsistency::Excellent);
        assert_relative_eq!(summary.consistency_percentage, 75.0);
        assert_relative_eq!(summary.average_score, 82.5);
        assert_eq!(summary.good_samples, 3);
        assert_eq!(summary.poor_samples, 1);

        let moderate = summarize_posture(&at(vec![good, poor]));
        assert_eq!(moderate.value().unwrap().status, PostureConsistency::Moderate);

        let bad = summarize_posture(&at(vec![good, poor, poor]));
        let summary = bad.value().unwrap();
        assert_eq!(summary.status, PostureConsistency::Poor);
        assert_eq!(
            summary.recommendation,
            "Frequent poor posture detected. Consider ergonomic adjustments."
        );
    }

    #[test]
    fn test_no_posture_samples() {
        assert_eq!(summarize_posture(&[]), VitalSummary::NotDetected);
    }

    // --- Head pose tests ---

    #[test]
    fn test_forward_head_share() {
        let angles = |pitch| HeadAngles {
            pitch,
            yaw: 2.0,
            roll: -1.0,
        };
        let summary = summarize_head_pose(&at(vec![angles(-20.0), angles(-18.0), angles(0.0)]));
        let summary = summary.value().unwrap();
        assert_relative_eq!(summary.average_pitch, -12.7);
        assert_relative_eq!(summary.average_yaw, 2.0);
        assert_relative_eq!(summary.forward_head_percentage, 66.7);
        assert_eq!(summary.recommendation, "Forward head detected in 67% of samples");
    }

    #[test]
    fn test_neutral_head() {
        let summary = summarize_head_pose(&at(vec![HeadAngles {
            pitch: -15.0,
            yaw: 0.0,
            roll: 0.0,
        }]));
        assert_eq!(
            summary.value().unwrap().recommendation,
            "Head position is generally neutral"
        );
    }

    // --- Gaze tests ---

    #[test]
    fn test_gaze_focus() {
        let summary = summarize_gaze(&at(vec![classify(0.0), classify(0.0), classify(0.0), classify(0.2)]));
        let summary = summary.value().unwrap();
        assert_eq!(summary.status, GazeFocus::Focused);
        assert_eq!(summary.recommendation, "Maintained center focus in 75% of samples");
    }

    #[test]
    fn test_gaze_wandering() {
        let summary = summarize_gaze(&at(vec![classify(0.0), classify(-0.2), classify(0.2)]));
        let summary = summary.value().unwrap();
        assert_eq!(summary.status, GazeFocus::Distracted);
        assert_eq!(summary.recommendation, "Gaze wandered in 67% of samples");
    }

    // --- Movement tests ---

    #[test]
    fn test_movement_bands() {
        let reading = |fidget_level| MovementReading {
            fidget_level,
            restlessness_score: 0,
        };
        let calm = summarize_movement(&at(vec![reading(FidgetLevel::Low); 5]));
        assert_eq!(calm.value().unwrap().status, Restlessness::Calm);

        let moderate = summarize_movement(&at(vec![
            reading(FidgetLevel::High),
            reading(FidgetLevel::Low),
            reading(FidgetLevel::Moderate),
        ]));
        let summary = moderate.value().unwrap();
        assert_eq!(summary.status, Restlessness::Moderate);
        assert_eq!(summary.recommendation, "Restlessness detected in 33% of samples");

        let restless = summarize_movement(&at(vec![
            reading(FidgetLevel::High),
            reading(FidgetLevel::High),
        ]));
        let summary = restless.value().unwrap();
        assert_eq!(summary.status, Restlessness::Restless);
        assert_relative_eq!(summary.restlessness_percentage, 100.0);
    }

    // --- Emotion tests ---

    #[test]
    fn test_dominant_emotion() {
        let summary = summarize_emotion(&at(vec![
            EmotionReading::new("neutral", 0.9),
            EmotionReading::new("happy", 0.8),
            EmotionReading::new("neutral", 0.7),
        ]));
        let summary = summary.value().unwrap();
        assert_eq!(summary.dominant_emotion, "neutral");
        assert_relative_eq!(summary.dominant_percentage, 66.7);
        assert_eq!(
            summary.recommendation,
            "Predominantly neutral throughout session (67% of samples)"
        );
    }

    #[test]
    fn test_emotion_tie_goes_to_first_observed() {
        let summary = summarize_emotion(&at(vec![
            EmotionReading::new("sad", 0.6),
            EmotionReading::new("happy", 0.8),
            EmotionReading::new("happy", 0.8),
            EmotionReading::new("sad", 0.6),
        ]));
        assert_eq!(summary.value().unwrap().dominant_emotion, "sad");
    }

    #[test]
    fn test_emotion_distribution_is_sorted_by_label() {
        let summary = summarize_emotion(&at(vec![
            EmotionReading::new("surprise", 0.6),
            EmotionReading::new("angry", 0.8),
        ]));
        let json = serde_json::to_string(&summary.value().unwrap().emotion_distribution).unwrap();
        assert_eq!(json, r#"{"angry":1,"surprise":1}"#);
    }

    #[test]
    fn test_no_emotion_samples() {
        assert_eq!(summarize_emotion(&[]), VitalSummary::NotDetected);
    }

    // --- Action unit tests ---

    #[test]
    fn test_average_active_units() {
        let summary = summarize_action_units(&at(vec![
            ActionUnitSet::from_active(["AU12", "AU25"]),
            ActionUnitSet::from_active(["AU01"]),
            ActionUnitSet::new(),
        ]));
        assert_relative_eq!(summary.average_active, 1.0);
        assert_eq!(summarize_action_units(&[]).average_active, 0.0);
    }

    // --- HRV tests ---

    #[test]
    fn test_hrv_summary_from_metrics() {
        let metrics = HrvMetrics::from_peaks(&[0, 30, 63, 93, 126], 30.0).unwrap();
        let summary = HrvSummary::from(&metrics);
        assert_eq!(summary.status, "calculated");
        assert_eq!(summary.stress_level, StressLevel::Moderate);
        assert_eq!(
            summary.interpretation,
            "Moderate HRV suggests some stress present"
        );
    }
}
