use super::behavior_summary::{
    summarize_action_units, summarize_emotion, summarize_gaze, summarize_head_pose,
    summarize_movement, summarize_posture, HrvSummary,
};
use super::health_score::overall_health;
use super::rate_summary::{blink_rate_summary, breathing_rate_summary, heart_rate_summary};
use super::rules::{self, Assessment};
use super::session_report::{
    CaptureInfo, DataQuality, EyeAttention, PhysiologicalVitals, PostureBehavior,
    SampleIntervals, SessionReport, SessionSummary,
};
use super::vital_summary::VitalSummary;
use crate::session::domain::collected_session::CollectedSession;
use crate::shared::rounding::round_to;

/// Builds the report for a finished collection.
///
/// Pure: the same collected session always yields the same report.
pub fn aggregate(collected: &CollectedSession) -> SessionReport {
    let samples = &collected.samples;

    let heart_rate = heart_rate_summary(&samples.heart_rate, collected.final_heart_rate);
    let breathing_rate =
        breathing_rate_summary(&samples.breathing_rate, collected.final_breathing_rate);
    let hrv = VitalSummary::from_estimate(&collected.hrv, |m| HrvSummary::from(m));
    let blink_rate = blink_rate_summary(&samples.blink, collected.final_blink);
    let posture = summarize_posture(&samples.posture);
    let head_pose = summarize_head_pose(&samples.head_pose);
    let gaze = summarize_gaze(&samples.gaze);
    let movement = summarize_movement(&samples.movement);
    let emotion = summarize_emotion(&samples.emotion);
    let facial_action_units = summarize_action_units(&samples.action_units);

    let assessment = Assessment {
        heart_rate: &heart_rate,
        breathing_rate: &breathing_rate,
        hrv: &hrv,
        blink_rate: &blink_rate,
        posture: &posture,
        movement: &movement,
    };
    let session_summary = SessionSummary {
        overall_health_status: overall_health(&assessment),
        key_findings: rules::key_findings(&assessment),
        recommendations: rules::recommendations(&assessment),
        risk_factors: rules::risk_factors(&assessment),
    };
    log::debug!(
        "Aggregated {} frames: {} heart rate, {} breathing, {} blink samples",
        collected.frames_captured,
        samples.heart_rate.len(),
        samples.breathing_rate.len(),
        samples.blink.len()
    );

    let config = &collected.config;
    let capture_info = CaptureInfo {
        frames_captured: collected.frames_captured,
        duration_seconds: round_to(collected.duration_seconds(), 2),
        fps: config.fps,
        behavioral_samples: samples.behavioral_ticks,
        vital_samples: samples.heart_rate.len(),
        sample_intervals: SampleIntervals {
            behavioral: config.describe_interval(config.behavioral_interval),
            vitals: config.describe_interval(config.vital_interval),
        },
        data_quality: DataQuality {
            hr_samples_collected: samples.heart_rate.len(),
            br_samples_collected: samples.breathing_rate.len(),
            blink_samples_collected: samples.blink.len(),
            behavioral_samples_collected: samples.behavioral_ticks,
            hrv_calculated: hrv.is_detected(),
        },
    };

    SessionReport {
        session_summary,
        physiological_vitals: PhysiologicalVitals {
            heart_rate,
            breathing_rate,
            hrv,
        },
        eye_attention: EyeAttention { blink_rate, gaze },
        posture_behavior: PostureBehavior {
            posture,
            head_pose,
            movement,
        },
        emotion,
        facial_action_units,
        capture_info,
    }
}
