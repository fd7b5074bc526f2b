use serde::Serialize;

use super::behavior_summary::PostureConsistency;
use super::rules::{self, Assessment};
use crate::vitals::domain::hrv_analyzer::StressLevel;

const PERFECT_SCORE: i32 = 100;
const HEART_RATE_PENALTY: i32 = 20;
const BREATHING_RATE_PENALTY: i32 = 15;
const HIGH_STRESS_PENALTY: i32 = 25;
const MODERATE_STRESS_PENALTY: i32 = 10;
const POOR_POSTURE_PENALTY: i32 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    NeedsAttention,
}

impl HealthStatus {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => HealthStatus::Excellent,
            60..=79 => HealthStatus::Good,
            40..=59 => HealthStatus::Fair,
            _ => HealthStatus::NeedsAttention,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Excellent => "excellent",
            HealthStatus::Good => "good",
            HealthStatus::Fair => "fair",
            HealthStatus::NeedsAttention => "needs_attention",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverallHealth {
    pub score: u32,
    pub status: HealthStatus,
    pub issues: Vec<String>,
}

/// Points deducted for everything abnormal in the session. Metrics that
/// were never detected deduct nothing.
pub fn penalty(a: &Assessment<'_>) -> i32 {
    let mut total = 0;
    if a.heart_rate.is_abnormal() {
        total += HEART_RATE_PENALTY;
    }
    if a.breathing_rate.is_abnormal() {
        total += BREATHING_RATE_PENALTY;
    }
    total += match a.stress_level() {
        Some(StressLevel::High) => HIGH_STRESS_PENALTY,
        Some(StressLevel::Moderate) => MODERATE_STRESS_PENALTY,
        _ => 0,
    };
    if a.posture_status() == Some(PostureConsistency::Poor) {
        total += POOR_POSTURE_PENALTY;
    }
    total
}

pub fn overall_health(a: &Assessment<'_>) -> OverallHealth {
    let score = (PERFECT_SCORE - penalty(a)).clamp(0, PERFECT_SCORE) as u32;
    OverallHealth {
        score,
        status: HealthStatus::from_score(score),
        issues: rules::issues(a),
    }
}
