//! Issues, findings, recommendations and risk factors. Each rule looks at
//! the session summaries and fires independently; a fixed phrase stands in
//! when none do.

use serde::Serialize;

use super::behavior_summary::{
    HrvSummary, MovementSummary, PostureConsistency, PostureSummary, Restlessness,
};
use super::rate_summary::RateSummary;
use super::trend::Trend;
use super::vital_summary::VitalSummary;
use crate::vitals::domain::blink_detector::BlinkReading;
use crate::vitals::domain::hrv_analyzer::StressLevel;

pub const NO_ISSUES: &str = "No significant issues detected";
pub const NO_FINDINGS: &str = "Session completed normally with no significant findings";
pub const NO_RECOMMENDATIONS: &str = "Continue current wellness practices";
pub const NO_RISKS: &str = "No significant risk factors identified";

/// The summaries the rules read.
#[derive(Clone, Copy, Debug)]
pub struct Assessment<'a> {
    pub heart_rate: &'a RateSummary<f64>,
    pub breathing_rate: &'a RateSummary<f64>,
    pub hrv: &'a VitalSummary<HrvSummary>,
    pub blink_rate: &'a RateSummary<BlinkReading>,
    pub posture: &'a VitalSummary<PostureSummary>,
    pub movement: &'a VitalSummary<MovementSummary>,
}

impl Assessment<'_> {
    pub fn stress_level(&self) -> Option<StressLevel> {
        self.hrv.value().map(|h| h.stress_level)
    }

    pub fn posture_status(&self) -> Option<PostureConsistency> {
        self.posture.value().map(|p| p.status)
    }

    fn posture_consistency(&self) -> Option<f64> {
        self.posture.value().map(|p| p.consistency_percentage)
    }

    fn is_restless(&self) -> bool {
        self.movement
            .value()
            .is_some_and(|m| m.status == Restlessness::Restless)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Low,
    Moderate,
    High,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RiskFactor {
    pub factor: &'static str,
    pub severity: Severity,
    pub description: String,
}

impl RiskFactor {
    fn new(factor: &'static str, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            factor,
            severity,
            description: description.into(),
        }
    }

    pub fn none() -> Self {
        Self::new("none", Severity::None, NO_RISKS)
    }
}

fn or_fallback<T>(items: Vec<T>, fallback: impl FnOnce() -> T) -> Vec<T> {
    if items.is_empty() {
        vec![fallback()]
    } else {
        items
    }
}

// --- Issues ---

pub fn heart_rate_issue(a: &Assessment<'_>) -> Option<String> {
    let value = a.heart_rate.reference_value()?;
    a.heart_rate
        .is_abnormal()
        .then(|| format!("Heart rate {value:.1} BPM is outside normal range"))
}

pub fn breathing_rate_issue(a: &Assessment<'_>) -> Option<String> {
    let value = a.breathing_rate.reference_value()?;
    a.breathing_rate
        .is_abnormal()
        .then(|| format!("Breathing rate {value:.1} BPM is abnormal"))
}

pub fn hrv_issue(a: &Assessment<'_>) -> Option<String> {
    (a.stress_level() == Some(StressLevel::High))
        .then(|| "High stress detected via HRV".to_string())
}

pub fn posture_issue(a: &Assessment<'_>) -> Option<String> {
    (a.posture_status() == Some(PostureConsistency::Poor))
        .then(|| "Poor posture detected".to_string())
}

pub fn issues(a: &Assessment<'_>) -> Vec<String> {
    let fired = [
        heart_rate_issue(a),
        breathing_rate_issue(a),
        hrv_issue(a),
        posture_issue(a),
    ];
    or_fallback(fired.into_iter().flatten().collect(), || NO_ISSUES.to_string())
}

// --- Findings ---

pub fn heart_rate_trend_finding(a: &Assessment<'_>) -> Option<String> {
    let direction = match a.heart_rate.trend {
        Trend::Increasing => "increasing",
        Trend::Decreasing => "decreasing",
        _ => return None,
    };
    let interpretation = a.heart_rate.interpretation.as_deref().unwrap_or_default();
    Some(format!(
        "Heart rate showed {direction} trend ({interpretation})"
    ))
}

pub fn rapid_breathing_finding(a: &Assessment<'_>) -> Option<String> {
    let pct = a.breathing_rate.rapid_breathing_percentage?;
    (pct > 30.0).then(|| format!("Rapid breathing detected in {pct:.0}% of samples"))
}

pub fn hrv_finding(a: &Assessment<'_>) -> Option<String> {
    let hrv = a.hrv.value()?;
    Some(format!(
        "HRV analysis: {} stress (SDNN: {:.1}ms)",
        hrv.stress_level.as_str(),
        hrv.sdnn
    ))
}

pub fn low_blink_finding(a: &Assessment<'_>) -> Option<String> {
    let pct = a.blink_rate.low_blink_percentage?;
    (pct > 50.0).then(|| format!("Reduced blinking in {pct:.0}% of samples - high concentration"))
}

pub fn posture_consistency_finding(a: &Assessment<'_>) -> Option<String> {
    let pct = a.posture_consistency()?;
    (pct < 50.0).then(|| format!("Inconsistent posture - only {pct:.0}% good posture"))
}

pub fn restlessness_finding(a: &Assessment<'_>) -> Option<String> {
    let movement = a.movement.value()?;
    (movement.status == Restlessness::Restless).then(|| {
        format!(
            "High restlessness detected ({:.0}%)",
            movement.restlessness_percentage
        )
    })
}

pub fn key_findings(a: &Assessment<'_>) -> Vec<String> {
    let fired = [
        heart_rate_trend_finding(a),
        rapid_breathing_finding(a),
        hrv_finding(a),
        low_blink_finding(a),
        posture_consistency_finding(a),
        restlessness_finding(a),
    ];
    or_fallback(fired.into_iter().flatten().collect(), || NO_FINDINGS.to_string())
}

// --- Recommendations ---

pub fn heart_rate_recommendation(a: &Assessment<'_>) -> Option<String> {
    if a.heart_rate.average.is_some_and(|avg| avg > 100.0) {
        Some("Consider relaxation techniques - elevated heart rate detected".to_string())
    } else if a.heart_rate.trend == Trend::Increasing {
        Some("Monitor stress levels - heart rate is trending upward".to_string())
    } else {
        None
    }
}

pub fn breathing_recommendation(a: &Assessment<'_>) -> Option<String> {
    a.breathing_rate
        .average
        .is_some_and(|avg| avg > 20.0)
        .then(|| "Practice deep breathing exercises - breathing rate is elevated".to_string())
}

pub fn hrv_recommendation(a: &Assessment<'_>) -> Option<String> {
    matches!(
        a.stress_level(),
        Some(StressLevel::Moderate | StressLevel::High)
    )
    .then(|| "Take breaks and practice stress management - HRV indicates stress".to_string())
}

pub fn posture_recommendation(a: &Assessment<'_>) -> Option<String> {
    let posture = a.posture.value()?;
    matches!(
        posture.status,
        PostureConsistency::Poor | PostureConsistency::Moderate
    )
    .then(|| posture.recommendation.to_string())
}

pub fn movement_recommendation(a: &Assessment<'_>) -> Option<String> {
    a.is_restless()
        .then(|| "Consider taking a break - high movement detected".to_string())
}

pub fn recommendations(a: &Assessment<'_>) -> Vec<String> {
    let fired = [
        heart_rate_recommendation(a),
        breathing_recommendation(a),
        hrv_recommendation(a),
        posture_recommendation(a),
        movement_recommendation(a),
    ];
    or_fallback(fired.into_iter().flatten().collect(), || {
        NO_RECOMMENDATIONS.to_string()
    })
}

// --- Risk factors ---

pub fn heart_rate_risk(a: &Assessment<'_>) -> Option<RiskFactor> {
    let avg = a.heart_rate.average?;
    (avg > 100.0 || avg < 50.0).then(|| {
        RiskFactor::new(
            "abnormal_heart_rate",
            Severity::Moderate,
            format!("Heart rate {avg:.1} BPM is outside typical range"),
        )
    })
}

pub fn rapid_breathing_risk(a: &Assessment<'_>) -> Option<RiskFactor> {
    let pct = a.breathing_rate.rapid_breathing_percentage?;
    (pct > 50.0).then(|| {
        RiskFactor::new(
            "rapid_breathing",
            Severity::Moderate,
            "Frequent rapid breathing may indicate stress or anxiety",
        )
    })
}

pub fn high_stress_risk(a: &Assessment<'_>) -> Option<RiskFactor> {
    (a.stress_level() == Some(StressLevel::High)).then(|| {
        RiskFactor::new(
            "high_stress",
            Severity::High,
            "Low HRV indicates high stress or poor recovery",
        )
    })
}

pub fn poor_posture_risk(a: &Assessment<'_>) -> Option<RiskFactor> {
    let pct = a.posture_consistency()?;
    (pct < 30.0).then(|| {
        RiskFactor::new(
            "poor_posture",
            Severity::Low,
            "Consistently poor posture may lead to musculoskeletal issues",
        )
    })
}

pub fn risk_factors(a: &Assessment<'_>) -> Vec<RiskFactor> {
    let fired = [
        heart_rate_risk(a),
        rapid_breathing_risk(a),
        high_stress_risk(a),
        poor_posture_risk(a),
    ];
    or_fallback(fired.into_iter().flatten().collect(), RiskFactor::none)
}
