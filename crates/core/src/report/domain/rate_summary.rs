//! Heart, breathing and blink rate summaries: statistics over the periodic
//! samples, a trend, a status against the reference range, and a reading.

use std::ops::RangeInclusive;

use serde::Serialize;

use super::trend::{trend_of, HalfMeans, Trend};
use super::vital_summary::VitalStatus;
use crate::dsp::stats::{mean, min_max};
use crate::session::domain::metric_sample::MetricSample;
use crate::shared::constants::{
    BLINK_RATE_UNIT, BREATHING_RATE_UNIT, HEART_RATE_METHOD, HEART_RATE_UNIT,
};
use crate::shared::rounding::{percentage, round_to};
use crate::vitals::domain::blink_detector::BlinkReading;
use crate::vitals::domain::estimate::Estimate;

/// Breathing faster than this counts as rapid.
pub const RAPID_BREATHING_BPM: f64 = 20.0;
/// Blinking slower than this counts as reduced.
pub const LOW_BLINK_RATE: f64 = 12.0;
const ELEVATED_BREATHING_BPM: f64 = 18.0;
const ELEVATED_BLINK_RATE: f64 = 25.0;
const DOMINANT_SHARE: f64 = 50.0;

/// Reference range, unit and trend sensitivity of one rate.
#[derive(Clone, Debug)]
pub struct RateMetric {
    pub unit: &'static str,
    pub method: Option<&'static str>,
    pub normal: RangeInclusive<f64>,
    pub trend_delta: f64,
}

pub fn heart_rate_metric() -> RateMetric {
    RateMetric {
        unit: HEART_RATE_UNIT,
        method: Some(HEART_RATE_METHOD),
        normal: 60.0..=100.0,
        trend_delta: 3.0,
    }
}

pub fn breathing_rate_metric() -> RateMetric {
    RateMetric {
        unit: BREATHING_RATE_UNIT,
        method: None,
        normal: 12.0..=20.0,
        trend_delta: 2.0,
    }
}

pub fn blink_rate_metric() -> RateMetric {
    RateMetric {
        unit: BLINK_RATE_UNIT,
        method: None,
        normal: 15.0..=20.0,
        trend_delta: 3.0,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RateSummary<S> {
    pub status: VitalStatus,
    pub unit: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<&'static str>,
    /// Whole-session estimate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<f64>,
    pub trend: Trend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rapid_breathing_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_blink_percentage: Option<f64>,
    pub samples: Vec<MetricSample<S>>,
}

impl<S: Clone> RateSummary<S> {
    /// Statistics over `samples`; with none, the whole-session estimate
    /// decides the status.
    fn build(
        metric: &RateMetric,
        samples: &[MetricSample<S>],
        rate_of: impl Fn(&S) -> f64,
        final_estimate: Estimate<f64>,
    ) -> Self {
        let values: Vec<f64> = samples.iter().map(|s| rate_of(&s.value)).collect();
        let mut summary = Self {
            status: VitalStatus::NotDetected,
            unit: metric.unit,
            method: metric.method,
            final_value: final_estimate.into_value(),
            average: None,
            min: None,
            max: None,
            range: None,
            trend: Trend::NoData,
            interpretation: None,
            rapid_breathing_percentage: None,
            low_blink_percentage: None,
            samples: samples.to_vec(),
        };

        match (mean(&values), min_max(&values)) {
            (Some(average), Some((min, max))) => {
                summary.status = status_of(metric, average);
                summary.average = Some(round_to(average, 1));
                summary.min = Some(round_to(min, 1));
                summary.max = Some(round_to(max, 1));
                summary.range = Some(round_to(max - min, 1));
                summary.trend = trend_of(&values, metric.trend_delta);
            }
            _ => {
                summary.status = match final_estimate {
                    Estimate::Detected(value) => status_of(metric, value),
                    Estimate::Insufficient => VitalStatus::InsufficientData,
                    Estimate::NotDetected => VitalStatus::NotDetected,
                };
            }
        }
        summary
    }
}

impl<S> RateSummary<S> {
    /// Sample average, or the whole-session estimate when nothing was
    /// sampled.
    pub fn reference_value(&self) -> Option<f64> {
        self.average.or(self.final_value)
    }

    pub fn is_abnormal(&self) -> bool {
        self.status == VitalStatus::Abnormal
    }
}

fn status_of(metric: &RateMetric, value: f64) -> VitalStatus {
    if metric.normal.contains(&value) {
        VitalStatus::Normal
    } else {
        VitalStatus::Abnormal
    }
}

pub fn heart_rate_summary(
    samples: &[MetricSample<f64>],
    final_estimate: Estimate<f64>,
) -> RateSummary<f64> {
    let metric = heart_rate_metric();
    let mut summary = RateSummary::build(&metric, samples, |v| *v, final_estimate);
    if let Some(average) = summary.average {
        let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
        summary.interpretation = Some(match HalfMeans::of(&values) {
            None => "Need more samples for trend analysis".to_string(),
            Some(halves) => match halves.trend(metric.trend_delta) {
                Trend::Increasing => format!(
                    "HR increased from {:.1} to {:.1} BPM - possible stress response",
                    halves.first, halves.second
                ),
                Trend::Decreasing => format!(
                    "HR decreased from {:.1} to {:.1} BPM - relaxation",
                    halves.first, halves.second
                ),
                _ => format!("HR remained stable around {average:.1} BPM"),
            },
        });
    }
    summary
}

pub fn breathing_rate_summary(
    samples: &[MetricSample<f64>],
    final_estimate: Estimate<f64>,
) -> RateSummary<f64> {
    let mut summary = RateSummary::build(&breathing_rate_metric(), samples, |v| *v, final_estimate);
    if let Some(average) = summary.average {
        let rapid = samples
            .iter()
            .filter(|s| s.value > RAPID_BREATHING_BPM)
            .count();
        let rapid_pct = percentage(rapid, samples.len());
        summary.rapid_breathing_percentage = Some(round_to(rapid_pct, 1));
        summary.interpretation = Some(if rapid_pct > DOMINANT_SHARE {
            format!(
                "Rapid breathing detected in {rapid_pct:.0}% of samples - possible anxiety or stress"
            )
        } else if average > ELEVATED_BREATHING_BPM {
            format!("Slightly elevated breathing rate ({average:.1} BPM) - mild stress")
        } else {
            format!("Normal breathing pattern ({average:.1} BPM)")
        });
    }
    summary
}

pub fn blink_rate_summary(
    samples: &[MetricSample<BlinkReading>],
    final_reading: Option<BlinkReading>,
) -> RateSummary<BlinkReading> {
    let final_estimate = final_reading.map_or(Estimate::NotDetected, |r| {
        Estimate::Detected(r.blink_rate)
    });
    let mut summary =
        RateSummary::build(&blink_rate_metric(), samples, |r| r.blink_rate, final_estimate);
    if let Some(average) = summary.average {
        let low = samples
            .iter()
            .filter(|s| s.value.blink_rate < LOW_BLINK_RATE)
            .count();
        let low_pct = percentage(low, samples.len());
        summary.low_blink_percentage = Some(round_to(low_pct, 1));
        summary.interpretation = Some(if low_pct > DOMINANT_SHARE {
            format!(
                "Reduced blinking in {low_pct:.0}% of samples - high concentration or screen fatigue"
            )
        } else if average > ELEVATED_BLINK_RATE {
            format!("Elevated blink rate ({average:.1}/min) - possible eye strain or stress")
        } else {
            format!("Normal blink pattern ({average:.1}/min)")
        });
    }
    summary
}
