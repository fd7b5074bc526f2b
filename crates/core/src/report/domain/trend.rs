use serde::Serialize;

use crate::dsp::stats::mean;

/// Samples needed before a trend is called.
pub const MIN_TREND_SAMPLES: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
    InsufficientSamples,
    NoData,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
            Trend::InsufficientSamples => "insufficient_samples",
            Trend::NoData => "no_data",
        }
    }
}

/// Means of the first and second half of a series. An odd middle sample
/// belongs to the second half.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfMeans {
    pub first: f64,
    pub second: f64,
}

impl HalfMeans {
    /// `None` with fewer than [`MIN_TREND_SAMPLES`] values.
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.len() < MIN_TREND_SAMPLES {
            return None;
        }
        let (first, second) = values.split_at(values.len() / 2);
        Some(Self {
            first: mean(first)?,
            second: mean(second)?,
        })
    }

    /// Moves of more than `delta` between halves are a trend.
    pub fn trend(&self, delta: f64) -> Trend {
        if self.second > self.first + delta {
            Trend::Increasing
        } else if self.second < self.first - delta {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }
}

pub fn trend_of(values: &[f64], delta: f64) -> Trend {
    HalfMeans::of(values).map_or(Trend::InsufficientSamples, |halves| halves.trend(delta))
}
