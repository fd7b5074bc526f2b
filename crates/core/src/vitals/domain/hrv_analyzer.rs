use ndarray::Array1;
use serde::Serialize;

use super::estimate::Estimate;
use crate::dsp::butterworth::BandPassFilter;
use crate::dsp::peaks::{find_peaks, PeakCriteria};
use crate::dsp::stats::{mean, std_dev};
use crate::dsp::trend::detrend;
use crate::shared::rounding::round_to;

/// Five seconds at 30 fps.
pub const MIN_SAMPLES: usize = 150;

const BAND_LOW_HZ: f64 = 0.7;
const BAND_HIGH_HZ: f64 = 4.0;
const FILTER_ORDER: usize = 3;
const MIN_PEAKS: usize = 3;
const MIN_INTERVALS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Low,
    Moderate,
    High,
}

impl StressLevel {
    /// SDNN above 50 ms reads as relaxed, above 30 ms as moderate.
    pub fn from_sdnn(sdnn_ms: f64) -> Self {
        if sdnn_ms > 50.0 {
            StressLevel::Low
        } else if sdnn_ms > 30.0 {
            StressLevel::Moderate
        } else {
            StressLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StressLevel::Low => "low",
            StressLevel::Moderate => "moderate",
            StressLevel::High => "high",
        }
    }

    pub fn interpretation(&self) -> &'static str {
        match self {
            StressLevel::Low => "Good HRV indicates low stress and good recovery",
            StressLevel::Moderate => "Moderate HRV suggests some stress present",
            StressLevel::High => "Low HRV indicates high stress or fatigue",
        }
    }
}

/// Time-domain heart rate variability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HrvMetrics {
    /// Standard deviation of beat-to-beat intervals, ms.
    pub sdnn: f64,
    /// Root mean square of successive interval differences, ms.
    pub rmssd: f64,
    pub mean_hr: f64,
    pub hrv_score: u32,
    pub stress_level: StressLevel,
}

impl HrvMetrics {
    /// Metrics from beat positions given as sample indices.
    ///
    /// `None` with fewer than three beats.
    pub fn from_peaks(peaks: &[usize], sample_rate: f64) -> Option<Self> {
        if peaks.len() < MIN_PEAKS {
            return None;
        }
        let intervals: Vec<f64> = peaks
            .windows(2)
            .map(|w| (w[1] - w[0]) as f64 / sample_rate * 1000.0)
            .collect();
        if intervals.len() < MIN_INTERVALS {
            return None;
        }

        let sdnn = std_dev(&intervals)?;
        let successive: Vec<f64> = intervals.windows(2).map(|w| (w[1] - w[0]).powi(2)).collect();
        let rmssd = mean(&successive)?.sqrt();
        let mean_rr = mean(&intervals)?;
        if mean_rr <= 0.0 {
            return None;
        }

        let sdnn = round_to(sdnn, 1);
        Some(Self {
            sdnn,
            rmssd: round_to(rmssd, 1),
            mean_hr: round_to(60_000.0 / mean_rr, 1),
            hrv_score: ((sdnn / 2.0).floor() as u32).min(100),
            stress_level: StressLevel::from_sdnn(sdnn),
        })
    }
}

/// Beat detection on the green channel followed by interval statistics.
#[derive(Clone, Debug)]
pub struct HrvAnalyzer {
    sample_rate: f64,
    filter: Option<BandPassFilter>,
}

impl HrvAnalyzer {
    pub fn new(fps: f64) -> Self {
        let filter = BandPassFilter::butterworth(FILTER_ORDER, BAND_LOW_HZ, BAND_HIGH_HZ, fps)
            .map_err(|e| log::warn!("HRV disabled at {fps} fps: {e}"))
            .ok();
        Self {
            sample_rate: fps,
            filter,
        }
    }

    pub fn analyze(&self, green: &[f64]) -> Estimate<HrvMetrics> {
        if green.len() < MIN_SAMPLES {
            return Estimate::Insufficient;
        }
        let Some(filter) = &self.filter else {
            return Estimate::Insufficient;
        };
        let Some(filtered) = filter.filtfilt(&detrend(&Array1::from_vec(green.to_vec()))) else {
            return Estimate::Insufficient;
        };

        // Beats no closer than half a second apart.
        let min_distance = (self.sample_rate * 0.5).ceil().max(1.0) as usize;
        let peaks = find_peaks(
            &filtered.to_vec(),
            &PeakCriteria {
                min_height: None,
                min_distance: Some(min_distance),
            },
        );
        match HrvMetrics::from_peaks(&peaks, self.sample_rate) {
            Some(metrics) => Estimate::Detected(metrics),
            None => Estimate::Insufficient,
        }
    }
}
