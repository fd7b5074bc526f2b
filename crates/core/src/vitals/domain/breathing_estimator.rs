use ndarray::Array1;

use super::estimate::Estimate;
use crate::dsp::butterworth::BandPassFilter;
use crate::dsp::peaks::{find_peaks, PeakCriteria};
use crate::dsp::trend::detrend;
use crate::shared::rounding::round_to;

pub const MIN_POSE_SAMPLES: usize = 30;
pub const MIN_BREATHS_PER_MINUTE: f64 = 6.0;
pub const MAX_BREATHS_PER_MINUTE: f64 = 30.0;

const BAND_LOW_HZ: f64 = 0.1;
const BAND_HIGH_HZ: f64 = 0.5;
const FILTER_ORDER: usize = 2;
const MIN_PEAKS: usize = 2;

/// Breathing rate from the rise and fall of the shoulders.
#[derive(Clone, Debug)]
pub struct BreathingEstimator {
    sample_rate: f64,
    filter: Option<BandPassFilter>,
}

impl BreathingEstimator {
    pub fn new(fps: f64) -> Self {
        let filter = BandPassFilter::butterworth(FILTER_ORDER, BAND_LOW_HZ, BAND_HIGH_HZ, fps)
            .map_err(|e| log::warn!("Breathing rate disabled at {fps} fps: {e}"))
            .ok();
        Self {
            sample_rate: fps,
            filter,
        }
    }

    /// Breaths per minute from mean shoulder heights, one per pose sample.
    pub fn estimate(&self, shoulder_heights: &[f64]) -> Estimate<f64> {
        if shoulder_heights.len() < MIN_POSE_SAMPLES {
            return Estimate::Insufficient;
        }
        let Some(filter) = &self.filter else {
            return Estimate::NotDetected;
        };
        let Some(filtered) = filter.filtfilt(&detrend(&Array1::from_vec(shoulder_heights.to_vec())))
        else {
            return Estimate::NotDetected;
        };

        // One breath per second is the fastest we resolve.
        let min_distance = self.sample_rate.ceil().max(1.0) as usize;
        let peaks = find_peaks(
            &filtered.to_vec(),
            &PeakCriteria {
                min_height: None,
                min_distance: Some(min_distance),
            },
        );
        if peaks.len() < MIN_PEAKS {
            return Estimate::NotDetected;
        }

        let duration_seconds = shoulder_heights.len() as f64 / self.sample_rate;
        let rate = peaks.len() as f64 / duration_seconds * 60.0;
        if (MIN_BREATHS_PER_MINUTE..=MAX_BREATHS_PER_MINUTE).contains(&rate) {
            Estimate::Detected(round_to(rate, 1))
        } else {
            log::debug!("Breathing rate {rate:.1}/min outside plausible range");
            Estimate::NotDetected
        }
    }
}
