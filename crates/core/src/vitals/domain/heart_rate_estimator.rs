//! Remote heart rate from skin colour using the chrominance (CHROM) method.
//!
//! Two chrominance signals cancel most of the specular and motion
//! components that the three colour channels share; what remains is the
//! blood-volume pulse, whose dominant frequency is the heart rate.

use ndarray::Array1;

use super::estimate::Estimate;
use crate::dsp::butterworth::BandPassFilter;
use crate::dsp::spectrum::Spectrum;
use crate::dsp::stats::z_score;
use crate::dsp::trend::{detrend, moving_average};
use crate::shared::constants::ROI_BRIGHTNESS_FLOOR;
use crate::shared::rounding::round_to;
use crate::shared::roi_patch::Rgb;

/// Four seconds at 30 fps.
pub const MIN_VALID_FRAMES: usize = 120;
pub const MIN_BPM: f64 = 50.0;
pub const MAX_BPM: f64 = 150.0;

const BAND_LOW_HZ: f64 = 0.7;
const BAND_HIGH_HZ: f64 = 3.5;
const FILTER_ORDER: usize = 4;
const SMOOTHING_WINDOW: usize = 5;
const MIN_CHROMINANCE_STD: f64 = 1e-3;
const PEAK_HEIGHT_RATIO: f64 = 0.3;

#[derive(Clone, Debug)]
pub struct HeartRateEstimator {
    sample_rate: f64,
    filter: Option<BandPassFilter>,
}

impl HeartRateEstimator {
    pub fn new(fps: f64) -> Self {
        let filter = BandPassFilter::butterworth(FILTER_ORDER, BAND_LOW_HZ, BAND_HIGH_HZ, fps)
            .map_err(|e| log::warn!("Heart rate disabled at {fps} fps: {e}"))
            .ok();
        Self {
            sample_rate: fps,
            filter,
        }
    }

    /// Heart rate in BPM over `window`, accepted only inside
    /// [`MIN_BPM`, `MAX_BPM`].
    pub fn estimate(&self, window: &[Rgb]) -> Estimate<f64> {
        match self.pulse_rate(window) {
            Estimate::Detected(bpm) if (MIN_BPM..=MAX_BPM).contains(&bpm) => {
                Estimate::Detected(bpm)
            }
            Estimate::Detected(bpm) => {
                log::debug!("Heart rate {bpm} BPM outside plausible range");
                Estimate::NotDetected
            }
            other => other,
        }
    }

    /// Dominant pulse frequency in BPM, rounded to 0.1, with no
    /// plausibility gate.
    pub fn pulse_rate(&self, window: &[Rgb]) -> Estimate<f64> {
        let valid: Vec<&Rgb> = window
            .iter()
            .filter(|c| c.all_above(ROI_BRIGHTNESS_FLOOR))
            .collect();
        if valid.len() < MIN_VALID_FRAMES {
            return Estimate::Insufficient;
        }
        let Some(filter) = &self.filter else {
            return Estimate::NotDetected;
        };

        let r = z_score(&Array1::from_iter(valid.iter().map(|c| c.r)));
        let g = z_score(&Array1::from_iter(valid.iter().map(|c| c.g)));
        let b = z_score(&Array1::from_iter(valid.iter().map(|c| c.b)));

        let x = &r * 3.0 - &g * 2.0;
        let y = &r * 1.5 + &g - &b * 1.5;
        let x = moving_average(&detrend(&x), SMOOTHING_WINDOW);
        let y = moving_average(&detrend(&y), SMOOTHING_WINDOW);

        let (Some(x), Some(y)) = (filter.filtfilt(&x), filter.filtfilt(&y)) else {
            return Estimate::NotDetected;
        };

        let std_y = y.std(0.0);
        if std_y < MIN_CHROMINANCE_STD {
            return Estimate::NotDetected;
        }
        let alpha = x.std(0.0) / std_y;
        let pulse = &x - &(&y * alpha);

        let mean = pulse.mean().unwrap_or(0.0);
        let scale = pulse.std(0.0) + 1e-6;
        let pulse: Vec<f64> = pulse.iter().map(|v| (v - mean) / scale).collect();

        let spectrum = Spectrum::of(&pulse, self.sample_rate, Spectrum::padded_len(pulse.len()));
        let band = spectrum.band(BAND_LOW_HZ, BAND_HIGH_HZ);
        match band.dominant_frequency(PEAK_HEIGHT_RATIO) {
            Some(hz) if hz.is_finite() => Estimate::Detected(round_to(hz * 60.0, 1)),
            _ => Estimate::NotDetected,
        }
    }
}
