//! Butterworth band-pass filters as cascaded second-order sections, with
//! zero-phase forward/backward application.
//!
//! The design follows the classic analog-prototype route: place the
//! low-pass Butterworth poles on the unit circle, map them to the band with
//! the low-pass to band-pass substitution, then move to the z-plane with a
//! pre-warped bilinear transform. Each pair of conjugate poles becomes one
//! biquad with zeros at DC and Nyquist.

use std::f64::consts::PI;

use ndarray::Array1;
use rustfft::num_complex::Complex;

/// Imaginary parts below this are treated as a real prototype pole.
const REAL_POLE_TOLERANCE: f64 = 1e-12;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FilterDesignError {
    #[error("filter order must be at least 1")]
    ZeroOrder,
    #[error("band {low_hz}-{high_hz} Hz must lie strictly inside (0, {nyquist_hz}) Hz")]
    BandOutOfRange {
        low_hz: f64,
        high_hz: f64,
        nyquist_hz: f64,
    },
}

/// One biquad in transposed direct form II, with `a0` normalised to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Biquad {
    b: [f64; 3],
    a: [f64; 3],
}

impl Biquad {
    /// Band-pass section with poles `p1`, `p2` (a conjugate pair or two
    /// reals), scaled to unit gain at `center` radians/sample.
    fn band_pass(p1: Complex<f64>, p2: Complex<f64>, center: f64) -> Self {
        let a = [1.0, -(p1 + p2).re, (p1 * p2).re];
        let mut section = Self {
            b: [1.0, 0.0, -1.0],
            a,
        };
        let gain = section.magnitude_at(center);
        if gain > 0.0 && gain.is_finite() {
            for coeff in section.b.iter_mut() {
                *coeff /= gain;
            }
        }
        section
    }

    fn magnitude_at(&self, omega: f64) -> f64 {
        let z1 = Complex::from_polar(1.0, -omega);
        let z2 = z1 * z1;
        let num = self.b[0] + z1 * self.b[1] + z2 * self.b[2];
        let den = self.a[0] + z1 * self.a[1] + z2 * self.a[2];
        (num / den).norm()
    }

    fn dc_gain(&self) -> f64 {
        self.b.iter().sum::<f64>() / self.a.iter().sum::<f64>()
    }

    /// State that makes a constant unit input produce a constant output.
    fn steady_state(&self) -> [f64; 2] {
        let y = self.dc_gain();
        [y - self.b[0], self.b[2] - self.a[2] * y]
    }

    fn step(&self, x: f64, state: &mut [f64; 2]) -> f64 {
        let y = self.b[0] * x + state[0];
        state[0] = self.b[1] * x - self.a[1] * y + state[1];
        state[1] = self.b[2] * x - self.a[2] * y;
        y
    }
}

/// A digital Butterworth band-pass filter.
#[derive(Clone, Debug, PartialEq)]
pub struct BandPassFilter {
    sections: Vec<Biquad>,
}

impl BandPassFilter {
    /// Designs an `order`-th order prototype band-pass between `low_hz` and
    /// `high_hz` for signals sampled at `sample_rate` Hz.
    ///
    /// The resulting filter has `2 * order` poles.
    pub fn butterworth(
        order: usize,
        low_hz: f64,
        high_hz: f64,
        sample_rate: f64,
    ) -> Result<Self, FilterDesignError> {
        if order == 0 {
            return Err(FilterDesignError::ZeroOrder);
        }
        let nyquist = sample_rate / 2.0;
        let low = low_hz / nyquist;
        let high = high_hz / nyquist;
        if !(low > 0.0 && low < high && high < 1.0) {
            return Err(FilterDesignError::BandOutOfRange {
                low_hz,
                high_hz,
                nyquist_hz: nyquist,
            });
        }

        // Pre-warp for a bilinear transform at a normalised rate of 2.
        let warped_low = 4.0 * (PI * low / 2.0).tan();
        let warped_high = 4.0 * (PI * high / 2.0).tan();
        let bandwidth = warped_high - warped_low;
        let center = (warped_low * warped_high).sqrt();
        let digital_center = 2.0 * (center / 4.0).atan();

        let mut sections = Vec::with_capacity(order);
        let n = order as f64;
        for m in (0..order).map(|k| 2.0 * k as f64 - n + 1.0) {
            let prototype = -Complex::from_polar(1.0, PI * m / (2.0 * n));
            if prototype.im < -REAL_POLE_TOLERANCE {
                // Mirror of an upper-half pole, covered by its partner.
                continue;
            }
            let (s1, s2) = low_pass_to_band_pass(prototype, bandwidth, center);
            let (z1, z2) = (bilinear(s1), bilinear(s2));
            if prototype.im.abs() <= REAL_POLE_TOLERANCE {
                sections.push(Biquad::band_pass(z1, z2, digital_center));
            } else {
                sections.push(Biquad::band_pass(z1, z1.conj(), digital_center));
                sections.push(Biquad::band_pass(z2, z2.conj(), digital_center));
            }
        }

        Ok(Self { sections })
    }

    /// Edge padding applied by [`filtfilt`](Self::filtfilt); signals must be
    /// strictly longer than this.
    pub fn pad_len(&self) -> usize {
        3 * (2 * self.sections.len() + 1)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Gain of the whole cascade at `frequency_hz`.
    pub fn magnitude_at(&self, frequency_hz: f64, sample_rate: f64) -> f64 {
        let omega = 2.0 * PI * frequency_hz / sample_rate;
        self.sections.iter().map(|s| s.magnitude_at(omega)).product()
    }

    /// Zero-phase filtering: forward pass, then a pass over the reversed
    /// output, on an odd-extended copy of the signal.
    ///
    /// Returns `None` when the signal is too short to pad.
    pub fn filtfilt(&self, signal: &Array1<f64>) -> Option<Array1<f64>> {
        let x = signal.to_vec();
        let n = x.len();
        let pad = self.pad_len();
        if n <= pad {
            return None;
        }

        let first = x[0];
        let last = x[n - 1];
        let mut extended = Vec::with_capacity(n + 2 * pad);
        extended.extend((1..=pad).rev().map(|i| 2.0 * first - x[i]));
        extended.extend_from_slice(&x);
        extended.extend((1..=pad).map(|i| 2.0 * last - x[n - 1 - i]));

        let mut forward = self.filter_from_steady_state(&extended);
        forward.reverse();
        let mut backward = self.filter_from_steady_state(&forward);
        backward.reverse();

        Some(Array1::from_iter(backward.into_iter().skip(pad).take(n)))
    }

    /// Runs the cascade with every section primed as if the first sample had
    /// been held forever.
    fn filter_from_steady_state(&self, input: &[f64]) -> Vec<f64> {
        let Some(&x0) = input.first() else {
            return Vec::new();
        };
        let mut level = x0;
        let mut states: Vec<[f64; 2]> = self
            .sections
            .iter()
            .map(|section| {
                let zi = section.steady_state();
                let state = [zi[0] * level, zi[1] * level];
                level *= section.dc_gain();
                state
            })
            .collect();

        input
            .iter()
            .map(|&x| {
                self.sections
                    .iter()
                    .zip(states.iter_mut())
                    .fold(x, |v, (section, state)| section.step(v, state))
            })
            .collect()
    }
}

fn low_pass_to_band_pass(
    pole: Complex<f64>,
    bandwidth: f64,
    center: f64,
) -> (Complex<f64>, Complex<f64>) {
    let scaled = pole * bandwidth;
    let root = (scaled * scaled - 4.0 * center * center).sqrt();
    ((scaled + root) / 2.0, (scaled - root) / 2.0)
}

fn bilinear(s: Complex<f64>) -> Complex<f64> {
    (4.0 + s) / (4.0 - s)
}
