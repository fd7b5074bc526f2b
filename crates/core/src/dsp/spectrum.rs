use rustfft::{num_complex::Complex, FftPlanner};

use super::peaks::{find_peaks, PeakCriteria};

/// One-sided magnitude spectrum of a real signal.
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrum {
    pub frequencies: Vec<f64>,
    pub magnitudes: Vec<f64>,
}

impl Spectrum {
    /// FFT magnitude of `signal`, zero-padded to `fft_len` points.
    ///
    /// Bins run from DC up to (but excluding) the Nyquist bin.
    pub fn of(signal: &[f64], sample_rate: f64, fft_len: usize) -> Self {
        let fft_len = fft_len.max(signal.len()).max(1);
        let mut buffer: Vec<Complex<f64>> = signal
            .iter()
            .map(|&v| Complex::new(v, 0.0))
            .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
            .take(fft_len)
            .collect();

        let mut planner = FftPlanner::<f64>::new();
        planner.plan_fft_forward(fft_len).process(&mut buffer);

        let bins = fft_len / 2;
        let resolution = sample_rate / fft_len as f64;
        Self {
            frequencies: (0..bins).map(|k| k as f64 * resolution).collect(),
            magnitudes: buffer[..bins].iter().map(|c| c.norm()).collect(),
        }
    }

    /// FFT length used for a window of `len` samples: the next power of two
    /// at or above four times the window.
    pub fn padded_len(len: usize) -> usize {
        (len.max(1) * 4).next_power_of_two()
    }

    /// Bins with `low_hz <= f <= high_hz`.
    pub fn band(&self, low_hz: f64, high_hz: f64) -> Spectrum {
        let (frequencies, magnitudes): (Vec<f64>, Vec<f64>) = self
            .frequencies
            .iter()
            .zip(&self.magnitudes)
            .filter(|&(&f, _)| f >= low_hz && f <= high_hz)
            .map(|(&f, &m)| (f, m))
            .unzip();
        Spectrum {
            frequencies,
            magnitudes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Frequency of the tallest local peak reaching `min_ratio` of the
    /// maximum magnitude, or of the maximum itself when no local peak
    /// qualifies. Ties resolve to the lower frequency.
    pub fn dominant_frequency(&self, min_ratio: f64) -> Option<f64> {
        let max = self
            .magnitudes
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return None;
        }

        let peaks = find_peaks(
            &self.magnitudes,
            &PeakCriteria {
                min_height: Some(max * min_ratio),
                min_distance: None,
            },
        );
        let best = peaks
            .into_iter()
            .reduce(|best, i| {
                if self.magnitudes[i] > self.magnitudes[best] {
                    i
                } else {
                    best
                }
            })
            .or_else(|| self.magnitudes.iter().position(|&m| m == max))?;

        Some(self.frequencies[best])
    }
}
