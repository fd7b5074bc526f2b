use ndarray::Array1;

/// Subtracts the least-squares straight line from `signal`.
pub fn detrend(signal: &Array1<f64>) -> Array1<f64> {
    let n = signal.len();
    if n < 2 {
        return Array1::zeros(n);
    }
    let t_mean = (n - 1) as f64 / 2.0;
    let y_mean = signal.sum() / n as f64;

    let mut cov = 0.0;
    let mut var = 0.0;
    for (i, &y) in signal.iter().enumerate() {
        let dt = i as f64 - t_mean;
        cov += dt * (y - y_mean);
        var += dt * dt;
    }
    let slope = cov / var;

    Array1::from_iter(
        signal
            .iter()
            .enumerate()
            .map(|(i, &y)| y - (y_mean + slope * (i as f64 - t_mean))),
    )
}

/// Centred boxcar average with the output length equal to the input.
///
/// Samples beyond either edge count as zero, so the first and last
/// `window / 2` outputs are pulled toward zero.
pub fn moving_average(signal: &Array1<f64>, window: usize) -> Array1<f64> {
    let n = signal.len();
    if window <= 1 || n == 0 {
        return signal.clone();
    }
    let offset = (window - 1) / 2;
    let scale = 1.0 / window as f64;

    Array1::from_iter((0..n).map(|i| {
        // Full convolution index i + offset covers inputs [i + offset - (window - 1), i + offset].
        let hi = (i + offset).min(n - 1);
        let lo = (i + offset).saturating_sub(window - 1);
        signal.slice(ndarray::s![lo..=hi]).sum() * scale
    }))
}
