use ndarray::Array1;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Scales `signal` to zero mean and unit variance.
///
/// A flat signal has no shape to preserve and maps to zeros.
pub fn z_score(signal: &Array1<f64>) -> Array1<f64> {
    let Some(m) = signal.mean() else {
        return signal.clone();
    };
    let s = signal.std(0.0);
    if s <= 0.0 || !s.is_finite() {
        return Array1::zeros(signal.len());
    }
    signal.mapv(|v| (v - m) / s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values).unwrap(), 5.0);
        assert_relative_eq!(std_dev(&values).unwrap(), 2.0);
    }

    #[test]
    fn test_empty_inputs_yield_none() {
        assert!(mean(&[]).is_none());
        assert!(std_dev(&[]).is_none());
        assert!(min_max(&[]).is_none());
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min_max(&[3.0, -1.0, 7.5, 2.0]), Some((-1.0, 7.5)));
    }

    #[test]
    fn test_z_score_has_zero_mean_unit_std() {
        let z = z_score(&array![1.0, 2.0, 3.0, 4.0, 10.0]);
        assert_relative_eq!(z.mean().unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(z.std(0.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_z_score_of_flat_signal_is_zero() {
        let z = z_score(&array![5.0, 5.0, 5.0]);
        assert_eq!(z, array![0.0, 0.0, 0.0]);
    }
}
