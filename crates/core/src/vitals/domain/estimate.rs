/// Outcome of one estimator run.
///
/// Estimators never fail: a window that is too short or a signal with no
/// plausible answer is reported as a variant, never as an error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Estimate<T> {
    Detected(T),
    /// The window held fewer samples than the estimator needs.
    Insufficient,
    /// Enough samples, but no value passed the plausibility checks.
    NotDetected,
}

impl<T> Estimate<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Estimate::Detected(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Estimate::Detected(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, Estimate::Detected(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Estimate<U> {
        match self {
            Estimate::Detected(v) => Estimate::Detected(f(v)),
            Estimate::Insufficient => Estimate::Insufficient,
            Estimate::NotDetected => Estimate::NotDetected,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Estimate::Detected(_) => "detected",
            Estimate::Insufficient => "insufficient_data",
            Estimate::NotDetected => "not_detected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        assert_eq!(Estimate::Detected(72.0).value(), Some(&72.0));
        assert_eq!(Estimate::<f64>::Insufficient.value(), None);
        assert_eq!(Estimate::<f64>::NotDetected.into_value(), None);
    }

    #[test]
    fn test_map_preserves_sentinels() {
        assert_eq!(Estimate::Detected(2).map(|v| v * 2), Estimate::Detected(4));
        assert_eq!(
            Estimate::<i32>::Insufficient.map(|v| v * 2),
            Estimate::Insufficient
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(Estimate::Detected(()).label(), "detected");
        assert_eq!(Estimate::<()>::Insufficient.label(), "insufficient_data");
        assert_eq!(Estimate::<()>::NotDetected.label(), "not_detected");
    }
}
