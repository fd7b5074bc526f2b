use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::vitals::domain::estimate::Estimate;

/// Status of a rate against its reference range, or why there is none.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalStatus {
    Normal,
    Abnormal,
    NotDetected,
    InsufficientData,
}

impl VitalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VitalStatus::Normal => "normal",
            VitalStatus::Abnormal => "abnormal",
            VitalStatus::NotDetected => "not_detected",
            VitalStatus::InsufficientData => "insufficient_data",
        }
    }
}

/// A session-level summary that may be missing.
///
/// Missing summaries serialise as `{"status": "not_detected"}` or
/// `{"status": "insufficient_data"}` so every report key is always present.
#[derive(Clone, Debug, PartialEq)]
pub enum VitalSummary<T> {
    Detected(T),
    Insufficient,
    NotDetected,
}

impl<T> VitalSummary<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            VitalSummary::Detected(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, VitalSummary::Detected(_))
    }

    /// Summarises a detected estimate with `f`, carrying the sentinel
    /// otherwise.
    pub fn from_estimate<U>(estimate: &Estimate<U>, f: impl FnOnce(&U) -> T) -> Self {
        match estimate {
            Estimate::Detected(v) => VitalSummary::Detected(f(v)),
            Estimate::Insufficient => VitalSummary::Insufficient,
            Estimate::NotDetected => VitalSummary::NotDetected,
        }
    }
}

impl<T: Serialize> Serialize for VitalSummary<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let status = match self {
            VitalSummary::Detected(value) => return value.serialize(serializer),
            VitalSummary::Insufficient => VitalStatus::InsufficientData,
            VitalSummary::NotDetected => VitalStatus::NotDetected,
        };
        let mut state = serializer.serialize_struct("VitalSummary", 1)?;
        state.serialize_field("status", &status)?;
        state.end()
    }
}
