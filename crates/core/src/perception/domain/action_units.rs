use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use super::face_landmarks::FaceLandmarks;

/// Facial action units observed in one frame, keyed by FACS code.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionUnitSet {
    units: BTreeMap<String, bool>,
}

impl ActionUnitSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_active<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            units: codes.into_iter().map(|c| (c.into(), true)).collect(),
        }
    }

    pub fn set(&mut self, code: &str, active: bool) {
        self.units.insert(code.to_string(), active);
    }

    pub fn is_active(&self, code: &str) -> bool {
        self.units.get(code).copied().unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.units.values().filter(|&&active| active).count()
    }

    pub fn units(&self) -> &BTreeMap<String, bool> {
        &self.units
    }
}

/// Serialises as `{"action_units": {"AU01": 0, ...}, "count": n}`.
impl Serialize for ActionUnitSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let flags: BTreeMap<&str, u8> = self
            .units
            .iter()
            .map(|(code, &active)| (code.as_str(), u8::from(active)))
            .collect();
        let mut state = serializer.serialize_struct("ActionUnitSet", 2)?;
        state.serialize_field("action_units", &flags)?;
        state.serialize_field("count", &self.active_count())?;
        state.end()
    }
}

/// Derives action units from one frame's face mesh.
pub trait ActionUnitDetector: Send {
    fn detect(&self, face: &FaceLandmarks) -> Option<ActionUnitSet>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_count() {
        let mut set = ActionUnitSet::from_active(["AU12", "AU25"]);
        set.set("AU01", false);
        assert_eq!(set.active_count(), 2);
        assert!(set.is_active("AU12"));
        assert!(!set.is_active("AU01"));
        assert!(!set.is_active("AU45"));
    }

    #[test]
    fn test_serializes_sorted_codes_with_count() {
        let mut set = ActionUnitSet::from_active(["AU25"]);
        set.set("AU01", false);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"action_units":{"AU01":0,"AU25":1},"count":1}"#);
    }
}
