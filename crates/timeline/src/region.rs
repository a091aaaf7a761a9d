use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A time-range selection on the detail surface.
///
/// Pending regions are the user's in-progress cut; committed regions are
/// read-only markers mirroring slices that already exist in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub start: f64,
    pub end: f64,
    pub committed: bool,
}

impl Region {
    pub fn pending(start: f64, end: f64) -> Self {
        Self { id: Uuid::new_v4().to_string(), start, end, committed: false }
    }

    pub fn marker(slice: &Slice) -> Self {
        Self { id: slice.id.clone(), start: slice.start_time, end: slice.end_time, committed: true }
    }

    pub fn width(&self) -> f64 { self.end - self.start }
}

/// Persisted, named cut of the source track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slice {
    pub id: String,
    pub name: String,
    pub start_time: f64,
    pub end_time: f64,
}

/// Payload for the persistence collaborator's `createSlice`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSlice {
    pub name: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl NewSlice {
    pub fn from_region(name: impl Into<String>, region: &Region) -> Self {
        Self { name: name.into(), start_time: region.start, end_time: region.end }
    }
}

/// Partial update for `updateSlice`; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlicePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
}

impl SlicePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.start_time.is_none() && self.end_time.is_none()
    }

    pub fn apply_to(&self, slice: &Slice) -> Slice {
        Slice {
            id: slice.id.clone(),
            name: self.name.clone().unwrap_or_else(|| slice.name.clone()),
            start_time: self.start_time.unwrap_or(slice.start_time),
            end_time: self.end_time.unwrap_or(slice.end_time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_regions_get_unique_ids() {
        let a = Region::pending(1.0, 2.0);
        let b = Region::pending(1.0, 2.0);
        assert_ne!(a.id, b.id);
        assert!(!a.committed);
    }

    #[test]
    fn marker_mirrors_slice() {
        let slice = Slice { id: "s1".into(), name: "kick".into(), start_time: 1.0, end_time: 1.5 };
        let marker = Region::marker(&slice);
        assert_eq!(marker.id, "s1");
        assert!(marker.committed);
        assert_eq!((marker.start, marker.end), (1.0, 1.5));
    }

    #[test]
    fn new_slice_uses_collaborator_field_names() {
        let region = Region::pending(10.0, 12.0);
        let json = serde_json::to_value(NewSlice::from_region("snare", &region)).unwrap();
        assert_eq!(json["name"], "snare");
        assert_eq!(json["startTime"], 10.0);
        assert_eq!(json["endTime"], 12.0);
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let slice = Slice { id: "s1".into(), name: "kick".into(), start_time: 1.0, end_time: 1.5 };
        let patch = SlicePatch { end_time: Some(2.0), ..Default::default() };
        let updated = patch.apply_to(&slice);
        assert_eq!(updated.name, "kick");
        assert_eq!((updated.start_time, updated.end_time), (1.0, 2.0));
        assert!(SlicePatch::default().is_empty());

        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"endTime":2.0}"#);
    }
}
