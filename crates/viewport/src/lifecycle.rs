//! Pending-region state machine: `Empty -> Pending -> {committed | Empty}`.
//!
//! At most one pending region exists. A second creation while one is
//! pending is dropped and the existing region is kept untouched.

use serde::{Deserialize, Serialize};
use timeline::{clamp_span, Region, Slice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    PendingExists,
    TooNarrow,
    NotLoaded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RegionOutcome {
    Created { region: Region },
    Discarded { reason: DiscardReason },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionLifecycle {
    pending: Option<Region>,
    markers: Vec<Region>,
}

impl RegionLifecycle {
    pub fn pending(&self) -> Option<&Region> { self.pending.as_ref() }

    /// Read-only markers for slices already in storage.
    pub fn markers(&self) -> &[Region] { &self.markers }

    pub fn create(&mut self, start: f64, end: f64, duration: f64, min_width: f64) -> RegionOutcome {
        if let Some(existing) = &self.pending {
            tracing::debug!(existing = %existing.id, start, end, "region already pending, discarding new one");
            return RegionOutcome::Discarded { reason: DiscardReason::PendingExists };
        }
        let (start, end) = clamp_span(start, end, duration);
        if end - start < min_width {
            tracing::debug!(start, end, "selection too narrow for a region");
            return RegionOutcome::Discarded { reason: DiscardReason::TooNarrow };
        }
        let region = Region::pending(start, end);
        tracing::debug!(id = %region.id, start, end, "region pending");
        self.pending = Some(region.clone());
        RegionOutcome::Created { region }
    }

    /// Resize the pending region in place. Updates for another id, or that
    /// would shrink the region below `min_width`, are ignored.
    pub fn update(&mut self, id: &str, start: f64, end: f64, duration: f64, min_width: f64) -> bool {
        let Some(region) = self.pending.as_mut().filter(|r| r.id == id) else {
            return false;
        };
        let (start, end) = clamp_span(start, end, duration);
        if end - start < min_width || (region.start == start && region.end == end) {
            return false;
        }
        region.start = start;
        region.end = end;
        tracing::trace!(id, start, end, "pending region resized");
        true
    }

    /// Remove the pending region, whether for commit or cancel.
    pub fn take_pending(&mut self) -> Option<Region> {
        self.pending.take()
    }

    pub fn set_markers(&mut self, slices: &[Slice]) {
        self.markers = slices.iter().map(Region::marker).collect();
        self.markers.sort_by(|a, b| a.start.total_cmp(&b.start));
    }

    pub fn add_marker(&mut self, slice: &Slice) {
        let marker = Region::marker(slice);
        let at = self.markers.partition_point(|m| m.start <= marker.start);
        self.markers.insert(at, marker);
    }
}
