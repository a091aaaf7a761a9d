//! Pushes engine state onto the two waveform surfaces.
//!
//! The presenter remembers what each surface was last told and only issues
//! the calls needed to bring it up to date.

use std::collections::BTreeMap;

use crate::collab::{OverlayKind, OverlayRegion, WaveformSurface};
use crate::engine::TimelineEngine;
use crate::overview::OverviewGeometry;

pub const VIEWPORT_OVERLAY_ID: &str = "viewport-window";
pub const INDICATOR_OVERLAY_ID: &str = "playback-position";

#[derive(Debug, Default)]
struct Presented {
    render: Option<(f64, f64)>,
    overlays: BTreeMap<String, OverlayRegion>,
}

impl Presented {
    fn sync<W: WaveformSurface>(&mut self, surface: &mut W, render: Option<(f64, f64)>, wanted: Vec<OverlayRegion>) {
        if let Some((px_per_sec, scroll)) = render {
            if self.render != render {
                surface.render_at(px_per_sec, scroll);
                self.render = render;
            }
        }

        let wanted: BTreeMap<String, OverlayRegion> = wanted.into_iter().map(|o| (o.id.clone(), o)).collect();
        let stale: Vec<String> = self.overlays.keys().filter(|id| !wanted.contains_key(*id)).cloned().collect();
        for id in stale {
            surface.remove_overlay_region(&id);
            self.overlays.remove(&id);
        }
        for (id, overlay) in wanted {
            match self.overlays.get(&id) {
                Some(shown) if *shown == overlay => {}
                Some(_) => surface.update_overlay_region(&overlay),
                None => surface.add_overlay_region(&overlay),
            }
            self.overlays.insert(id, overlay);
        }
    }
}

#[derive(Debug, Default)]
pub struct SurfacePresenter {
    overview: Presented,
    detail: Presented,
}

impl SurfacePresenter {
    pub fn new() -> Self { Self::default() }

    /// Bring both surfaces in line with `engine`. An unloaded engine clears
    /// every overlay and leaves the surfaces inert.
    pub fn present<O, D>(&mut self, engine: &TimelineEngine, overview: &mut O, detail: &mut D)
    where
        O: WaveformSurface,
        D: WaveformSurface,
    {
        let duration = engine.timeline().duration();
        let (Some(window), Some(view)) = (engine.viewport_window(), engine.detail_view()) else {
            self.overview.sync(overview, None, Vec::new());
            self.detail.sync(detail, None, Vec::new());
            return;
        };

        let geometry = OverviewGeometry::new(engine.overview_width_px(), duration);
        let mut overview_overlays = vec![OverlayRegion {
            id: VIEWPORT_OVERLAY_ID.into(),
            start: window.start(),
            end: window.end(),
            kind: OverlayKind::ViewportWindow,
        }];
        if let Some(span) = engine.playback_indicator() {
            overview_overlays.push(OverlayRegion {
                id: INDICATOR_OVERLAY_ID.into(),
                start: span.start,
                end: span.end,
                kind: OverlayKind::PlaybackIndicator,
            });
        }
        self.overview.sync(overview, Some((geometry.px_per_sec(), 0.0)), overview_overlays);

        let mut detail_overlays: Vec<OverlayRegion> = engine
            .committed_markers()
            .iter()
            .map(|m| OverlayRegion { id: m.id.clone(), start: m.start, end: m.end, kind: OverlayKind::SliceMarker })
            .collect();
        if let Some(region) = engine.pending_region() {
            detail_overlays.push(OverlayRegion {
                id: region.id.clone(),
                start: region.start,
                end: region.end,
                kind: OverlayKind::PendingRegion,
            });
        }
        self.detail.sync(detail, Some((view.px_per_sec, view.scroll_offset_px)), detail_overlays);
    }
}
