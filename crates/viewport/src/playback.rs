//! Playhead projection onto the overview and bounded region preview.
//!
//! Neither piece feeds back into the viewport window: playback moving on
//! never scrolls or zooms the detail surface.

use serde::{Deserialize, Serialize};
use timeline::{finite_or, Region};

use crate::collab::PlaybackEngine;

/// Where the playback indicator sits on the overview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSpan {
    pub start: f64,
    pub end: f64,
}

impl IndicatorSpan {
    /// `[current_time, current_time + width]`, shifted back so it never runs
    /// past `duration`.
    pub fn project(current_time: f64, duration: f64, width: f64) -> Self {
        let duration = finite_or(duration, 0.0).max(0.0);
        let width = finite_or(width, 0.0).clamp(0.0, duration);
        let start = finite_or(current_time, 0.0).clamp(0.0, duration - width);
        Self { start, end: start + width }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickAction {
    Continue,
    Looped,
    Stopped,
}

/// Playback of the pending region between its bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewLoop {
    pub region_id: String,
    pub start: f64,
    pub end: f64,
    pub looping: bool,
}

impl PreviewLoop {
    pub fn start<P: PlaybackEngine>(region: &Region, looping: bool, playback: &mut P) -> Self {
        playback.seek_to(region.start);
        playback.play();
        tracing::debug!(region = %region.id, start = region.start, end = region.end, looping, "region preview started");
        Self { region_id: region.id.clone(), start: region.start, end: region.end, looping }
    }

    /// Move the bounds while the preview keeps playing.
    pub fn retarget(&mut self, start: f64, end: f64) {
        self.start = start;
        self.end = end;
    }

    pub fn on_tick<P: PlaybackEngine>(&self, current_time: f64, playback: &mut P) -> TickAction {
        if current_time < self.end {
            return TickAction::Continue;
        }
        if self.looping {
            playback.seek_to(self.start);
            TickAction::Looped
        } else {
            playback.pause();
            tracing::debug!(region = %self.region_id, at = current_time, "region preview reached its end");
            TickAction::Stopped
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Playback fake that records every call.
    #[derive(Debug, Default)]
    pub(crate) struct FakePlayback {
        pub time: f64,
        pub playing: bool,
        pub calls: Vec<String>,
    }

    impl PlaybackEngine for FakePlayback {
        fn play(&mut self) {
            self.playing = true;
            self.calls.push("play".into());
        }
        fn pause(&mut self) {
            self.playing = false;
            self.calls.push("pause".into());
        }
        fn seek_to(&mut self, time: f64) {
            self.time = time;
            self.calls.push(format!("seek {time}"));
        }
        fn current_time(&self) -> f64 {
            self.time
        }
        fn is_playing(&self) -> bool {
            self.playing
        }
    }

    #[test]
    fn indicator_follows_playhead() {
        let span = IndicatorSpan::project(30.0, 120.0, 0.3);
        assert_eq!(span.start, 30.0);
        assert!((span.end - 30.3).abs() < 1e-9);
    }

    #[test]
    fn indicator_never_exceeds_duration() {
        let span = IndicatorSpan::project(120.0, 120.0, 0.3);
        assert!((span.start - 119.7).abs() < 1e-9);
        assert_eq!(span.end, 120.0);

        let span = IndicatorSpan::project(f64::NAN, 120.0, 0.3);
        assert_eq!(span.start, 0.0);
    }

    #[test]
    fn preview_pauses_at_region_end() {
        let mut playback = FakePlayback::default();
        let region = Region::pending(2.0, 3.0);
        let preview = PreviewLoop::start(&region, false, &mut playback);
        assert_eq!(playback.calls, vec!["seek 2", "play"]);

        assert_eq!(preview.on_tick(2.5, &mut playback), TickAction::Continue);
        assert_eq!(preview.on_tick(3.01, &mut playback), TickAction::Stopped);
        assert!(!playback.playing);
    }

    #[test]
    fn looping_preview_seeks_back() {
        let mut playback = FakePlayback::default();
        let region = Region::pending(2.0, 3.0);
        let mut preview = PreviewLoop::start(&region, true, &mut playback);
        preview.retarget(1.5, 2.5);
        assert_eq!(preview.on_tick(2.6, &mut playback), TickAction::Looped);
        assert_eq!(playback.time, 1.5);
        assert!(playback.playing);
    }
}
