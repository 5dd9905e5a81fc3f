//! Real-time playback statistics for the diagnostics panel
//!
//! The sampler exists only while the diagnostics panel is visible. Each
//! animation frame it overwrites a single snapshot from the engine's
//! counters; the fps figure is aggregated over one-second windows so it
//! reads steadily instead of flickering with the poll cadence.

use crate::engine::{MediaEngine, PlayerSurface, TimeRange};
use serde::Serialize;

/// Milliseconds between fps recomputations
const FPS_WINDOW_MS: f64 = 1000.0;

/// Continuously overwritten snapshot of playback telemetry
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RealtimeStats {
    pub decoded_frames: u64,
    pub dropped_frames: u64,
    /// Instantaneous frame rate over the last full sample window
    pub fps: u32,
    /// Seconds of media buffered ahead of the playhead; never negative
    pub buffer_ahead_seconds: f64,
    pub source_width: u32,
    pub source_height: u32,
    pub display_width: u32,
    pub display_height: u32,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub playback_rate: f64,
}

/// Reference point for the sliding fps window
#[derive(Debug, Clone, Copy)]
struct FpsReference {
    at_ms: f64,
    decoded_frames: u64,
}

/// Per-frame sampler feeding the diagnostics panel
///
/// Allocated when the panel opens, dropped when it closes or the session
/// ends; it must never run without a viewer.
#[derive(Debug, Default)]
pub struct StatsSampler {
    stats: RealtimeStats,
    fps_reference: Option<FpsReference>,
}

impl StatsSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the engine once; `now_ms` is the host's animation-frame
    /// timestamp
    pub fn sample(
        &mut self,
        engine: &dyn MediaEngine,
        surface: &dyn PlayerSurface,
        now_ms: f64,
    ) -> &RealtimeStats {
        let (decoded, dropped) = engine
            .playback_quality()
            .map(|q| (q.decoded_frames, q.dropped_frames))
            .or_else(|| engine.fallback_frame_counters())
            .unwrap_or((0, 0));

        self.stats.decoded_frames = decoded;
        self.stats.dropped_frames = dropped;
        self.update_fps(now_ms, decoded);

        self.stats.buffer_ahead_seconds = buffer_ahead(&engine.buffered(), engine.position());
        (self.stats.source_width, self.stats.source_height) = engine.video_size();
        (self.stats.display_width, self.stats.display_height) = surface.display_size();
        (self.stats.viewport_width, self.stats.viewport_height) = surface.viewport_size();
        self.stats.playback_rate = engine.rate();

        &self.stats
    }

    fn update_fps(&mut self, now_ms: f64, decoded: u64) {
        let Some(reference) = self.fps_reference else {
            // Seed lazily once decoding begins so the first window does not
            // report a spurious spike.
            if decoded > 0 {
                self.fps_reference = Some(FpsReference { at_ms: now_ms, decoded_frames: decoded });
            }
            return;
        };

        let elapsed = now_ms - reference.at_ms;
        if elapsed >= FPS_WINDOW_MS {
            let delta = decoded.saturating_sub(reference.decoded_frames);
            self.stats.fps = ((delta as f64) * 1000.0 / elapsed).round() as u32;
            self.fps_reference = Some(FpsReference { at_ms: now_ms, decoded_frames: decoded });
        }
    }

    pub fn stats(&self) -> &RealtimeStats {
        &self.stats
    }
}

/// Seconds buffered beyond `position`, from the range containing it
///
/// Zero when no buffered range contains the playhead.
pub fn buffer_ahead(ranges: &[TimeRange], position: f64) -> f64 {
    ranges
        .iter()
        .find(|range| range.contains(position))
        .map(|range| (range.end - position).max(0.0))
        .unwrap_or(0.0)
}
