//! Chapter navigation for PrismPlayer
//!
//! The active chapter list is a cached derived value: filtered against the
//! known media duration and sorted by start time, recomputed only when the
//! source list or the duration changes, never on a time tick. Lookups over
//! it are pure functions of the probe time.

use crate::media::Chapter;
use log::debug;

/// Guard band for forward skips: a chapter starting within one second of
/// the current position counts as already entered
pub const NEXT_CHAPTER_GUARD_SECONDS: f64 = 1.0;

/// Within this many seconds of a chapter's start, back-skip targets the
/// previous chapter instead of restarting the current one
pub const RESTART_GUARD_SECONDS: f64 = 3.0;

/// Cached chapter lookup over a video's chapter markers
#[derive(Debug, Default)]
pub struct ChapterIndex {
    source: Vec<Chapter>,
    duration: Option<f64>,
    active: Vec<Chapter>,
}

impl ChapterIndex {
    /// Build the index; duration is typically unknown until the engine
    /// reports metadata
    pub fn new(chapters: Vec<Chapter>) -> Self {
        let mut index = Self {
            source: chapters,
            duration: None,
            active: Vec::new(),
        };
        index.rebuild();
        index
    }

    /// Record the media duration once known, invalidating the active list
    pub fn set_duration(&mut self, duration: f64) {
        if self.duration == Some(duration) {
            return;
        }
        self.duration = Some(duration);
        self.rebuild();
    }

    /// Replace the source chapter list, invalidating the active list
    pub fn set_chapters(&mut self, chapters: Vec<Chapter>) {
        self.source = chapters;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.active = self
            .source
            .iter()
            .filter(|c| match self.duration {
                // Markers at or past the end of the media are metadata
                // overruns; drop them once the real duration is known.
                Some(duration) => c.start_time < duration,
                None => true,
            })
            .cloned()
            .collect();
        self.active
            .sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        debug!(
            "Rebuilt chapter index: {} of {} chapters active",
            self.active.len(),
            self.source.len()
        );
    }

    /// The filtered, sorted chapter list
    pub fn active(&self) -> &[Chapter] {
        &self.active
    }

    /// The chapter containing `time`: the last one starting at or before it
    pub fn current(&self, time: f64) -> Option<&Chapter> {
        self.chapter_at(time)
    }

    /// Same rule applied to an arbitrary probe time, for scrub-bar hover
    pub fn chapter_at(&self, time: f64) -> Option<&Chapter> {
        self.active
            .iter()
            .rev()
            .find(|c| c.start_time <= time)
    }

    /// The next chapter strictly beyond the one-second guard band
    pub fn next(&self, time: f64) -> Option<&Chapter> {
        self.active
            .iter()
            .find(|c| c.start_time > time + NEXT_CHAPTER_GUARD_SECONDS)
    }

    /// Seek target for the back-skip control
    ///
    /// Restart the current chapter, unless playback is within the restart
    /// guard of its start, in which case jump to the previous chapter (or
    /// the very beginning).
    pub fn previous_target(&self, time: f64) -> f64 {
        let Some(position) = self
            .active
            .iter()
            .rposition(|c| c.start_time <= time)
        else {
            return 0.0;
        };

        let current = &self.active[position];
        if time < current.start_time + RESTART_GUARD_SECONDS {
            if position == 0 {
                0.0
            } else {
                self.active[position - 1].start_time
            }
        } else {
            current.start_time
        }
    }
}
