//! Subtitle and track types for PrismPlayer
//!
//! Cues live in source order; the per-tick lookup scans for the first cue
//! covering the offset-adjusted playback time, so well-formed ascending
//! input behaves as expected and overlapping cues resolve to the earliest.

mod parser;

pub use parser::parse;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier for an audio or subtitle track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(Uuid);

impl TrackId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single timed subtitle cue, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleCue {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// An imported subtitle track
#[derive(Debug, Clone)]
pub struct SubtitleTrack {
    pub id: TrackId,
    pub label: String,
    pub language: Option<String>,
    pub is_default: bool,
    pub cues: Vec<SubtitleCue>,
}

impl SubtitleTrack {
    pub fn new(label: impl Into<String>, cues: Vec<SubtitleCue>) -> Self {
        Self {
            id: TrackId::new(),
            label: label.into(),
            language: None,
            is_default: false,
            cues,
        }
    }

    /// The cue active at `time`, after shifting by `offset` seconds
    ///
    /// First match wins; only one cue is ever displayed at a time.
    pub fn cue_at(&self, time: f64, offset: f64) -> Option<&SubtitleCue> {
        let shifted = time - offset;
        self.cues
            .iter()
            .find(|cue| cue.start <= shifted && shifted <= cue.end)
    }
}

/// An audio track selector entry
#[derive(Debug, Clone)]
pub struct AudioTrack {
    pub id: TrackId,
    pub label: String,
    pub language: Option<String>,
    pub is_default: bool,
}

/// Subtitle selector state, with a distinguished off position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubtitleSelection {
    #[default]
    Off,
    Track(TrackId),
}

impl SubtitleSelection {
    pub fn is_off(&self) -> bool {
        matches!(self, SubtitleSelection::Off)
    }
}

/// The audio track selected by default: the first marked default, else the
/// first listed
pub fn default_audio_track(tracks: &[AudioTrack]) -> Option<TrackId> {
    tracks
        .iter()
        .find(|t| t.is_default)
        .or_else(|| tracks.first())
        .map(|t| t.id)
}
