//! Media records for PrismPlayer
//!
//! This module defines the data model handed to the player by the import
//! surface: imported video files, their display metadata, chapter markers,
//! and the file-type acceptance rules for drag-and-drop and file-picker
//! input. Metadata values are produced upstream (currently by a filename
//! heuristic outside this crate) and consumed here as opaque labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use uuid::Uuid;

/// Container extensions accepted by the import surface, in addition to
/// anything with a video/* or audio/* MIME type
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mov", "mkv", "webm", "avi", "ts", "ogv",
];

/// Subtitle extensions accepted by the import surface
pub const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "vtt"];

/// Opaque unique identifier for an imported video file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoId(Uuid);

impl VideoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// HDR classification derived from stream metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HdrFormat {
    #[default]
    None,
    Hdr10,
    Hdr10Plus,
    DolbyVision,
    Hlg,
}

impl HdrFormat {
    /// Badge label shown next to the resolution class
    pub fn label(&self) -> Option<&'static str> {
        match self {
            HdrFormat::None => None,
            HdrFormat::Hdr10 => Some("HDR10"),
            HdrFormat::Hdr10Plus => Some("HDR10+"),
            HdrFormat::DolbyVision => Some("Dolby Vision"),
            HdrFormat::Hlg => Some("HLG"),
        }
    }
}

/// A chapter marker within a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds, when the source provides one
    pub end_time: Option<f64>,
}

impl Chapter {
    pub fn new(title: impl Into<String>, start_time: f64) -> Self {
        Self {
            title: title.into(),
            start_time,
            end_time: None,
        }
    }
}

/// The intro segment of a video, offered for skipping while playback is
/// inside it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntroWindow {
    pub start: f64,
    pub end: f64,
}

impl IntroWindow {
    /// Whether the skip-intro affordance should be offered at `time`
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time < self.end
    }
}

/// Display metadata attached to an imported video file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Duration as a displayable string, e.g. "1:42:05"
    pub duration_label: String,
    /// Resolution class, e.g. "4K" or "1080p"
    pub resolution_label: String,
    pub video_codec: String,
    pub audio_codec: String,
    pub container: String,
    pub hdr: HdrFormat,
    pub bitrate_label: String,
    pub frame_rate_label: String,
    /// Intro window in seconds, when known
    pub intro: Option<IntroWindow>,
    /// Chapter markers, not necessarily sorted or bounded by duration
    pub chapters: Vec<Chapter>,
}

/// An imported local video file
///
/// Immutable while a player session is open, except for `last_played_at`,
/// which the session sets exactly once at the moment playback begins.
#[derive(Debug, Clone)]
pub struct VideoFile {
    pub id: VideoId,
    /// Handle to the imported source on disk
    pub source_path: PathBuf,
    pub display_name: String,
    /// URI handed to the media engine
    pub stream_uri: String,
    pub size_bytes: u64,
    pub metadata: VideoMetadata,
    pub last_played_at: Option<SystemTime>,
}

impl VideoFile {
    pub fn new(
        source_path: PathBuf,
        display_name: impl Into<String>,
        stream_uri: impl Into<String>,
        size_bytes: u64,
        metadata: VideoMetadata,
    ) -> Self {
        Self {
            id: VideoId::new(),
            source_path,
            display_name: display_name.into(),
            stream_uri: stream_uri.into(),
            size_bytes,
            metadata,
            last_played_at: None,
        }
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Whether a dropped or picked file should be offered for import as media
///
/// Accepts video/* and audio/* MIME types, and falls back to the container
/// extension list for files the host reports with no useful type (.mkv is
/// the common case).
pub fn is_video_candidate(file_name: &str, mime: Option<&str>) -> bool {
    if let Some(mime) = mime {
        if mime.starts_with("video/") || mime.starts_with("audio/") {
            return true;
        }
    }

    extension_of(file_name)
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Whether a dropped or picked file should be offered as a subtitle track
pub fn is_subtitle_candidate(file_name: &str) -> bool {
    extension_of(file_name)
        .map(|ext| SUBTITLE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}
