//! Integration test utilities for PrismPlayer
//!
//! Shared fixtures: demo video records, a recording host surface, a
//! mockall mock of the media engine trait, and subtitle file contents.

use mockall::mock;
use prismplayer::engine::{MediaEngine, PlaybackQuality, PlayerSurface, TimeRange};
use prismplayer::media::{Chapter, IntroWindow, VideoFile, VideoMetadata};
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

/// A small SRT file exercising index lines, multi-line text, and markup
pub const SRT_FIXTURE: &str = "\
1
00:00:01,000 --> 00:00:04,000
Hello there

2
00:00:05,500 --> 00:00:08,000
<i>Styled</i> line
and a second line
";

/// Build a demo video record with chapters and an intro window
pub fn demo_video(name: &str) -> VideoFile {
    let metadata = VideoMetadata {
        duration_label: "2:00".to_string(),
        resolution_label: "1080p".to_string(),
        video_codec: "H.264".to_string(),
        audio_codec: "AAC".to_string(),
        container: "Matroska".to_string(),
        intro: Some(IntroWindow { start: 5.0, end: 30.0 }),
        chapters: vec![
            Chapter::new("Opening", 0.0),
            Chapter::new("Act One", 60.0),
            Chapter::new("Finale", 180.0),
        ],
        ..VideoMetadata::default()
    };

    VideoFile::new(
        PathBuf::from(format!("/videos/{}.mkv", name)),
        name,
        format!("file:///videos/{}.mkv", name),
        1 << 20,
        metadata,
    )
}

/// Host surface that records what the player asked of it
pub struct RecordingSurface {
    pub fullscreen_requests: Rc<Cell<u32>>,
    pub exit_requests: Rc<Cell<u32>>,
    pub import_prompts: Rc<Cell<u32>>,
}

impl RecordingSurface {
    pub fn new() -> (Self, Rc<Cell<u32>>, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let fullscreen = Rc::new(Cell::new(0));
        let exits = Rc::new(Cell::new(0));
        let prompts = Rc::new(Cell::new(0));
        let surface = Self {
            fullscreen_requests: Rc::clone(&fullscreen),
            exit_requests: Rc::clone(&exits),
            import_prompts: Rc::clone(&prompts),
        };
        (surface, fullscreen, exits, prompts)
    }
}

impl PlayerSurface for RecordingSurface {
    fn request_fullscreen(&mut self) {
        self.fullscreen_requests.set(self.fullscreen_requests.get() + 1);
    }

    fn exit_fullscreen(&mut self) {
        self.exit_requests.set(self.exit_requests.get() + 1);
    }

    fn display_size(&self) -> (u32, u32) {
        (1280, 720)
    }

    fn viewport_size(&self) -> (u32, u32) {
        (1440, 900)
    }

    fn prompt_subtitle_import(&mut self) {
        self.import_prompts.set(self.import_prompts.get() + 1);
    }
}

mock! {
    /// Mock media engine for verifying command routing
    pub Engine {}

    impl MediaEngine for Engine {
        fn load(&mut self, uri: &str);
        fn request_play(&mut self);
        fn request_pause(&mut self);
        fn seek_to(&mut self, position: f64);
        fn set_volume(&mut self, volume: f64);
        fn set_muted(&mut self, muted: bool);
        fn set_rate(&mut self, rate: f64);
        fn position(&self) -> f64;
        fn duration(&self) -> Option<f64>;
        fn buffered(&self) -> Vec<TimeRange>;
        fn playback_quality(&self) -> Option<PlaybackQuality>;
        fn fallback_frame_counters(&self) -> Option<(u64, u64)>;
        fn rate(&self) -> f64;
        fn video_size(&self) -> (u32, u32);
        fn is_paused(&self) -> bool;
        fn detach(&mut self);
    }
}
