//! Player session lifecycle
//!
//! A session ties one video file to one engine attachment and everything
//! derived from it. Construction attaches and starts loading; teardown is
//! guaranteed through Drop, so back navigation, a fatal error exit, and an
//! outer unmount all release the engine the same way. Only one session may
//! exist at a time; callers drop the old one before beginning the next.

use crate::engine::{MediaEngine, PlayerSurface};
use crate::media::{VideoFile, VideoId};
use crate::player::controller::PlaybackController;
use crate::subtitles::AudioTrack;
use crate::utils::config::Config;
use log::info;

/// One playback session over a single video file
pub struct PlayerSession {
    video_id: VideoId,
    controller: PlaybackController,
}

impl PlayerSession {
    /// Attach the engine to `file` and begin loading
    pub fn begin(
        file: &VideoFile,
        audio_tracks: Vec<AudioTrack>,
        engine: Box<dyn MediaEngine>,
        surface: Box<dyn PlayerSurface>,
        config: Config,
    ) -> Self {
        info!("Starting session for \"{}\"", file.display_name);
        let mut controller =
            PlaybackController::new(file, audio_tracks, engine, surface, config);
        controller.start();

        Self { video_id: file.id, controller }
    }

    pub fn video_id(&self) -> VideoId {
        self.video_id
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController {
        &mut self.controller
    }

    /// Explicitly end the session; also runs on drop
    pub fn end(&mut self) {
        self.controller.teardown();
    }
}

impl Drop for PlayerSession {
    fn drop(&mut self) {
        self.end();
    }
}
