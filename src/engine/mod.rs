//! Media engine capability layer for PrismPlayer
//!
//! The host hands the player a live media engine at session start. The
//! engine is owned exclusively by that session: every mutation routes
//! through the controller, and its asynchronous callbacks arrive as
//! `EngineEvent` values in delivery order. Requests are fire-and-forget;
//! their outcomes come back as later events.

pub mod sim;

pub use sim::{sim_engine, QualityReporting, SimEngine, SimHandle, SimScript};

/// A contiguous buffered span of the media timeline, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Frame counters from the engine's quality-reporting capability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackQuality {
    pub decoded_frames: u64,
    pub dropped_frames: u64,
}

/// Engine fatal-error codes, mirroring the host media stack's numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaErrorCode {
    /// Load aborted, typically because the session was torn down mid-load
    Aborted,
    Network,
    Decode,
    SrcNotSupported,
    Other(u8),
}

impl MediaErrorCode {
    /// Map the host's numeric code to the taxonomy
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => MediaErrorCode::Aborted,
            2 => MediaErrorCode::Network,
            3 => MediaErrorCode::Decode,
            4 => MediaErrorCode::SrcNotSupported,
            other => MediaErrorCode::Other(other),
        }
    }
}

/// Why a play request did not start playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayFailure {
    /// The request was interrupted, usually by teardown; not user-facing
    Aborted,
    /// The host refused to start playback (autoplay policy)
    NotAllowed,
}

/// Asynchronous callbacks from the engine, delivered in order
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Metadata is ready: duration and source dimensions are known
    MetadataLoaded {
        duration: f64,
        width: u32,
        height: u32,
    },

    /// Playback position progressed
    TimeUpdate { position: f64 },

    /// The engine is actually playing (also fires when recovering from a
    /// stall)
    Playing,

    /// The engine paused
    Paused,

    /// Playback stalled waiting for data
    Waiting,

    /// Enough data arrived to continue without necessarily playing
    DataReady,

    /// A play request was rejected
    PlayRejected { failure: PlayFailure },

    /// The media ran to completion
    Ended,

    /// A fatal error occurred
    FatalError { code: MediaErrorCode },
}

/// The live media engine attached to a player session
///
/// Implementations wrap whatever the host provides. All commands are
/// non-blocking; observable effects surface later as `EngineEvent`s.
pub trait MediaEngine {
    /// Begin loading the given source
    fn load(&mut self, uri: &str);

    /// Request playback; outcome arrives as `Playing` or `PlayRejected`
    fn request_play(&mut self);

    /// Request pause; outcome arrives as `Paused`
    fn request_pause(&mut self);

    /// Seek to an absolute position; the engine clamps to [0, duration]
    fn seek_to(&mut self, position: f64);

    fn set_volume(&mut self, volume: f64);

    fn set_muted(&mut self, muted: bool);

    fn set_rate(&mut self, rate: f64);

    /// Current playback position in seconds
    fn position(&self) -> f64;

    /// Media duration, once metadata has loaded
    fn duration(&self) -> Option<f64>;

    /// Buffered spans of the timeline
    fn buffered(&self) -> Vec<TimeRange>;

    /// Frame counters from the quality-reporting capability, if present
    fn playback_quality(&self) -> Option<PlaybackQuality>;

    /// Older engines expose (decoded, dropped) through legacy counters
    /// instead of the quality capability
    fn fallback_frame_counters(&self) -> Option<(u64, u64)>;

    fn rate(&self) -> f64;

    /// Source dimensions, once metadata has loaded
    fn video_size(&self) -> (u32, u32);

    fn is_paused(&self) -> bool;

    /// Detach the source and release engine resources
    fn detach(&mut self);
}

/// Host surface capabilities around the video element: fullscreen control,
/// layout dimensions, and the subtitle import prompt
pub trait PlayerSurface {
    /// Ask the host for exclusive fullscreen on the player container; the
    /// resulting state arrives as a fullscreen-change host event
    fn request_fullscreen(&mut self);

    fn exit_fullscreen(&mut self);

    /// On-screen size of the video element
    fn display_size(&self) -> (u32, u32);

    /// Size of the hosting viewport
    fn viewport_size(&self) -> (u32, u32);

    /// Open the host's file-selection prompt for a subtitle file
    fn prompt_subtitle_import(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range_contains() {
        let range = TimeRange { start: 10.0, end: 20.0 };
        assert!(range.contains(10.0));
        assert!(range.contains(20.0));
        assert!(!range.contains(9.9));
        assert!(!range.contains(20.1));
    }

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(MediaErrorCode::from_code(1), MediaErrorCode::Aborted);
        assert_eq!(MediaErrorCode::from_code(2), MediaErrorCode::Network);
        assert_eq!(MediaErrorCode::from_code(3), MediaErrorCode::Decode);
        assert_eq!(MediaErrorCode::from_code(4), MediaErrorCode::SrcNotSupported);
        assert_eq!(MediaErrorCode::from_code(9), MediaErrorCode::Other(9));
    }
}
