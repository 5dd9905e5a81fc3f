//! Player core for PrismPlayer
//!
//! This module owns the playback state machine and everything synchronized
//! against it: the controller mediating between UI intents and the media
//! engine, the session aggregate guaranteeing teardown, the keyboard
//! shortcut table, and the on-screen view composition state.

mod controller;
mod session;
mod shortcuts;
mod view;

pub use controller::PlaybackController;
pub use session::PlayerSession;
pub use shortcuts::{Key, KeyCombo, PlayerAction, ShortcutMap};
pub use view::{OverlayPanel, ViewState};

use crate::engine::MediaErrorCode;

/// Playback state as a single tagged value
///
/// Buffering remembers whether playback was running when the stall began,
/// so recovery restores the right half of the Playing/Paused pair.
/// Errored is terminal: only return-to-library leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// No engine attachment yet
    Idle,

    /// Source attached, waiting for metadata
    Loading,

    /// Actively playing
    Playing,

    /// Paused by the user or the host
    Paused,

    /// Stalled waiting for data
    Buffering { was_playing: bool },

    /// Media ran to completion
    Ended,

    /// Fatal playback failure
    Errored(PlaybackErrorKind),
}

impl PlayerState {
    /// Whether playback is actively running (drives the controls
    /// auto-hide timer)
    pub fn is_playing(&self) -> bool {
        matches!(self, PlayerState::Playing)
    }

    pub fn is_errored(&self) -> bool {
        matches!(self, PlayerState::Errored(_))
    }

    /// Whether transport interaction is accepted in this state
    pub fn accepts_transport(&self) -> bool {
        !matches!(
            self,
            PlayerState::Idle | PlayerState::Loading | PlayerState::Errored(_)
        )
    }

    /// Whether the machine may move from this state to `next`
    ///
    /// The dispatcher drops anything else, so a stale engine callback can
    /// never push the session into an inconsistent state.
    pub fn can_transition_to(&self, next: &PlayerState) -> bool {
        use PlayerState::*;

        if self == next {
            return true;
        }

        match (self, next) {
            (Errored(_), _) => false,
            (_, Errored(_)) => true,
            (Idle, Loading) => true,
            (Loading, Playing | Paused) => true,
            (Playing, Paused | Buffering { .. } | Ended) => true,
            (Paused, Playing | Buffering { .. }) => true,
            (Buffering { .. }, Playing | Paused | Ended) => true,
            (Ended, Playing) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerState::Idle => write!(f, "idle"),
            PlayerState::Loading => write!(f, "loading"),
            PlayerState::Playing => write!(f, "playing"),
            PlayerState::Paused => write!(f, "paused"),
            PlayerState::Buffering { .. } => write!(f, "buffering"),
            PlayerState::Ended => write!(f, "ended"),
            PlayerState::Errored(kind) => write!(f, "errored ({})", kind.title()),
        }
    }
}

/// User-facing fatal failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackErrorKind {
    Network,
    Decode,
    Unsupported,
    Unknown,
}

impl PlaybackErrorKind {
    /// Translate an engine error code; abort-class codes are not
    /// user-facing and yield `None`
    pub fn from_media_code(code: MediaErrorCode) -> Option<Self> {
        match code {
            MediaErrorCode::Aborted => None,
            MediaErrorCode::Network => Some(PlaybackErrorKind::Network),
            MediaErrorCode::Decode => Some(PlaybackErrorKind::Decode),
            MediaErrorCode::SrcNotSupported => Some(PlaybackErrorKind::Unsupported),
            MediaErrorCode::Other(_) => Some(PlaybackErrorKind::Unknown),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PlaybackErrorKind::Network => "Network error",
            PlaybackErrorKind::Decode => "Playback error",
            PlaybackErrorKind::Unsupported => "Unsupported format",
            PlaybackErrorKind::Unknown => "Something went wrong",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PlaybackErrorKind::Network => {
                "A network problem interrupted playback. Return to the library and try again."
            }
            PlaybackErrorKind::Decode => {
                "This file could not be decoded. It may be damaged or use an unusual encoding."
            }
            PlaybackErrorKind::Unsupported => {
                "This format is not supported by your player."
            }
            PlaybackErrorKind::Unknown => {
                "An unknown playback error occurred."
            }
        }
    }
}

/// Host-side input events routed to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Pointer moved or was pressed anywhere over the player
    PointerActivity,

    /// A key went down
    KeyPressed {
        combo: KeyCombo,
        /// Keyboard focus is inside a text input; shortcuts are suppressed
        in_text_input: bool,
    },

    /// The host's fullscreen state changed
    FullscreenChanged(bool),
}

/// Notifications the session surfaces to its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    /// Playback began for the first time this session
    PlaybackBegan,

    /// The user asked to leave the player (escape cascade exhausted or
    /// error-screen exit)
    ExitRequested,
}
