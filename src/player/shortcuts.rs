//! Declarative keyboard shortcut table
//!
//! Keys map to player actions through a single table rather than ad-hoc
//! match arms, so bindings stay inspectable and dispatch cannot capture
//! stale state. Character keys are matched case-insensitively; the shift
//! flag is part of the combo.

use once_cell::sync::Lazy;

/// Keys the player reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Space,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
}

/// A key plus its shift modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCombo {
    pub key: Key,
    pub shift: bool,
}

impl KeyCombo {
    pub fn plain(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn char(c: char) -> Self {
        Self { key: Key::Char(c), shift: false }
    }

    pub fn shifted_char(c: char) -> Self {
        Self { key: Key::Char(c), shift: true }
    }

    fn normalized(self) -> Self {
        match self.key {
            Key::Char(c) => Self { key: Key::Char(c.to_ascii_lowercase()), ..self },
            _ => self,
        }
    }
}

/// Actions reachable from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    TogglePlay,
    ToggleFullscreen,
    ToggleMute,
    ToggleSubtitles,
    SeekBackward,
    SeekForward,
    VolumeUp,
    VolumeDown,
    NextChapter,
    PreviousChapter,
    SkipIntro,
    /// Priority cascade: close chapter list, else close settings, else
    /// exit fullscreen, else leave the session
    Escape,
}

static DEFAULT_BINDINGS: Lazy<Vec<(KeyCombo, PlayerAction)>> = Lazy::new(|| {
    vec![
        (KeyCombo::plain(Key::Space), PlayerAction::TogglePlay),
        (KeyCombo::char('k'), PlayerAction::TogglePlay),
        (KeyCombo::char('f'), PlayerAction::ToggleFullscreen),
        (KeyCombo::char('m'), PlayerAction::ToggleMute),
        (KeyCombo::char('c'), PlayerAction::ToggleSubtitles),
        (KeyCombo::plain(Key::ArrowLeft), PlayerAction::SeekBackward),
        (KeyCombo::char('j'), PlayerAction::SeekBackward),
        (KeyCombo::plain(Key::ArrowRight), PlayerAction::SeekForward),
        (KeyCombo::char('l'), PlayerAction::SeekForward),
        (KeyCombo::plain(Key::ArrowUp), PlayerAction::VolumeUp),
        (KeyCombo::plain(Key::ArrowDown), PlayerAction::VolumeDown),
        (KeyCombo::shifted_char('n'), PlayerAction::NextChapter),
        (KeyCombo::shifted_char('p'), PlayerAction::PreviousChapter),
        (KeyCombo::char('s'), PlayerAction::SkipIntro),
        (KeyCombo::plain(Key::Escape), PlayerAction::Escape),
    ]
});

/// The key-to-action lookup used by the controller
#[derive(Debug, Clone)]
pub struct ShortcutMap {
    bindings: Vec<(KeyCombo, PlayerAction)>,
}

impl Default for ShortcutMap {
    fn default() -> Self {
        Self { bindings: DEFAULT_BINDINGS.clone() }
    }
}

impl ShortcutMap {
    /// Resolve a pressed combo to an action, if bound
    pub fn resolve(&self, combo: KeyCombo) -> Option<PlayerAction> {
        let combo = combo.normalized();
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == combo)
            .map(|(_, action)| *action)
    }

    pub fn bindings(&self) -> &[(KeyCombo, PlayerAction)] {
        &self.bindings
    }
}
