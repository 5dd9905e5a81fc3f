//! On-screen view composition state
//!
//! Overlay panels are mutually exclusive, and the transport controls hide
//! on a deadline that only runs while playback is active and no sidebar is
//! open. Deadlines are plain instants checked from `tick`, so teardown can
//! cancel everything deterministically.

use std::time::{Duration, Instant};

/// The overlay panels layered over the playback surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPanel {
    Diagnostics,
    Settings,
    Chapters,
}

impl OverlayPanel {
    /// Sidebar panels suppress the controls auto-hide timer entirely
    pub fn suppresses_auto_hide(&self) -> bool {
        matches!(self, OverlayPanel::Settings | OverlayPanel::Chapters)
    }
}

/// Visibility state of the control surface and overlay panels
#[derive(Debug)]
pub struct ViewState {
    panel: Option<OverlayPanel>,
    controls_visible: bool,
    controls_hide_at: Option<Instant>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            panel: None,
            controls_visible: true,
            controls_hide_at: None,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> Option<OverlayPanel> {
        self.panel
    }

    /// Open a panel, closing whichever other panel was showing
    pub fn open_panel(&mut self, panel: OverlayPanel) {
        self.panel = Some(panel);
        self.controls_visible = true;
        if panel.suppresses_auto_hide() {
            self.controls_hide_at = None;
        }
    }

    pub fn close_panel(&mut self) {
        self.panel = None;
    }

    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    /// Reveal the controls and arm the hide deadline
    ///
    /// `delay` is `None` when the timer is suppressed (paused playback or
    /// an open sidebar): the controls then stay up indefinitely.
    pub fn show_controls(&mut self, now: Instant, delay: Option<Duration>) {
        self.controls_visible = true;
        self.controls_hide_at = delay.map(|d| now + d);
    }

    /// Reveal the controls with no hide deadline at all
    pub fn pin_controls(&mut self) {
        self.controls_visible = true;
        self.controls_hide_at = None;
    }

    /// Advance deadline-based state; hides the controls once their
    /// deadline passes
    pub fn tick(&mut self, now: Instant) {
        if let Some(hide_at) = self.controls_hide_at {
            if now >= hide_at {
                self.controls_visible = false;
                self.controls_hide_at = None;
            }
        }
    }

    /// Cancel every pending deadline; used on session teardown
    pub fn clear_timers(&mut self) {
        self.controls_hide_at = None;
    }
}
