//! Playback controller
//!
//! The controller owns the playback state machine and is the only code
//! allowed to touch the media engine. UI intents come in as method calls,
//! engine callbacks as `EngineEvent`s in delivery order, the host's frame
//! callback as `on_animation_frame`, and timer progress as `tick`. After
//! teardown every entry point is inert, so stale callbacks referencing the
//! old session cannot mutate anything.

use crate::chapters::ChapterIndex;
use crate::engine::{EngineEvent, MediaEngine, PlayFailure, PlayerSurface};
use crate::media::{Chapter, IntroWindow, VideoFile};
use crate::player::shortcuts::{PlayerAction, ShortcutMap};
use crate::player::view::{OverlayPanel, ViewState};
use crate::player::{HostEvent, PlaybackErrorKind, PlayerState, SessionSignal};
use crate::stats::{RealtimeStats, StatsSampler};
use crate::subtitles::{self, AudioTrack, SubtitleSelection, SubtitleTrack, TrackId};
use crate::utils::config::Config;
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// The playback state machine for one player session
pub struct PlaybackController {
    config: Config,
    state: PlayerState,
    engine: Box<dyn MediaEngine>,
    surface: Box<dyn PlayerSurface>,

    stream_uri: String,
    duration: Option<f64>,
    position: f64,
    volume: f64,
    muted: bool,
    fullscreen: bool,
    playback_rate: f64,

    chapters: ChapterIndex,
    intro: Option<IntroWindow>,

    audio_tracks: Vec<AudioTrack>,
    audio_selection: Option<TrackId>,
    subtitle_tracks: Vec<SubtitleTrack>,
    subtitle_selection: SubtitleSelection,
    subtitle_offset: f64,

    view: ViewState,
    sampler: Option<StatsSampler>,
    shortcuts: ShortcutMap,

    signals: Vec<SessionSignal>,
    playback_began: bool,
    torn_down: bool,
}

impl PlaybackController {
    pub fn new(
        file: &VideoFile,
        audio_tracks: Vec<AudioTrack>,
        engine: Box<dyn MediaEngine>,
        surface: Box<dyn PlayerSurface>,
        config: Config,
    ) -> Self {
        let audio_selection = subtitles::default_audio_track(&audio_tracks);
        let volume = config.playback.default_volume;

        Self {
            state: PlayerState::Idle,
            engine,
            surface,
            stream_uri: file.stream_uri.clone(),
            duration: None,
            position: 0.0,
            volume,
            muted: volume == 0.0,
            fullscreen: false,
            playback_rate: 1.0,
            chapters: ChapterIndex::new(file.metadata.chapters.clone()),
            intro: file.metadata.intro,
            audio_tracks,
            audio_selection,
            subtitle_tracks: Vec::new(),
            subtitle_selection: SubtitleSelection::Off,
            subtitle_offset: 0.0,
            view: ViewState::new(),
            sampler: None,
            shortcuts: ShortcutMap::default(),
            signals: Vec::new(),
            playback_began: false,
            torn_down: false,
            config,
        }
    }

    /// Attach the engine to the media source and begin loading
    pub fn start(&mut self) {
        if self.state != PlayerState::Idle {
            return;
        }
        info!("Loading {}", self.stream_uri);
        self.transition(PlayerState::Loading);
        self.engine.set_volume(self.volume);
        self.engine.set_muted(self.muted);
        let uri = self.stream_uri.clone();
        self.engine.load(&uri);
    }

    /// Apply a legal state transition, dropping illegal ones
    fn transition(&mut self, next: PlayerState) {
        if self.state == next {
            return;
        }
        if !self.state.can_transition_to(&next) {
            debug!("Dropping illegal transition {} -> {}", self.state, next);
            return;
        }
        debug!("State {} -> {}", self.state, next);
        self.state = next;
    }

    // ---- engine callbacks -------------------------------------------------

    /// Apply one engine callback; callbacks must arrive in delivery order
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        if self.torn_down || self.state.is_errored() {
            return;
        }

        match event {
            EngineEvent::MetadataLoaded { duration, .. } => {
                self.duration = Some(duration);
                self.chapters.set_duration(duration);

                if self.state == PlayerState::Loading {
                    if self.config.playback.autoplay {
                        self.engine.request_play();
                        self.transition(PlayerState::Playing);
                    } else {
                        self.transition(PlayerState::Paused);
                    }
                }
            }

            EngineEvent::TimeUpdate { position } => {
                self.position = position;
            }

            EngineEvent::Playing => {
                // Confirmed by the engine, unlike the optimistic marks the
                // transport methods make; this is the moment a session's
                // playback genuinely begins.
                if !self.playback_began {
                    self.playback_began = true;
                    self.signals.push(SessionSignal::PlaybackBegan);
                }
                self.transition(PlayerState::Playing);
            }

            EngineEvent::Paused => {
                self.transition(PlayerState::Paused);
            }

            EngineEvent::Waiting => {
                let was_playing = self.state.is_playing();
                self.transition(PlayerState::Buffering { was_playing });
            }

            EngineEvent::DataReady => {
                if let PlayerState::Buffering { was_playing } = self.state {
                    self.transition(if was_playing {
                        PlayerState::Playing
                    } else {
                        PlayerState::Paused
                    });
                }
            }

            EngineEvent::PlayRejected { failure } => match failure {
                // An aborted play request means the session went away
                // mid-load; nothing to surface.
                PlayFailure::Aborted => debug!("Play request aborted"),
                PlayFailure::NotAllowed => {
                    info!("Autoplay refused by host; settling to paused");
                    self.transition(PlayerState::Paused);
                }
            },

            EngineEvent::Ended => {
                if let Some(duration) = self.duration {
                    self.position = duration;
                }
                self.transition(PlayerState::Ended);
            }

            EngineEvent::FatalError { code } => {
                match PlaybackErrorKind::from_media_code(code) {
                    None => debug!("Ignoring abort-class engine error"),
                    Some(kind) => self.enter_error(kind),
                }
            }
        }
    }

    fn enter_error(&mut self, kind: PlaybackErrorKind) {
        warn!("Fatal playback error: {}", kind.title());
        self.transition(PlayerState::Errored(kind));
        // The error screen replaces every overlay and the transport.
        self.sampler = None;
        self.view.close_panel();
        self.view.clear_timers();
        self.view.pin_controls();
    }

    // ---- host events ------------------------------------------------------

    /// Apply one host input event
    pub fn handle_host_event(&mut self, event: HostEvent, now: Instant) {
        if self.torn_down {
            return;
        }

        match event {
            HostEvent::PointerActivity => self.reveal_controls(now, false),
            HostEvent::FullscreenChanged(fullscreen) => {
                self.fullscreen = fullscreen;
            }
            HostEvent::KeyPressed { combo, in_text_input } => {
                if in_text_input {
                    return;
                }
                if let Some(action) = self.shortcuts.resolve(combo) {
                    self.dispatch(action, now);
                }
            }
        }
    }

    fn dispatch(&mut self, action: PlayerAction, now: Instant) {
        if self.state.is_errored() && action != PlayerAction::Escape {
            return;
        }

        let seek_step = self.config.playback.seek_step_seconds;
        let volume_step = self.config.playback.volume_step;

        match action {
            PlayerAction::TogglePlay => self.toggle_play(now),
            PlayerAction::ToggleFullscreen => self.toggle_fullscreen(),
            PlayerAction::ToggleMute => self.toggle_mute(now),
            PlayerAction::ToggleSubtitles => self.toggle_subtitles(now),
            PlayerAction::SeekBackward => self.seek_by(-seek_step, now),
            PlayerAction::SeekForward => self.seek_by(seek_step, now),
            PlayerAction::VolumeUp => self.change_volume(volume_step, now),
            PlayerAction::VolumeDown => self.change_volume(-volume_step, now),
            PlayerAction::NextChapter => self.next_chapter(now),
            PlayerAction::PreviousChapter => self.previous_chapter(now),
            PlayerAction::SkipIntro => self.skip_intro(now),
            PlayerAction::Escape => self.escape(now),
        }
    }

    /// Escape cascade: chapter list, then settings, then fullscreen, then
    /// leaving the session; only the first applicable action fires
    fn escape(&mut self, _now: Instant) {
        match self.view.panel() {
            Some(OverlayPanel::Chapters) | Some(OverlayPanel::Settings) => {
                self.close_panel();
            }
            _ => {
                if self.fullscreen {
                    self.surface.exit_fullscreen();
                } else {
                    self.signals.push(SessionSignal::ExitRequested);
                }
            }
        }
    }

    // ---- transport --------------------------------------------------------

    pub fn toggle_play(&mut self, now: Instant) {
        if self.torn_down || !self.state.accepts_transport() {
            return;
        }

        match self.state {
            PlayerState::Playing | PlayerState::Buffering { was_playing: true } => {
                self.engine.request_pause();
                self.transition(PlayerState::Paused);
            }
            PlayerState::Paused | PlayerState::Buffering { was_playing: false } => {
                self.engine.request_play();
                self.transition(PlayerState::Playing);
            }
            PlayerState::Ended => {
                self.engine.seek_to(0.0);
                self.engine.request_play();
                self.transition(PlayerState::Playing);
            }
            _ => {}
        }
        self.reveal_controls(now, true);
    }

    /// Seek to an absolute position; out-of-range targets are clamped by
    /// the engine
    pub fn seek_to(&mut self, target: f64, now: Instant) {
        if self.torn_down || !self.state.accepts_transport() {
            return;
        }
        self.engine.seek_to(target);
        self.reveal_controls(now, true);
    }

    pub fn seek_by(&mut self, delta: f64, now: Instant) {
        self.seek_to(self.position + delta, now);
    }

    pub fn change_volume(&mut self, delta: f64, now: Instant) {
        if self.torn_down || self.state.is_errored() {
            return;
        }
        self.volume = (self.volume + delta).clamp(0.0, 1.0);
        // Muted is not a remembered toggle here: it tracks silence.
        self.muted = self.volume == 0.0;
        self.engine.set_volume(self.volume);
        self.engine.set_muted(self.muted);
        self.reveal_controls(now, true);
    }

    /// Toggle mute, forcing volume to 1.0 on unmute and 0.0 on mute
    ///
    /// The pre-mute level is intentionally not restored.
    pub fn toggle_mute(&mut self, now: Instant) {
        if self.torn_down || self.state.is_errored() {
            return;
        }
        if self.muted {
            self.muted = false;
            self.volume = 1.0;
        } else {
            self.muted = true;
            self.volume = 0.0;
        }
        self.engine.set_muted(self.muted);
        self.engine.set_volume(self.volume);
        self.reveal_controls(now, true);
    }

    pub fn toggle_fullscreen(&mut self) {
        if self.torn_down || self.state.is_errored() {
            return;
        }
        if self.fullscreen {
            self.surface.exit_fullscreen();
        } else {
            self.surface.request_fullscreen();
        }
    }

    pub fn set_playback_rate(&mut self, rate: f64) {
        if self.torn_down || self.state.is_errored() || rate <= 0.0 {
            return;
        }
        self.playback_rate = rate;
        self.engine.set_rate(rate);
    }

    /// Rates offered by the settings panel
    pub fn available_rates(&self) -> &[f64] {
        &self.config.playback.rate_choices
    }

    // ---- chapters and intro ----------------------------------------------

    pub fn next_chapter(&mut self, now: Instant) {
        if let Some(start) = self.chapters.next(self.position).map(|c| c.start_time) {
            self.seek_to(start, now);
        }
    }

    pub fn previous_chapter(&mut self, now: Instant) {
        let target = self.chapters.previous_target(self.position);
        self.seek_to(target, now);
    }

    pub fn skip_intro(&mut self, now: Instant) {
        if let Some(intro) = self.intro {
            if intro.contains(self.position) {
                self.seek_to(intro.end, now);
            }
        }
    }

    pub fn current_chapter(&self) -> Option<&Chapter> {
        self.chapters.current(self.position)
    }

    /// Chapter under an arbitrary probe time, for scrub-bar hover preview
    pub fn chapter_at(&self, time: f64) -> Option<&Chapter> {
        self.chapters.chapter_at(time)
    }

    pub fn chapters(&self) -> &[Chapter] {
        self.chapters.active()
    }

    /// Whether the skip-intro affordance is offered right now
    pub fn show_skip_intro(&self) -> bool {
        if self.state.is_errored() || !self.state.accepts_transport() {
            return false;
        }
        self.intro.map(|i| i.contains(self.position)).unwrap_or(false)
    }

    // ---- tracks and subtitles ---------------------------------------------

    /// Toggle subtitles: off picks the first available track, or prompts
    /// for an import when none exist; on switches off
    pub fn toggle_subtitles(&mut self, now: Instant) {
        if self.torn_down || self.state.is_errored() {
            return;
        }

        if self.subtitle_selection.is_off() {
            if let Some(first) = self.subtitle_tracks.first() {
                self.subtitle_selection = SubtitleSelection::Track(first.id);
            } else {
                self.surface.prompt_subtitle_import();
            }
        } else {
            self.subtitle_selection = SubtitleSelection::Off;
        }
        self.reveal_controls(now, true);
    }

    /// Parse and add an imported subtitle file, select it, and open the
    /// settings panel so the selection is visible
    pub fn import_subtitle_file(&mut self, label: &str, content: &str) -> TrackId {
        let cues = subtitles::parse(content);
        info!("Imported subtitle track \"{}\" with {} cues", label, cues.len());

        let track = SubtitleTrack::new(label, cues);
        let id = track.id;
        self.subtitle_tracks.push(track);
        self.subtitle_selection = SubtitleSelection::Track(id);
        self.open_panel(OverlayPanel::Settings);
        id
    }

    pub fn select_subtitle_track(&mut self, id: TrackId) {
        if self.subtitle_tracks.iter().any(|t| t.id == id) {
            self.subtitle_selection = SubtitleSelection::Track(id);
        }
    }

    pub fn subtitles_off(&mut self) {
        self.subtitle_selection = SubtitleSelection::Off;
    }

    pub fn select_audio_track(&mut self, id: TrackId) {
        if self.audio_tracks.iter().any(|t| t.id == id) {
            self.audio_selection = Some(id);
        }
    }

    /// Shift subtitle display timing; positive values delay cues
    pub fn adjust_subtitle_offset(&mut self, delta: f64) {
        self.subtitle_offset += delta;
    }

    /// Nudge the subtitle offset by whole steps of the configured size
    pub fn nudge_subtitle_offset(&mut self, steps: i32) {
        self.adjust_subtitle_offset(steps as f64 * self.config.subtitles.offset_step_seconds);
    }

    /// The cue text to overlay right now, if any
    ///
    /// Present only when a track is selected and a non-empty cue covers
    /// the offset-adjusted playback time; suppressed entirely in the error
    /// state.
    pub fn subtitle_overlay(&self) -> Option<&str> {
        if self.state.is_errored() {
            return None;
        }
        let SubtitleSelection::Track(id) = self.subtitle_selection else {
            return None;
        };
        self.subtitle_tracks
            .iter()
            .find(|t| t.id == id)
            .and_then(|t| t.cue_at(self.position, self.subtitle_offset))
            .map(|cue| cue.text.as_str())
            .filter(|text| !text.trim().is_empty())
    }

    // ---- overlays and diagnostics ------------------------------------------

    /// Open an overlay panel; panels are mutually exclusive, and opening
    /// the diagnostics panel starts the stats sampling loop
    pub fn open_panel(&mut self, panel: OverlayPanel) {
        if self.torn_down || self.state.is_errored() {
            return;
        }
        self.sampler = match panel {
            OverlayPanel::Diagnostics => Some(StatsSampler::new()),
            _ => None,
        };
        self.view.open_panel(panel);
    }

    pub fn close_panel(&mut self) {
        // Closing the diagnostics panel stops sampling; it must not keep
        // polling without a viewer.
        self.sampler = None;
        self.view.close_panel();
    }

    pub fn toggle_panel(&mut self, panel: OverlayPanel) {
        if self.view.panel() == Some(panel) {
            self.close_panel();
        } else {
            self.open_panel(panel);
        }
    }

    /// Host animation-frame callback; drives the diagnostics sampler
    pub fn on_animation_frame(&mut self, now_ms: f64) {
        if self.torn_down {
            return;
        }
        if let Some(sampler) = &mut self.sampler {
            sampler.sample(self.engine.as_ref(), self.surface.as_ref(), now_ms);
        }
    }

    /// Advance deadline-based timers (controls auto-hide)
    pub fn tick(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }
        self.view.tick(now);
    }

    fn reveal_controls(&mut self, now: Instant, interaction: bool) {
        let suppressed = self
            .view
            .panel()
            .map(|p| p.suppresses_auto_hide())
            .unwrap_or(false);

        let delay = if suppressed || !self.state.is_playing() {
            None
        } else if interaction {
            Some(Duration::from_millis(self.config.controls.interaction_hide_delay_ms))
        } else {
            Some(Duration::from_millis(self.config.controls.hide_delay_ms))
        };
        self.view.show_controls(now, delay);
    }

    // ---- teardown ----------------------------------------------------------

    /// Release the engine attachment and cancel all scheduled work
    ///
    /// Runs on every exit path; afterwards the controller ignores all
    /// events, callbacks, and intents.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        info!("Tearing down player session");
        self.engine.request_pause();
        self.engine.detach();
        self.sampler = None;
        self.view.clear_timers();
        self.torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // ---- accessors ---------------------------------------------------------

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn error(&self) -> Option<PlaybackErrorKind> {
        match self.state {
            PlayerState::Errored(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    pub fn panel(&self) -> Option<OverlayPanel> {
        self.view.panel()
    }

    pub fn controls_visible(&self) -> bool {
        self.view.controls_visible()
    }

    pub fn stats(&self) -> Option<&RealtimeStats> {
        self.sampler.as_ref().map(|s| s.stats())
    }

    pub fn audio_tracks(&self) -> &[AudioTrack] {
        &self.audio_tracks
    }

    pub fn selected_audio_track(&self) -> Option<TrackId> {
        self.audio_selection
    }

    pub fn subtitle_tracks(&self) -> &[SubtitleTrack] {
        &self.subtitle_tracks
    }

    pub fn subtitle_selection(&self) -> SubtitleSelection {
        self.subtitle_selection
    }

    pub fn subtitle_offset(&self) -> f64 {
        self.subtitle_offset
    }

    /// Take the signals accumulated since the last drain
    pub fn drain_signals(&mut self) -> Vec<SessionSignal> {
        std::mem::take(&mut self.signals)
    }
}
