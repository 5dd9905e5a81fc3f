//! Deterministic simulated media engine
//!
//! Drives the player core without decoding anything: a script fixes the
//! media's duration, dimensions, and failure behavior, and a handle lets
//! the demo binary and the tests advance simulated time, starve the
//! buffer, or inject fatal errors. Events flow to the session through a
//! channel in the exact order they were produced.

use crate::engine::{
    EngineEvent, MediaEngine, MediaErrorCode, PlaybackQuality, PlayFailure, TimeRange,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

/// How the simulated engine reports frame statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityReporting {
    /// The quality capability is present
    #[default]
    Modern,
    /// Only the legacy frame counters exist
    Legacy,
    /// No frame statistics at all
    None,
}

/// Scripted behavior for a simulated media source
#[derive(Debug, Clone)]
pub struct SimScript {
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    /// Frames decoded per second of playback
    pub fps: f64,
    /// Reject play requests as an autoplay-policy refusal
    pub block_autoplay: bool,
    /// Reject play requests as aborted (teardown race)
    pub abort_play: bool,
    /// Hold back the metadata event until the handle delivers it
    pub defer_metadata: bool,
    pub quality_reporting: QualityReporting,
}

impl Default for SimScript {
    fn default() -> Self {
        Self {
            duration: 120.0,
            width: 1920,
            height: 1080,
            fps: 30.0,
            block_autoplay: false,
            abort_play: false,
            defer_metadata: false,
            quality_reporting: QualityReporting::Modern,
        }
    }
}

#[derive(Debug)]
struct SimState {
    script: SimScript,
    uri: Option<String>,
    position: f64,
    duration: Option<f64>,
    playing: bool,
    stalled: bool,
    detached: bool,
    volume: f64,
    muted: bool,
    rate: f64,
    buffered: Vec<TimeRange>,
    decoded_acc: f64,
    dropped_frames: u64,
}

impl SimState {
    fn decoded_frames(&self) -> u64 {
        self.decoded_acc as u64
    }
}

/// The engine half: owned by the player session
pub struct SimEngine {
    state: Rc<RefCell<SimState>>,
    events: Sender<EngineEvent>,
}

/// The driver half: advances simulated time and injects host behavior
pub struct SimHandle {
    state: Rc<RefCell<SimState>>,
    events: Sender<EngineEvent>,
}

/// Build a simulated engine, its driver handle, and the event stream the
/// session should drain
pub fn sim_engine(script: SimScript) -> (SimEngine, SimHandle, Receiver<EngineEvent>) {
    let (tx, rx) = unbounded();
    let state = Rc::new(RefCell::new(SimState {
        script,
        uri: None,
        position: 0.0,
        duration: None,
        playing: false,
        stalled: false,
        detached: false,
        volume: 1.0,
        muted: false,
        rate: 1.0,
        buffered: Vec::new(),
        decoded_acc: 0.0,
        dropped_frames: 0,
    }));

    let engine = SimEngine {
        state: Rc::clone(&state),
        events: tx.clone(),
    };
    let handle = SimHandle { state, events: tx };
    (engine, handle, rx)
}

impl MediaEngine for SimEngine {
    fn load(&mut self, uri: &str) {
        let mut state = self.state.borrow_mut();
        debug!("Sim engine loading {}", uri);
        state.uri = Some(uri.to_string());
        state.position = 0.0;

        if !state.script.defer_metadata {
            let (duration, width, height) = (
                state.script.duration,
                state.script.width,
                state.script.height,
            );
            state.duration = Some(duration);
            state.buffered = vec![TimeRange { start: 0.0, end: duration }];
            drop(state);
            let _ = self.events.send(EngineEvent::MetadataLoaded { duration, width, height });
        }
    }

    fn request_play(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.detached || state.script.abort_play {
            drop(state);
            let _ = self.events.send(EngineEvent::PlayRejected {
                failure: PlayFailure::Aborted,
            });
            return;
        }
        if state.script.block_autoplay {
            drop(state);
            let _ = self.events.send(EngineEvent::PlayRejected {
                failure: PlayFailure::NotAllowed,
            });
            return;
        }
        state.playing = true;
        drop(state);
        let _ = self.events.send(EngineEvent::Playing);
    }

    fn request_pause(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.detached {
            return;
        }
        state.playing = false;
        drop(state);
        let _ = self.events.send(EngineEvent::Paused);
    }

    fn seek_to(&mut self, position: f64) {
        let mut state = self.state.borrow_mut();
        if state.detached {
            return;
        }
        let max = state.duration.unwrap_or(0.0);
        state.position = position.clamp(0.0, max);
        let clamped = state.position;
        drop(state);
        let _ = self.events.send(EngineEvent::TimeUpdate { position: clamped });
    }

    fn set_volume(&mut self, volume: f64) {
        self.state.borrow_mut().volume = volume.clamp(0.0, 1.0);
    }

    fn set_muted(&mut self, muted: bool) {
        self.state.borrow_mut().muted = muted;
    }

    fn set_rate(&mut self, rate: f64) {
        self.state.borrow_mut().rate = rate;
    }

    fn position(&self) -> f64 {
        self.state.borrow().position
    }

    fn duration(&self) -> Option<f64> {
        self.state.borrow().duration
    }

    fn buffered(&self) -> Vec<TimeRange> {
        self.state.borrow().buffered.clone()
    }

    fn playback_quality(&self) -> Option<PlaybackQuality> {
        let state = self.state.borrow();
        match state.script.quality_reporting {
            QualityReporting::Modern => Some(PlaybackQuality {
                decoded_frames: state.decoded_frames(),
                dropped_frames: state.dropped_frames,
            }),
            _ => None,
        }
    }

    fn fallback_frame_counters(&self) -> Option<(u64, u64)> {
        let state = self.state.borrow();
        match state.script.quality_reporting {
            QualityReporting::Legacy => Some((state.decoded_frames(), state.dropped_frames)),
            _ => None,
        }
    }

    fn rate(&self) -> f64 {
        self.state.borrow().rate
    }

    fn video_size(&self) -> (u32, u32) {
        let state = self.state.borrow();
        (state.script.width, state.script.height)
    }

    fn is_paused(&self) -> bool {
        !self.state.borrow().playing
    }

    fn detach(&mut self) {
        let mut state = self.state.borrow_mut();
        debug!("Sim engine detached");
        state.playing = false;
        state.detached = true;
        state.uri = None;
    }
}

impl SimHandle {
    /// Advance simulated time by `dt_ms` of wall clock
    ///
    /// While playing and not stalled, the position advances by the
    /// playback rate and decoded frames accrue at the scripted fps.
    pub fn step(&self, dt_ms: f64) {
        let mut state = self.state.borrow_mut();
        if !state.playing || state.stalled || state.detached {
            return;
        }

        let dt = dt_ms / 1000.0;
        state.position += dt * state.rate;
        state.decoded_acc += dt * state.script.fps;

        let duration = state.duration.unwrap_or(f64::MAX);
        if state.position >= duration {
            state.position = duration;
            state.playing = false;
            drop(state);
            let _ = self.events.send(EngineEvent::Ended);
        } else {
            let position = state.position;
            drop(state);
            let _ = self.events.send(EngineEvent::TimeUpdate { position });
        }
    }

    /// Stall playback waiting for data
    pub fn starve(&self) {
        self.state.borrow_mut().stalled = true;
        let _ = self.events.send(EngineEvent::Waiting);
    }

    /// End a stall; resumes motion if the engine was playing
    pub fn recover(&self) {
        let mut state = self.state.borrow_mut();
        state.stalled = false;
        let playing = state.playing;
        drop(state);
        if playing {
            let _ = self.events.send(EngineEvent::Playing);
        } else {
            let _ = self.events.send(EngineEvent::DataReady);
        }
    }

    /// Inject a fatal error with the given host code
    pub fn fail(&self, code: MediaErrorCode) {
        self.state.borrow_mut().playing = false;
        let _ = self.events.send(EngineEvent::FatalError { code });
    }

    /// Deliver metadata held back by `defer_metadata`
    pub fn deliver_metadata(&self) {
        let mut state = self.state.borrow_mut();
        let (duration, width, height) = (
            state.script.duration,
            state.script.width,
            state.script.height,
        );
        state.duration = Some(duration);
        state.buffered = vec![TimeRange { start: 0.0, end: duration }];
        drop(state);
        let _ = self.events.send(EngineEvent::MetadataLoaded { duration, width, height });
    }

    /// Stop refusing play requests
    pub fn allow_play(&self) {
        self.state.borrow_mut().script.block_autoplay = false;
    }

    /// Replace the buffered ranges reported to the stats sampler
    pub fn set_buffered(&self, ranges: Vec<TimeRange>) {
        self.state.borrow_mut().buffered = ranges;
    }

    /// Record dropped frames
    pub fn drop_frames(&self, count: u64) {
        self.state.borrow_mut().dropped_frames += count;
    }

    /// Directly accrue decoded frames, for statistics tests
    pub fn add_decoded(&self, count: u64) {
        self.state.borrow_mut().decoded_acc += count as f64;
    }

    pub fn position(&self) -> f64 {
        self.state.borrow().position
    }

    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    pub fn is_detached(&self) -> bool {
        self.state.borrow().detached
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_reports_metadata() {
        let (mut engine, _handle, events) = sim_engine(SimScript::default());
        engine.load("file:///demo.mkv");

        match events.try_recv() {
            Ok(EngineEvent::MetadataLoaded { duration, width, height }) => {
                assert_eq!(duration, 120.0);
                assert_eq!((width, height), (1920, 1080));
            }
            other => panic!("Expected metadata event, got {:?}", other),
        }
        assert_eq!(engine.duration(), Some(120.0));
    }

    #[test]
    fn test_step_advances_position_and_frames() {
        let (mut engine, handle, events) = sim_engine(SimScript::default());
        engine.load("file:///demo.mkv");
        engine.request_play();
        while events.try_recv().is_ok() {}

        handle.step(1000.0);
        assert!((engine.position() - 1.0).abs() < 1e-9);
        assert_eq!(engine.playback_quality().unwrap().decoded_frames, 30);

        engine.set_rate(2.0);
        handle.step(1000.0);
        assert!((engine.position() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_playback_runs_to_completion() {
        let script = SimScript { duration: 2.0, ..SimScript::default() };
        let (mut engine, handle, events) = sim_engine(script);
        engine.load("file:///short.mkv");
        engine.request_play();
        while events.try_recv().is_ok() {}

        handle.step(2500.0);
        assert_eq!(events.try_recv(), Ok(EngineEvent::Ended));
        assert!(engine.is_paused());
        assert_eq!(engine.position(), 2.0);
    }

    #[test]
    fn test_autoplay_block_and_abort() {
        let script = SimScript { block_autoplay: true, ..SimScript::default() };
        let (mut engine, _handle, events) = sim_engine(script);
        engine.load("file:///demo.mkv");
        let _ = events.try_recv();

        engine.request_play();
        assert_eq!(
            events.try_recv(),
            Ok(EngineEvent::PlayRejected { failure: PlayFailure::NotAllowed })
        );

        let script = SimScript { abort_play: true, ..SimScript::default() };
        let (mut engine, _handle, events) = sim_engine(script);
        engine.load("file:///demo.mkv");
        let _ = events.try_recv();

        engine.request_play();
        assert_eq!(
            events.try_recv(),
            Ok(EngineEvent::PlayRejected { failure: PlayFailure::Aborted })
        );
    }

    #[test]
    fn test_seek_clamps_to_duration() {
        let (mut engine, _handle, events) = sim_engine(SimScript::default());
        engine.load("file:///demo.mkv");
        while events.try_recv().is_ok() {}

        engine.seek_to(500.0);
        assert_eq!(engine.position(), 120.0);

        engine.seek_to(-5.0);
        assert_eq!(engine.position(), 0.0);
    }

    #[test]
    fn test_detached_engine_ignores_commands() {
        let (mut engine, handle, events) = sim_engine(SimScript::default());
        engine.load("file:///demo.mkv");
        engine.request_play();
        while events.try_recv().is_ok() {}

        engine.detach();
        assert!(handle.is_detached());

        engine.seek_to(10.0);
        assert_eq!(engine.position(), 0.0);
        handle.step(1000.0);
        assert!(events.try_recv().is_err());
    }
}
