//! End-to-end player session tests
//!
//! These drive a full session over the simulated engine: loading,
//! transport, chapter and subtitle synchronization, error handling, and
//! teardown guarantees.

use crossbeam_channel::Receiver;
use prismplayer::engine::{sim_engine, EngineEvent, MediaErrorCode, SimHandle, SimScript};
use prismplayer::player::{
    HostEvent, Key, KeyCombo, OverlayPanel, PlaybackErrorKind, PlayerSession, PlayerState,
    SessionSignal,
};
use prismplayer::Config;
use prismplayer_integration_tests::{demo_video, RecordingSurface, SRT_FIXTURE};
use std::time::Instant;

fn begin_session(
    script: SimScript,
) -> (PlayerSession, SimHandle, Receiver<EngineEvent>) {
    let file = demo_video("demo");
    let (engine, handle, events) = sim_engine(script);
    let (surface, _, _, _) = RecordingSurface::new();

    let session = PlayerSession::begin(
        &file,
        Vec::new(),
        Box::new(engine),
        Box::new(surface),
        Config::default(),
    );
    (session, handle, events)
}

/// Deliver every pending engine event to the session, in order
fn drain(session: &mut PlayerSession, events: &Receiver<EngineEvent>) {
    while let Ok(event) = events.try_recv() {
        session.controller_mut().handle_engine_event(event);
    }
}

#[test]
fn full_session_reaches_playing_and_reports_progress() {
    let (mut session, handle, events) = begin_session(SimScript::default());
    assert_eq!(session.controller().state(), PlayerState::Loading);

    drain(&mut session, &events);
    assert_eq!(session.controller().state(), PlayerState::Playing);
    assert_eq!(session.controller().duration(), Some(120.0));
    assert_eq!(
        session.controller_mut().drain_signals(),
        vec![SessionSignal::PlaybackBegan]
    );

    handle.step(5000.0);
    drain(&mut session, &events);
    assert!((session.controller().position() - 5.0).abs() < 1e-6);
}

#[test]
fn chapter_filtering_respects_real_duration() {
    // Media is only 100s long; the chapter at 180 is metadata overrun
    let script = SimScript { duration: 100.0, ..SimScript::default() };
    let (mut session, _handle, events) = begin_session(script);
    drain(&mut session, &events);

    let starts: Vec<f64> = session
        .controller()
        .chapters()
        .iter()
        .map(|c| c.start_time)
        .collect();
    assert_eq!(starts, vec![0.0, 60.0]);
}

#[test]
fn subtitle_import_survives_toggle_round_trip() {
    let (mut session, handle, events) = begin_session(SimScript::default());
    drain(&mut session, &events);
    let now = Instant::now();

    session.controller_mut().import_subtitle_file("English", SRT_FIXTURE);
    session.controller_mut().seek_to(6.0, now);
    handle.step(0.0);
    drain(&mut session, &events);

    assert_eq!(
        session.controller().subtitle_overlay(),
        Some("Styled line\nand a second line")
    );

    // Off and back on: the same track is reselected with its cues intact
    session.controller_mut().toggle_subtitles(now);
    assert!(session.controller().subtitle_overlay().is_none());
    session.controller_mut().toggle_subtitles(now);
    assert_eq!(
        session.controller().subtitle_overlay(),
        Some("Styled line\nand a second line")
    );
}

#[test]
fn fatal_error_locks_session_until_exit() {
    let (mut session, handle, events) = begin_session(SimScript::default());
    drain(&mut session, &events);
    let now = Instant::now();

    handle.fail(MediaErrorCode::Network);
    drain(&mut session, &events);
    assert_eq!(session.controller().error(), Some(PlaybackErrorKind::Network));

    // Transport is dead
    session.controller_mut().toggle_play(now);
    session.controller_mut().seek_to(10.0, now);
    assert!(session.controller().state().is_errored());

    // Escape still leaves the session
    session.controller_mut().handle_host_event(
        HostEvent::KeyPressed {
            combo: KeyCombo::plain(Key::Escape),
            in_text_input: false,
        },
        now,
    );
    assert!(session
        .controller_mut()
        .drain_signals()
        .contains(&SessionSignal::ExitRequested));
}

#[test]
fn abort_error_is_invisible() {
    let (mut session, handle, events) = begin_session(SimScript::default());
    drain(&mut session, &events);

    handle.fail(MediaErrorCode::Aborted);
    drain(&mut session, &events);

    assert!(session.controller().error().is_none());
    assert_eq!(session.controller().state(), PlayerState::Playing);
}

#[test]
fn diagnostics_sampling_stops_on_teardown() {
    let (mut session, handle, events) = begin_session(SimScript::default());
    drain(&mut session, &events);

    session.controller_mut().open_panel(OverlayPanel::Diagnostics);
    handle.step(1000.0);
    drain(&mut session, &events);
    session.controller_mut().on_animation_frame(0.0);
    assert!(session.controller().stats().is_some());

    session.end();
    assert!(handle.is_detached());

    // Stale frame callbacks and engine events must not mutate anything
    session.controller_mut().on_animation_frame(5000.0);
    session
        .controller_mut()
        .handle_engine_event(EngineEvent::TimeUpdate { position: 99.0 });
    assert!(session.controller().stats().is_none());
    assert!((session.controller().position() - 1.0).abs() < 1e-6);
}

#[test]
fn dropping_session_detaches_engine() {
    let (session, handle, _events) = begin_session(SimScript::default());
    assert!(!handle.is_detached());
    drop(session);
    assert!(handle.is_detached());
}

#[test]
fn new_session_after_old_one_torn_down() {
    let (mut first, first_handle, first_events) = begin_session(SimScript::default());
    drain(&mut first, &first_events);
    drop(first);
    assert!(first_handle.is_detached());

    // A fresh session attaches cleanly and plays
    let (mut second, _handle, events) = begin_session(SimScript::default());
    drain(&mut second, &events);
    assert_eq!(second.controller().state(), PlayerState::Playing);
}
