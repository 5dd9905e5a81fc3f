//! Command-routing tests against a mocked media engine
//!
//! Every engine mutation must flow through the controller; these verify
//! the exact commands issued across the attach / autoplay / teardown path.

use mockall::predicate::eq;
use prismplayer::engine::EngineEvent;
use prismplayer::player::PlayerState;
use prismplayer::{Config, PlaybackController};
use prismplayer_integration_tests::{demo_video, MockEngine, RecordingSurface};

#[test]
fn attach_autoplay_and_teardown_issue_expected_commands() {
    let file = demo_video("routed");
    let mut engine = MockEngine::new();

    engine
        .expect_set_volume()
        .with(eq(1.0))
        .times(1)
        .return_const(());
    engine
        .expect_set_muted()
        .with(eq(false))
        .times(1)
        .return_const(());
    engine
        .expect_load()
        .withf(|uri| uri == "file:///videos/routed.mkv")
        .times(1)
        .return_const(());
    engine.expect_request_play().times(1).return_const(());
    engine.expect_request_pause().times(1).return_const(());
    engine.expect_detach().times(1).return_const(());

    let (surface, _, _, _) = RecordingSurface::new();
    let mut controller = PlaybackController::new(
        &file,
        Vec::new(),
        Box::new(engine),
        Box::new(surface),
        Config::default(),
    );

    controller.start();
    assert_eq!(controller.state(), PlayerState::Loading);

    // Metadata arrival triggers exactly one autoplay request
    controller.handle_engine_event(EngineEvent::MetadataLoaded {
        duration: 120.0,
        width: 1920,
        height: 1080,
    });
    assert_eq!(controller.state(), PlayerState::Playing);

    // Teardown pauses and detaches, once, even if called twice
    controller.teardown();
    controller.teardown();
}

#[test]
fn no_autoplay_requests_nothing_and_settles_paused() {
    let file = demo_video("paused");
    let mut engine = MockEngine::new();

    engine.expect_set_volume().return_const(());
    engine.expect_set_muted().return_const(());
    engine.expect_load().return_const(());
    // No request_play expectation: autoplay is off
    engine.expect_request_pause().return_const(());
    engine.expect_detach().return_const(());

    let mut config = Config::default();
    config.playback.autoplay = false;

    let (surface, _, _, _) = RecordingSurface::new();
    let mut controller = PlaybackController::new(
        &file,
        Vec::new(),
        Box::new(engine),
        Box::new(surface),
        config,
    );

    controller.start();
    controller.handle_engine_event(EngineEvent::MetadataLoaded {
        duration: 120.0,
        width: 1920,
        height: 1080,
    });
    assert_eq!(controller.state(), PlayerState::Paused);

    controller.teardown();
}

#[test]
fn seek_passes_raw_target_to_engine() {
    let file = demo_video("seeker");
    let mut engine = MockEngine::new();

    engine.expect_set_volume().return_const(());
    engine.expect_set_muted().return_const(());
    engine.expect_load().return_const(());
    engine.expect_request_play().return_const(());
    // Clamping is the engine's job: the out-of-range target goes through
    engine
        .expect_seek_to()
        .with(eq(500.0))
        .times(1)
        .return_const(());
    engine.expect_request_pause().return_const(());
    engine.expect_detach().return_const(());

    let (surface, _, _, _) = RecordingSurface::new();
    let mut controller = PlaybackController::new(
        &file,
        Vec::new(),
        Box::new(engine),
        Box::new(surface),
        Config::default(),
    );

    controller.start();
    controller.handle_engine_event(EngineEvent::MetadataLoaded {
        duration: 120.0,
        width: 1920,
        height: 1080,
    });
    controller.seek_to(500.0, std::time::Instant::now());

    controller.teardown();
}
