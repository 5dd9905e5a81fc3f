use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use std::path::PathBuf;
use std::time::Instant;

use prismplayer::engine::{sim_engine, PlayerSurface, SimScript};
use prismplayer::library::Library;
use prismplayer::media::{is_video_candidate, Chapter, IntroWindow, VideoMetadata};
use prismplayer::player::{
    HostEvent, Key, KeyCombo, OverlayPanel, PlayerSession, SessionSignal,
};
use prismplayer::Config;

/// PrismPlayer - a media library and playback front-end core
///
/// Runs a headless demo session against a simulated media engine so the
/// player core can be exercised end to end without a display.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Media files to seed the library with
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Set initial volume (0-100)
    #[arg(short, long, value_name = "VOLUME", default_value = "100")]
    volume: u8,

    /// Do not start playback automatically
    #[arg(long)]
    no_autoplay: bool,

    /// Simulated media duration in seconds
    #[arg(long, default_value = "120")]
    duration: f64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

/// Headless stand-in for the host surface around the video element
struct HeadlessSurface;

impl PlayerSurface for HeadlessSurface {
    fn request_fullscreen(&mut self) {
        info!("Fullscreen requested");
    }

    fn exit_fullscreen(&mut self) {
        info!("Fullscreen exited");
    }

    fn display_size(&self) -> (u32, u32) {
        (1280, 720)
    }

    fn viewport_size(&self) -> (u32, u32) {
        (1280, 720)
    }

    fn prompt_subtitle_import(&mut self) {
        info!("Subtitle import prompt requested");
    }
}

/// Demo metadata for seeded files; real deployments derive this upstream
fn demo_metadata() -> VideoMetadata {
    VideoMetadata {
        duration_label: "2:00".to_string(),
        resolution_label: "1080p".to_string(),
        video_codec: "H.264".to_string(),
        audio_codec: "AAC".to_string(),
        container: "Matroska".to_string(),
        intro: Some(IntroWindow { start: 5.0, end: 30.0 }),
        chapters: vec![
            Chapter::new("Opening", 0.0),
            Chapter::new("Act One", 30.0),
            Chapter::new("Act Two", 75.0),
        ],
        ..VideoMetadata::default()
    }
}

const DEMO_SRT: &str = "\
1
00:00:12,000 --> 00:00:15,500
Welcome to the demo session.

2
00:00:16,000 --> 00:00:19,000
Subtitles are parsed and time-shifted here.
";

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    info!("Starting PrismPlayer v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Falling back to default configuration: {}", e);
        Config::default()
    });
    config.playback.default_volume = (args.volume.min(100) as f64) / 100.0;
    config.playback.autoplay = !args.no_autoplay;

    // Seed the library from the command line
    let mut library = Library::new();
    for path in &args.files {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if !is_video_candidate(name, None) {
            warn!("Skipping non-media file {:?}", path);
            continue;
        }
        match library.import_path(path, demo_metadata()) {
            Ok(id) => info!("Imported {:?} as {}", path, id),
            Err(e) => warn!("Failed to import {:?}: {}", path, e),
        }
    }
    if library.is_empty() {
        // Nothing importable on disk: fabricate one entry so the demo
        // session still runs.
        library.import(prismplayer::media::VideoFile::new(
            PathBuf::from("/demo/sample.mkv"),
            "sample",
            "file:///demo/sample.mkv",
            0,
            demo_metadata(),
        ));
    }

    let first = library.ordered()[0].clone();
    info!("Entering player with \"{}\"", first.display_name);

    let script = SimScript { duration: args.duration, ..SimScript::default() };
    let (engine, driver, engine_events) = sim_engine(script);
    let surface = HeadlessSurface;

    let mut session = PlayerSession::begin(
        &first,
        Vec::new(),
        Box::new(engine),
        Box::new(surface),
        config,
    );

    // Scripted interaction: open diagnostics, import subtitles, seek and
    // navigate chapters, then leave.
    let frame_ms = 1000.0 / 60.0;
    let start = Instant::now();
    let mut now_ms = 0.0;

    session.controller_mut().import_subtitle_file("English (demo)", DEMO_SRT);
    session.controller_mut().close_panel();
    session.controller_mut().open_panel(OverlayPanel::Diagnostics);

    for frame in 0u32..600 {
        driver.step(frame_ms);
        now_ms += frame_ms;
        let now = start + std::time::Duration::from_millis(now_ms as u64);

        while let Ok(event) = engine_events.try_recv() {
            session.controller_mut().handle_engine_event(event);
        }
        session.controller_mut().on_animation_frame(now_ms);
        session.controller_mut().tick(now);

        // Scripted keys: skip the intro once inside its window (~5.5s),
        // jump a chapter, then pause and resume.
        let combo = match frame {
            330 => Some(KeyCombo::char('s')),
            420 => Some(KeyCombo::shifted_char('n')),
            480 | 540 => Some(KeyCombo::plain(Key::Space)),
            _ => None,
        };
        if let Some(combo) = combo {
            session.controller_mut().handle_host_event(
                HostEvent::KeyPressed { combo, in_text_input: false },
                now,
            );
        }

        for signal in session.controller_mut().drain_signals() {
            match signal {
                SessionSignal::PlaybackBegan => {
                    library.mark_played(session.video_id(), std::time::SystemTime::now());
                    info!("Playback began");
                }
                SessionSignal::ExitRequested => info!("Exit requested"),
            }
        }

        if let Some(cue) = session.controller_mut().subtitle_overlay() {
            log::debug!("Subtitle: {}", cue);
        }
    }

    let controller = session.controller();
    info!(
        "Session state: {} at {:.1}s of {:.1}s",
        controller.state(),
        controller.position(),
        controller.duration().unwrap_or(0.0)
    );
    if let Some(stats) = controller.stats() {
        println!("{}", serde_json::to_string_pretty(stats)?);
    }

    drop(session);
    info!("Session torn down; exiting");

    Ok(())
}
