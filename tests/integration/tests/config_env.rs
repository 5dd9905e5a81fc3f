//! Configuration layering tests
//!
//! Environment overrides mutate process state, so these run serially.

use prismplayer::Config;
use serial_test::serial;

fn clear_env() {
    for key in [
        "PRISMPLAYER_VOLUME",
        "PRISMPLAYER_SEEK_STEP",
        "PRISMPLAYER_AUTOPLAY",
        "PRISMPLAYER_LOG_LEVEL",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn env_overrides_apply_on_load() {
    clear_env();
    std::env::set_var("PRISMPLAYER_VOLUME", "0.25");
    std::env::set_var("PRISMPLAYER_SEEK_STEP", "5");
    std::env::set_var("PRISMPLAYER_AUTOPLAY", "false");

    let config = Config::load().expect("config should load");
    assert_eq!(config.playback.default_volume, 0.25);
    assert_eq!(config.playback.seek_step_seconds, 5.0);
    assert!(!config.playback.autoplay);

    clear_env();
}

#[test]
#[serial]
fn invalid_env_value_is_rejected() {
    clear_env();
    std::env::set_var("PRISMPLAYER_VOLUME", "loud");

    assert!(Config::load().is_err());

    clear_env();
}

#[test]
#[serial]
fn out_of_range_env_volume_fails_validation() {
    clear_env();
    std::env::set_var("PRISMPLAYER_VOLUME", "2.5");

    assert!(Config::load().is_err());

    clear_env();
}

#[test]
#[serial]
fn config_file_round_trip() -> anyhow::Result<()> {
    clear_env();

    let mut config = Config::default();
    config.playback.seek_step_seconds = 15.0;
    config.controls.hide_delay_ms = 4000;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.toml");
    std::fs::write(&path, toml::to_string_pretty(&config)?)?;

    let mut loaded = Config::default();
    loaded.merge_from_file(&path)?;
    assert_eq!(loaded.playback.seek_step_seconds, 15.0);
    assert_eq!(loaded.controls.hide_delay_ms, 4000);

    Ok(())
}
