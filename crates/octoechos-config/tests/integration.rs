//! Integration tests for octoechos-config.
//!
//! These tests go through real files: save, load, discover and map the
//! result onto the pitch and engine types.

use octoechos_config::{ConfigError, SessionConfig, find_session};
use octoechos_core::{OctaveShift, to_frequency};
use octoechos_synth::{EngineMode, Waveform};
use tempfile::TempDir;

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("session.toml");

    let session = SessionConfig {
        glas: 3,
        octave_shift: -1,
        bpm: 90,
        waveform: "sine".into(),
        ..SessionConfig::default()
    };
    session.save(&path).unwrap();
    assert!(path.is_file());

    let loaded = SessionConfig::load(&path).unwrap();
    assert_eq!(loaded, session);
    assert_eq!(loaded.glas().id, 3);
    assert_eq!(loaded.waveform(), Waveform::Sine);
    assert_eq!(loaded.tempo().get(), 90);
}

#[test]
fn test_missing_file_is_read_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    let err = SessionConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));

    // An explicit path is never swapped for the user default.
    assert_eq!(find_session(Some(&path)), Some(path.clone()));
    assert!(matches!(
        SessionConfig::discover(Some(&path)),
        Err(ConfigError::ReadFile { .. })
    ));
}

#[test]
fn test_hand_written_file_drives_pitch() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.toml");
    std::fs::write(
        &path,
        r#"
glas = 1
base_frequency = 293.66
octave_shift = 1

[engine]
mode = "monophonic"
"#,
    )
    .unwrap();

    let mut session = SessionConfig::load(&path).unwrap();
    assert!(session.normalize().is_empty());
    assert_eq!(session.octave_shift(), OctaveShift::new(1));
    assert_eq!(session.engine_settings().mode, EngineMode::Monophonic);

    let keyboard = session.keyboard();
    let tonic = keyboard.tonic();
    let hz = to_frequency(tonic, session.base_frequency(), session.octave_shift());
    assert!((hz - 587.32).abs() < 1e-9);
}

#[test]
fn test_out_of_range_file_is_clamped_not_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.toml");
    std::fs::write(&path, "glas = 0\nbpm = 999\noctave_shift = 4\n").unwrap();

    let mut session = SessionConfig::load(&path).unwrap();
    let adjustments = session.normalize();
    assert_eq!(adjustments.len(), 3);
    assert_eq!(session.glas, 1);
    assert_eq!(session.bpm, 240);
    assert_eq!(session.octave_shift, 2);
    for adj in &adjustments {
        assert!(adj.to_string().contains(" -> "));
    }
}

#[test]
fn test_malformed_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.toml");
    std::fs::write(&path, "glas = [1, 2\n").unwrap();
    assert!(matches!(
        SessionConfig::load(&path),
        Err(ConfigError::TomlParse(_))
    ));
}

#[test]
fn test_out_of_type_values_are_clamped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.toml");
    std::fs::write(&path, "glas = 300\nbpm = -1\n\n[audio]\nsample_rate = -48000\n").unwrap();

    let mut session = SessionConfig::load(&path).unwrap();
    let fields: Vec<_> = session.normalize().iter().map(|a| a.field).collect();
    assert_eq!(fields, ["glas", "bpm", "audio.sample_rate"]);
    assert_eq!(session.glas().id, 1);
    assert_eq!(session.tempo().get(), 30);
    assert_eq!(session.audio.sample_rate(), 8000);
}
