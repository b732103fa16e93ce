use std::fs;
use std::path::PathBuf;

use flyght_motion::{MotionConfig, MotionError, TriggerDirection};

fn scratch_file(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("flyght-config-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_partial_file() {
    let path = scratch_file(
        "partial.toml",
        r#"
        [scroll]
        direction = "both"
        once = false

        [intro]
        default_ease = "power2.inOut"
        "#,
    );
    let config = MotionConfig::load(&path).unwrap();
    assert_eq!(config.scroll.direction, TriggerDirection::Both);
    assert!(!config.scroll.once);
    assert_eq!(config.scroll.trigger_band, 0.85);
    assert_eq!(config.intro.default_ease, "power2.inOut");
    assert_eq!(config.transition.liftoff_duration, 1.2);
}

#[test]
fn test_missing_file_names_the_path() {
    let path = std::env::temp_dir().join("flyght-definitely-missing.toml");
    let err = MotionConfig::load(&path).unwrap_err();
    assert!(matches!(err, MotionError::Io { .. }));
    assert!(err.to_string().contains("flyght-definitely-missing.toml"));
}

#[test]
fn test_saved_config_loads_back() {
    let mut config = MotionConfig::default();
    config.transition.destination = "/films/aurora".into();
    config.pointer.smoothing = 0.2;

    let path = scratch_file("saved.toml", &config.to_toml().unwrap());
    assert_eq!(MotionConfig::load(&path).unwrap(), config);
}

#[test]
fn test_out_of_range_band_is_rejected() {
    let err = MotionConfig::from_toml("[scroll]\ntrigger_band = 1.5\n").unwrap_err();
    assert!(matches!(err, MotionError::Config(_)));
}
