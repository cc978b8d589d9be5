//! Config files on disk and how they feed the app.

use std::{env, fs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use starpick_engine::{
    DEFAULT_ROSTER_FILE, ROSTER_ENV, StarpickConfig, Timing, resolve_roster_path,
};
use tempfile::tempdir;

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn full_config_applies_everywhere() {
    let dir = tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[app]
ascii_only = true
reduced_motion = true

[roster]
path = "/srv/class/names.txt"
group_size = 3

[timing]
pause_ms = 1000
rise_ms = 1500
"#,
    );

    let config = StarpickConfig::load_from(&path).unwrap().unwrap();
    let options = config.ui_options();
    assert!(options.ascii_only);
    assert!(options.reduced_motion);
    assert!(!options.high_contrast);

    assert_eq!(config.group_size().get(), 3);

    let timing = config.timing();
    assert_eq!(timing.pause, Duration::from_millis(1000));
    assert_eq!(timing.rise, Duration::from_millis(1500));
    assert_eq!(timing.flight_speed, Timing::default().flight_speed);

    assert_eq!(
        resolve_roster_path(None, Some(&config)),
        PathBuf::from("/srv/class/names.txt")
    );
}

#[test]
fn cli_argument_beats_config_path() {
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), "[roster]\npath = \"/srv/names.txt\"\n");
    let config = StarpickConfig::load_from(&path).unwrap().unwrap();

    let chosen = resolve_roster_path(Some(Path::new("mine.txt")), Some(&config));
    assert_eq!(chosen, PathBuf::from("mine.txt"));
}

#[test]
fn empty_config_keeps_defaults() {
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), "");
    let config = StarpickConfig::load_from(&path).unwrap().unwrap();

    assert!(config.group_size().is_individual());
    assert_eq!(config.timing().pause, Timing::default().pause);
    assert_eq!(config.ui_options(), Default::default());
}

#[test]
fn out_of_range_group_size_is_parse_error() {
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), "[roster]\ngroup_size = 9\n");

    let err = StarpickConfig::load_from(&path).unwrap_err();
    assert_eq!(err.path(), &path);
}

#[test]
fn missing_config_means_defaults() {
    let dir = tempdir().unwrap();
    let config = StarpickConfig::load_from(&dir.path().join("absent.toml")).unwrap();
    assert!(config.is_none());

    // Nothing configured and no env override set by this test.
    if env::var_os(ROSTER_ENV).is_none() {
        assert_eq!(
            resolve_roster_path(None, None),
            PathBuf::from(DEFAULT_ROSTER_FILE)
        );
    }
}
