use std::env;
use std::fs;

use serial_test::serial;
use tempfile::TempDir;

use super::settings::Settings;
use super::{load_config, load_config_from};

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.broker.input_capacity, 100);
    assert_eq!(settings.broker.inbox_capacity, 16);
    assert!(settings.history.enabled);
    assert_eq!(settings.history.participant_id, "history");
    assert_eq!(settings.history.capacity, 100);
    assert_eq!(settings.logging.level, "info");
    assert!(settings.validate().is_ok());
}

#[test]
fn test_validate_rejects_zero_capacity() {
    let mut settings = Settings::default();
    settings.broker.input_capacity = 0;
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.history.participant_id = "  ".to_string();
    assert!(settings.validate().is_err());
}

#[test]
#[serial]
fn test_missing_file_yields_defaults() {
    let tmp = TempDir::new().expect("create tempdir");
    let base = tmp.path().join("absent");

    let cfg = load_config_from(base.to_str().unwrap()).expect("load_config failed");
    assert_eq!(cfg, Settings::default());
}

#[test]
#[serial]
fn load_config_from_file_overrides_defaults() {
    // Create a temporary directory and set it as current dir so load_config
    // will pick up config/default.toml from there.
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    fs::create_dir_all("config").expect("create config dir");
    let toml = r#"
        [broker]
        input_capacity = 8

        [history]
        enabled = false
        capacity = 5

        [logging]
        level = "debug"
    "#;
    fs::write("config/default.toml", toml).expect("write config file");

    let cfg = load_config();

    // restore cwd before asserting so a failure does not leak into other tests
    env::set_current_dir(orig).expect("restore cwd");

    let cfg = cfg.expect("load_config failed");
    assert_eq!(cfg.broker.input_capacity, 8);
    assert_eq!(cfg.broker.inbox_capacity, 16);
    assert!(!cfg.history.enabled);
    assert_eq!(cfg.history.capacity, 5);
    assert_eq!(cfg.history.participant_id, "history");
    assert_eq!(cfg.logging.level, "debug");
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let tmp = TempDir::new().expect("create tempdir");
    let base = tmp.path().join("chatcore");
    fs::write(
        tmp.path().join("chatcore.toml"),
        "[broker]\ninput_capacity = 8\n",
    )
    .expect("write config file");

    let cfg = temp_env::with_vars(
        [
            ("CHATCORE_BROKER__INPUT_CAPACITY", Some("256")),
            ("CHATCORE_HISTORY__PARTICIPANT_ID", Some("archive")),
        ],
        || load_config_from(base.to_str().unwrap()),
    )
    .expect("load_config failed");

    assert_eq!(cfg.broker.input_capacity, 256);
    assert_eq!(cfg.history.participant_id, "archive");
}

#[test]
#[serial]
fn test_invalid_file_value_is_rejected() {
    let tmp = TempDir::new().expect("create tempdir");
    let base = tmp.path().join("chatcore");
    fs::write(
        tmp.path().join("chatcore.toml"),
        "[history]\ncapacity = 0\n",
    )
    .expect("write config file");

    let err = load_config_from(base.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("history.capacity"));
}
