//! Tests for client configuration loading.

use caro_client::ClientConfig;
use caro_game::GameMode;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
fn test_defaults() {
    let config = ClientConfig::default();
    assert_eq!(config.server_url(), "ws://localhost:8080/ws");
    assert_eq!(config.log_file(), &PathBuf::from("caro_client.log"));
    assert_eq!(*config.tick_ms(), 50);
    assert_eq!(*config.default_mode(), None);
}

#[test]
fn test_from_file_with_all_fields() {
    let file = config_file(
        r#"
server_url = "ws://games.example:9000/ws"
log_file = "/tmp/caro.log"
tick_ms = 100
default_mode = "vs_computer"
"#,
    );

    let config = ClientConfig::from_file(file.path()).expect("Config should load");
    assert_eq!(config.server_url(), "ws://games.example:9000/ws");
    assert_eq!(config.log_file(), &PathBuf::from("/tmp/caro.log"));
    assert_eq!(*config.tick_ms(), 100);
    assert_eq!(*config.default_mode(), Some(GameMode::VsComputer));
}

#[test]
fn test_partial_file_uses_defaults() {
    let file = config_file("default_mode = \"two_player\"\n");

    let config = ClientConfig::from_file(file.path()).expect("Config should load");
    assert_eq!(config.server_url(), "ws://localhost:8080/ws");
    assert_eq!(*config.tick_ms(), 50);
    assert_eq!(*config.default_mode(), Some(GameMode::TwoPlayer));
}

#[test]
fn test_invalid_files_are_rejected() {
    let zero_tick = config_file("tick_ms = 0\n");
    assert!(ClientConfig::from_file(zero_tick.path()).is_err());

    let bad_mode = config_file("default_mode = \"solitaire\"\n");
    let err = ClientConfig::from_file(bad_mode.path()).unwrap_err();
    assert!(err.message.contains("Failed to parse config"));

    let missing = ClientConfig::from_file("/nonexistent/caro.toml").unwrap_err();
    assert!(missing.message.contains("Failed to read config file"));
}

#[test]
fn test_overrides_replace_only_when_set() {
    let config = ClientConfig::default()
        .with_server_url(None)
        .with_default_mode(None)
        .with_log_file(None);
    assert_eq!(config, ClientConfig::default());

    let config = ClientConfig::default()
        .with_server_url(Some("ws://other:1/ws".to_string()))
        .with_default_mode(Some(GameMode::TwoPlayer))
        .with_log_file(Some(PathBuf::from("other.log")));
    assert_eq!(config.server_url(), "ws://other:1/ws");
    assert_eq!(*config.default_mode(), Some(GameMode::TwoPlayer));
    assert_eq!(config.log_file(), &PathBuf::from("other.log"));
}

#[test]
fn test_load_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = ClientConfig::load(&dir.path().join("absent.toml")).expect("Defaults");
    assert_eq!(*config.tick_ms(), 50);
}
