use std::fs;

use vcc::config::Config;

#[test]
fn load_from_dir_defaults_when_no_file_exists() {
    let dir = tempfile::tempdir().expect("tempdir");

    let config = Config::load_from_dir(dir.path());
    assert_eq!(config.remote.base_url, "http://localhost:8000");
    assert_eq!(config.sync.poll_interval_secs, 30);
}

#[test]
fn load_from_dir_defaults_on_invalid_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(".vcc.toml");
    fs::write(&path, "remote = 123").expect("write invalid config");

    let config = Config::load_from_dir(dir.path());
    assert_eq!(config.remote.base_url, "http://localhost:8000");
}

#[test]
fn load_rejects_an_inverted_backoff_range() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(".vcc.toml");
    let content = r#"
[sync]
reconnect_min_secs = 10
reconnect_max_secs = 2
"#;
    fs::write(&path, content.trim()).expect("write config");

    assert!(Config::load(&path).is_err());
}

#[test]
fn load_honors_overridden_sections() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(".vcc.toml");
    let content = r#"
[remote]
base_url = "http://10.0.0.5:9000"

[briefings]
page_size = 12
"#;
    fs::write(&path, content.trim()).expect("write config");

    let config = Config::load(&path).expect("load");
    assert_eq!(config.remote.base_url, "http://10.0.0.5:9000");
    assert_eq!(config.briefings.page_size, 12);
    assert_eq!(config.remote.ws_url().expect("ws"), "ws://10.0.0.5:9000/ws");
}
