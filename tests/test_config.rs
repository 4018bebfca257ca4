use std::collections::HashMap;
use std::io::Write;

use tcphttp::config::Config;

fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_config_default_port() {
    let mut cfg = Config::default();
    cfg.apply_env(env(&[])).unwrap();
    assert_eq!(cfg.server.port, 42069);
}

#[test]
fn test_config_port_from_env() {
    let mut cfg = Config::default();
    cfg.apply_env(env(&[("PORT", "3000"), ("LOG_LEVEL", "debug")]))
        .unwrap();

    assert_eq!(cfg.server.port, 3000);
    assert_eq!(cfg.level().unwrap(), tracing::Level::DEBUG);
}

#[test]
fn test_config_bad_port_from_env() {
    let mut cfg = Config::default();
    assert!(cfg.apply_env(env(&[("PORT", "not-a-port")])).is_err());
}

#[test]
fn test_config_from_yaml() {
    let cfg = Config::from_yaml(
        "server:\n  port: 8000\nlog_level: warn\nhandlers:\n  upstream_url: http://127.0.0.1:9000\n  video_path: /tmp/clip.mp4\n  chunk_size: 4096\n",
    )
    .unwrap();

    assert_eq!(cfg.server.port, 8000);
    assert_eq!(cfg.log_level, "warn");
    assert_eq!(cfg.handlers.upstream_url, "http://127.0.0.1:9000");
    assert_eq!(cfg.handlers.video_path.to_str(), Some("/tmp/clip.mp4"));
    assert_eq!(cfg.handlers.chunk_size, 4096);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_config_validation() {
    let mut cfg = Config::default();
    cfg.handlers.chunk_size = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.handlers.upstream_url = "not a url".to_string();
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.log_level = "loud".to_string();
    assert!(cfg.validate().is_err());
}

#[test]
fn test_config_load_from_file() {
    let path = std::env::temp_dir().join(format!("tcphttp-config-{}.yaml", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "handlers:\n  chunk_size: 16").unwrap();
    drop(file);

    let cfg = Config::load(Some(&path));
    std::fs::remove_file(&path).unwrap();

    assert_eq!(cfg.unwrap().handlers.chunk_size, 16);
}

#[test]
fn test_config_load_missing_file() {
    let path = std::env::temp_dir().join("tcphttp-does-not-exist.yaml");
    assert!(Config::load(Some(&path)).is_err());
}
