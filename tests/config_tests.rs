use restmux::config::{MuxConfig, ServiceConfig};
use restmux::logging::LogFormat;
use restmux::mux::Mux;
use std::io::Write;
use tempfile::Builder;

fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_yaml() {
    let file = write_config(
        ".yaml",
        r#"
mux:
  root: /api/v2/
logging:
  level: debug
  format: pretty
  target_filter: "restmux::mux=trace"
  include_location: true
"#,
    );

    let config = ServiceConfig::from_file(file.path()).unwrap();
    assert_eq!(config.mux.root, "/api/v2/");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert_eq!(
        config.logging.target_filter.as_deref(),
        Some("restmux::mux=trace")
    );
    assert!(config.logging.include_location);
    assert!(!config.logging.async_logging);

    let mux = Mux::from_config(&config.mux);
    assert_eq!(mux.root(), "/api/v2");
}

#[test]
fn test_load_toml() {
    let file = write_config(
        ".toml",
        r#"
[mux]
root = "/svc"

[logging]
async = true
"#,
    );

    let config = ServiceConfig::from_file(file.path()).unwrap();
    assert_eq!(config.mux, MuxConfig { root: "/svc".into() });
    assert!(config.logging.async_logging);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_empty_yaml_uses_defaults() {
    let file = write_config(".yml", "{}\n");
    let config = ServiceConfig::from_file(file.path()).unwrap();
    assert_eq!(config, ServiceConfig::default());
}

#[test]
fn test_unsupported_extension() {
    let file = write_config(".json", "{}");
    let err = ServiceConfig::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Unsupported config format"));
}

#[test]
fn test_invalid_content() {
    let file = write_config(".toml", "[mux\nroot = 1");
    let err = ServiceConfig::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Invalid TOML config"));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ServiceConfig::load(dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_environment_overrides_file() {
    let file = write_config(".yaml", "mux:\n  root: /from-file\n");

    std::env::set_var("RESTMUX_ROOT", "/from-env");
    let loaded = ServiceConfig::load(file.path());
    std::env::remove_var("RESTMUX_ROOT");

    assert_eq!(loaded.unwrap().mux.root, "/from-env");
}
