use std::path::PathBuf;

use clap::Parser;
use liso::config::{Cli, ServerConfig};
use liso::http::resource::PathPolicy;

#[test]
fn test_config_defaults() {
    let cfg = ServerConfig::default();
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.document_root, PathBuf::from("./www"));
    assert_eq!(cfg.log_path, PathBuf::from("./liso.log"));
    assert_eq!(cfg.path_policy(), PathPolicy::Verbatim);
}

#[test]
fn test_config_port_from_first_argument() {
    let cli = Cli::try_parse_from(["liso", "9999"]).unwrap();
    let cfg = ServerConfig::load(&cli).unwrap();
    assert_eq!(cfg.port, 9999);
}

#[test]
fn test_config_flags_override_defaults() {
    let cli = Cli::try_parse_from([
        "liso",
        "8081",
        "--host",
        "127.0.0.1",
        "--www",
        "/srv/www",
        "--log",
        "/tmp/liso.log",
        "--confine-paths",
    ])
    .unwrap();
    let cfg = ServerConfig::load(&cli).unwrap();

    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.document_root, PathBuf::from("/srv/www"));
    assert_eq!(cfg.log_path, PathBuf::from("/tmp/liso.log"));
    assert_eq!(cfg.path_policy(), PathPolicy::Confined);
}

#[test]
fn test_config_rejects_bad_port() {
    assert!(Cli::try_parse_from(["liso", "notaport"]).is_err());
    assert!(Cli::try_parse_from(["liso", "70000"]).is_err());
}

#[test]
fn test_config_file_then_cli() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("liso.yaml");
    std::fs::write(
        &path,
        "port: 7000\ndocument_root: /var/www\nconfine_paths: true\n",
    )
    .unwrap();

    let cli = Cli {
        port: Some(7001),
        config: Some(path),
        ..Cli::default()
    };
    let cfg = ServerConfig::load(&cli).unwrap();

    assert_eq!(cfg.port, 7001);
    assert_eq!(cfg.document_root, PathBuf::from("/var/www"));
    assert!(cfg.confine_paths);
    assert_eq!(cfg.host, "0.0.0.0");
}

#[test]
fn test_config_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.yaml");
    assert!(ServerConfig::from_file(&missing).is_err());

    assert!(ServerConfig::from_yaml("port: [1, 2]").is_err());
}

#[test]
fn test_config_clone() {
    let cfg1 = ServerConfig::default();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1, cfg2);
}
