use std::path::PathBuf;

use clap::Parser;
use warden::config::{Cli, Config, ConfigFile, DEFAULT_PORT, Privileges};

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("warden").chain(args.iter().copied())).unwrap()
}

#[test]
fn test_config_docroot_and_port_from_flags() {
    let cfg = Config::load(&cli(&["--port", "8080", "/srv/www"])).unwrap();

    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.docroot, PathBuf::from("/srv/www"));
    assert_eq!(cfg.privileges, None);
    assert!(!cfg.debug);
    assert!(!cfg.stdio);
}

#[test]
fn test_config_default_port() {
    let cli = cli(&["/srv/www"]);
    if std::env::var_os("WARDEN_PORT").is_none() {
        let cfg = Config::load(&cli).unwrap();
        assert_eq!(cfg.port, DEFAULT_PORT);
    }
}

#[test]
fn test_config_missing_docroot_is_usage_error() {
    assert!(Cli::try_parse_from(["warden", "--port", "80"]).is_err());
}

#[test]
fn test_config_bad_port_is_usage_error() {
    assert!(Cli::try_parse_from(["warden", "--port", "http", "/srv"]).is_err());
    assert!(Cli::try_parse_from(["warden", "--port", "70000", "/srv"]).is_err());
}

#[test]
fn test_config_help_is_not_a_failure() {
    let err = Cli::try_parse_from(["warden", "--help"]).unwrap_err();
    assert_eq!(err.exit_code(), 0);
}

#[test]
fn test_config_chroot_requires_user_and_group() {
    assert!(Cli::try_parse_from(["warden", "--chroot", "/srv"]).is_err());
    assert!(Cli::try_parse_from(["warden", "--chroot", "--user", "www", "/srv"]).is_err());

    let cfg = Config::load(&cli(&[
        "--chroot", "--user", "www", "--group", "web", "--port", "80", "/srv",
    ]))
    .unwrap();
    assert_eq!(
        cfg.privileges,
        Some(Privileges {
            user: "www".to_string(),
            group: "web".to_string()
        })
    );
}

#[test]
fn test_config_debug_and_stdio_flags() {
    let cfg = Config::load(&cli(&["--debug", "--stdio", "--port", "1", "/srv"])).unwrap();

    assert!(cfg.debug);
    assert!(cfg.stdio);
}

#[test]
fn test_config_file_parsing() {
    let file = ConfigFile::from_yaml(
        "server:\n  port: 8081\nstatic_files:\n  root: /var/www\nprivileges:\n  chroot: true\n  user: nobody\n  group: nogroup\n",
    )
    .unwrap();

    assert_eq!(file.server.port, Some(8081));
    assert_eq!(file.static_files.root, Some(PathBuf::from("/var/www")));
    assert!(file.privileges.chroot);
}

#[test]
fn test_config_file_sections_are_optional() {
    let file = ConfigFile::from_yaml("static_files:\n  root: /var/www\n").unwrap();

    assert_eq!(file.server.port, None);
    assert!(!file.privileges.chroot);
}

#[test]
fn test_config_file_rejects_unknown_fields() {
    assert!(ConfigFile::from_yaml("server:\n  listen_addr: 0.0.0.0:80\n").is_err());
}

#[test]
fn test_config_flags_override_file() {
    let file = ConfigFile::from_yaml("server:\n  port: 8081\nstatic_files:\n  root: /var/www\n").unwrap();
    let cli = Cli::try_parse_from(["warden", "--config", "x.yaml", "--port", "9000", "/srv"]).unwrap();

    let cfg = Config::merge(&cli, file).unwrap();

    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.docroot, PathBuf::from("/srv"));
}

#[test]
fn test_config_file_fills_in_missing_flags() {
    let file = ConfigFile::from_yaml(
        "server:\n  port: 8081\nstatic_files:\n  root: /var/www\nprivileges:\n  chroot: true\n  user: nobody\n  group: nogroup\n",
    )
    .unwrap();
    let cli = Cli::try_parse_from(["warden", "--config", "x.yaml"]).unwrap();

    let cfg = Config::merge(&cli, file).unwrap();

    assert_eq!(cfg.docroot, PathBuf::from("/var/www"));
    if std::env::var_os("WARDEN_PORT").is_none() {
        assert_eq!(cfg.port, 8081);
    }
    assert_eq!(
        cfg.privileges,
        Some(Privileges {
            user: "nobody".to_string(),
            group: "nogroup".to_string()
        })
    );
}

#[test]
fn test_config_file_chroot_without_account_fails() {
    let file = ConfigFile::from_yaml("static_files:\n  root: /var/www\nprivileges:\n  chroot: true\n").unwrap();
    let cli = Cli::try_parse_from(["warden", "--config", "x.yaml"]).unwrap();

    assert!(Config::merge(&cli, file).is_err());
}

#[test]
fn test_config_missing_docroot_everywhere_fails() {
    let cli = Cli::try_parse_from(["warden", "--config", "x.yaml"]).unwrap();
    assert!(Config::merge(&cli, ConfigFile::default()).is_err());
}

#[test]
fn test_config_reads_file_from_disk() {
    let path = std::env::temp_dir().join(format!("warden-config-{}.yaml", std::process::id()));
    std::fs::write(&path, "static_files:\n  root: /from/file\n").unwrap();

    let cli = Cli::try_parse_from(["warden", "--config", path.to_str().unwrap()]).unwrap();
    let cfg = Config::load(&cli).unwrap();

    assert_eq!(cfg.docroot, PathBuf::from("/from/file"));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_config_unreadable_file_fails() {
    let cli = Cli::try_parse_from(["warden", "--config", "/nonexistent/warden.yaml"]).unwrap();
    assert!(Config::load(&cli).is_err());
}
