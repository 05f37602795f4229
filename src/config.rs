//! Command-line and file configuration.
//!
//! Sources, lowest precedence first: built-in defaults, the YAML file named by
//! `--config`, the `WARDEN_PORT` environment variable, command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use serde::Deserialize;

/// Port used when neither the file nor the command line names one.
pub const DEFAULT_PORT: u16 = 80;

#[derive(Debug, Clone, Parser)]
#[command(name = "warden")]
#[command(about = "Single-request-per-connection HTTP/1.0 file server")]
#[command(version)]
pub struct Cli {
    /// TCP port to listen on
    #[arg(long, env = "WARDEN_PORT")]
    pub port: Option<u16>,

    /// chroot(2) into the document root after binding
    #[arg(long, requires_all = ["user", "group"])]
    pub chroot: bool,

    /// User to run as after chroot
    #[arg(long)]
    pub user: Option<String>,

    /// Group to run as after chroot
    #[arg(long)]
    pub group: Option<String>,

    /// Log at debug level
    #[arg(long)]
    pub debug: bool,

    /// Serve one request from stdin to stdout instead of listening
    #[arg(long)]
    pub stdio: bool,

    /// YAML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory files are served from
    #[arg(value_name = "DOCROOT", required_unless_present = "config")]
    pub docroot: Option<PathBuf>,
}

/// On-disk configuration. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub server: ServerSection,
    pub static_files: StaticFilesSection,
    pub privileges: PrivilegeSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticFilesSection {
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrivilegeSection {
    pub chroot: bool,
    pub user: Option<String>,
    pub group: Option<String>,
}

impl ConfigFile {
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(text).context("invalid configuration file")
    }

    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("in {}", path.display()))
    }
}

/// Account the server switches to after chroot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Privileges {
    pub user: String,
    pub group: String,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub docroot: PathBuf,
    /// Set when the server should chroot into `docroot` and drop to this account
    pub privileges: Option<Privileges>,
    pub debug: bool,
    pub stdio: bool,
}

impl Config {
    /// Reads the file named by `--config`, if any, and layers `cli` on top.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => ConfigFile::read(path)?,
            None => ConfigFile::default(),
        };
        Self::merge(cli, file)
    }

    pub fn merge(cli: &Cli, file: ConfigFile) -> anyhow::Result<Self> {
        let port = cli.port.or(file.server.port).unwrap_or(DEFAULT_PORT);

        let Some(docroot) = cli.docroot.clone().or(file.static_files.root) else {
            bail!("no document root given");
        };

        let chroot = cli.chroot || file.privileges.chroot;
        let privileges = if chroot {
            let user = cli.user.clone().or(file.privileges.user);
            let group = cli.group.clone().or(file.privileges.group);
            match (user, group) {
                (Some(user), Some(group)) => Some(Privileges { user, group }),
                _ => bail!("chroot requires both a user and a group"),
            }
        } else {
            None
        };

        Ok(Self {
            port,
            docroot,
            privileges,
            debug: cli.debug,
            stdio: cli.stdio,
        })
    }
}
