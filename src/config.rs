//! Server configuration.
//!
//! Built once at startup from defaults, an optional YAML file and the
//! command line, then passed by reference to the event loop.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use crate::http::resource::PathPolicy;

/// Command-line interface of the `liso` binary.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "liso")]
#[command(about = "Single-process HTTP/1.1 static file server")]
pub struct Cli {
    /// TCP port to listen on
    #[arg(env = "LISO_PORT")]
    pub port: Option<u16>,

    /// Host or address to bind
    #[arg(long, env = "LISO_HOST")]
    pub host: Option<String>,

    /// Directory static files are served from
    #[arg(long = "www", env = "LISO_WWW")]
    pub document_root: Option<PathBuf>,

    /// Append-only log file
    #[arg(long = "log", env = "LISO_LOG")]
    pub log_path: Option<PathBuf>,

    /// Reject request targets that escape the document root
    #[arg(long)]
    pub confine_paths: bool,

    /// YAML file with server settings
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub document_root: PathBuf,
    pub log_path: PathBuf,
    pub confine_paths: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            document_root: PathBuf::from("./www"),
            log_path: PathBuf::from("./liso.log"),
            confine_paths: false,
        }
    }
}

impl ServerConfig {
    /// Resolves the final configuration: defaults, then the YAML file named by
    /// `--config` (if any), then explicit command-line values.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut cfg = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(port) = cli.port {
            cfg.port = port;
        }
        if let Some(host) = &cli.host {
            cfg.host = host.clone();
        }
        if let Some(root) = &cli.document_root {
            cfg.document_root = root.clone();
        }
        if let Some(log) = &cli.log_path {
            cfg.log_path = log.clone();
        }
        if cli.confine_paths {
            cfg.confine_paths = true;
        }

        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let cfg = serde_yaml::from_str(text)?;
        Ok(cfg)
    }

    pub fn path_policy(&self) -> PathPolicy {
        if self.confine_paths {
            PathPolicy::Confined
        } else {
            PathPolicy::Verbatim
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_fills_missing_fields_with_defaults() {
        let cfg = ServerConfig::from_yaml("port: 9999\n").unwrap();
        assert_eq!(cfg.port, 9999);
        assert_eq!(cfg.document_root, PathBuf::from("./www"));
    }
}
