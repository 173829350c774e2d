// CLI module for bria-proxy
// Author: kelexine (https://github.com/kelexine)

use crate::config::AppConfig;
use clap::Parser;
use std::path::PathBuf;

/// bria-proxy - Thin HTTP backend for the Bria image API
#[derive(Parser, Debug)]
#[command(name = "bria-proxy", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (default: ~/.bria-proxy/config.toml)
    #[arg(short, long, env = "BRIA_PROXY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind, overriding the config file
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overriding the config file
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
