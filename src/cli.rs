//! Command-line overrides for the environment configuration.

use clap::Parser;

use crate::config::Config;

#[derive(Debug, Default, Parser)]
#[command(name = "filmography", version, about = "Look up a person's filmography on TMDB")]
pub struct CliOptions {
    /// Listen address (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides PORT)
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Include upstream error details in error responses (overrides DEBUG)
    #[arg(long)]
    pub debug: bool,
}

impl CliOptions {
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Apply the flags that were given on top of `config`
    pub fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.debug {
            config.debug = true;
        }
    }
}
