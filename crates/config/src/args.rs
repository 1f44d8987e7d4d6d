//! Config given as command line arguments

use std::{net::SocketAddr, path::PathBuf};

use clap::{Args, Subcommand};

#[derive(Args, Debug, Clone, Default)]
pub struct ArgsConfig {
    /// Directory which contains the config file. The working directory
    /// is used by default.
    #[arg(short, long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Public API socket address. Overrides config file value.
    #[arg(long, value_name = "ADDR")]
    pub public_api: Option<SocketAddr>,

    #[command(subcommand)]
    pub mode: Option<AppMode>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AppMode {
    /// Print API documentation JSON to stdout
    OpenApi,
}
