//! CLI argument parsing via clap.

use clap::{Parser, Subcommand};
use donutbot::build_info;

/// Console controller for a DonutSMP bot driven through a world-agent sidecar.
#[derive(Debug, Parser)]
#[command(
    name = "donutbot",
    version = build_info::VERSION,
    long_version = build_info::LONG_VERSION,
    after_help = build_info::HELP_BUILD_METADATA
)]
pub struct Args {
    /// Path to config file (default: ./donutbot.toml or ~/.config/donutbot/donutbot.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Override the game server host.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// Override the world-agent sidecar address (host:port).
    #[arg(long = "agent")]
    pub agent: Option<String>,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Log debug details to stderr (RUST_LOG takes precedence).
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write a starter config to ~/.config/donutbot/donutbot.toml.
    Init,
}
