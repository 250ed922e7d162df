//! Command-line and environment configuration for the `reroute` binary.

use std::net::SocketAddr;

use clap::{Parser, ValueEnum};

/// Serve the request-rewriting fixture application.
#[derive(Debug, Parser)]
#[command(name = "reroute", version, about)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "REROUTE_LISTEN", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    /// Log output format. Verbosity is controlled by `RUST_LOG`.
    #[arg(long, env = "REROUTE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per event.
    Json,
}
