//! CLI module for the trade auth gateway
//!
//! - `serve`: run the HTTP auth service
//! - `check-config`: validate the signing configuration and exit

pub mod check_config;
pub mod serve;

use clap::{Parser, Subcommand};

/// Trade Management authentication gateway
#[derive(Parser)]
#[command(name = "trade-auth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP auth service
    Serve(serve::ServeArgs),

    /// Load and validate the signing configuration, then exit
    CheckConfig,
}
