//! CLI module
//!
//! Subcommands:
//! - `serve`: run the HTTP API server

pub mod serve;

use clap::{Parser, Subcommand};

/// docsmith - AI document builder API
#[derive(Parser)]
#[command(name = "docsmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,
}
