//! Command-line interface.

pub mod commands;

use clap::{Parser, Subcommand};

/// sparklab: A/B experimentation service for affirmation phrases
#[derive(Parser)]
#[command(name = "sparklab", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Create the project configuration and database
    Init(commands::init::InitArgs),
    /// Run the HTTP service
    Serve(commands::serve::ServeArgs),
}
