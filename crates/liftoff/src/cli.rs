//! CLI definition.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Deploy notes, TestFlight uploads and deployment tags for mobile releases.
#[derive(Debug, Parser)]
#[command(name = "liftoff")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload a build to TestFlight and tag the deployed commit
    Deploy(commands::deploy::DeployArgs),

    /// Generate deploy notes for an environment
    Notes(commands::notes::NotesArgs),

    /// Show the last deployment of each environment
    Status(commands::status::StatusArgs),

    /// Check out the latest tag for a label
    Checkout(commands::checkout::CheckoutArgs),
}

impl Cli {
    /// Runs the CLI command.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Deploy(args) => commands::deploy::run(args),
            Commands::Notes(args) => commands::notes::run(&args),
            Commands::Status(args) => commands::status::run(&args),
            Commands::Checkout(args) => commands::checkout::run(&args),
        }
    }
}
