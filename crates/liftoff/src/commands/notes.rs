//! Notes command.

use anyhow::{Context, Result};
use clap::Args;

use liftoff_core::NotesGenerator;
use liftoff_git::{Autotag, Repository, SystemRunner, TagResolver};

/// Arguments for the notes command.
#[derive(Debug, Args)]
pub struct NotesArgs {
    /// Environment whose last deployment starts the notes
    pub environment: String,
}

/// Runs the notes command.
pub fn run(args: &NotesArgs) -> Result<()> {
    let runner = SystemRunner::new();
    let tags = Autotag::new(&runner);
    let generator = NotesGenerator::new(TagResolver::new(Repository::new(&runner), &tags));

    let notes = generator
        .generate_notes(&args.environment)
        .with_context(|| format!("failed to generate notes for {}", args.environment))?;

    println!("{}", notes.path().display());
    Ok(())
}
