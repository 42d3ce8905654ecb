//! Checkout command.

use anyhow::{Context, Result};
use clap::Args;

use liftoff_git::{Autotag, Repository, SystemRunner, TagResolver};

/// Arguments for the checkout command.
#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// Tag label to look up
    pub label: String,
}

/// Runs the checkout command.
pub fn run(args: &CheckoutArgs) -> Result<()> {
    let runner = SystemRunner::new();
    let tags = Autotag::new(&runner);
    let resolver = TagResolver::new(Repository::new(&runner), &tags);

    let tag = resolver
        .checkout_tag(&args.label)
        .with_context(|| format!("failed to check out latest {} tag", args.label))?;

    println!("Checked out {tag}");
    Ok(())
}
