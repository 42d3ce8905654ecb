//! Status command.

use anyhow::{Context, Result, bail};
use clap::Args;

use liftoff_config::find_and_load_config;
use liftoff_core::NotesGenerator;
use liftoff_git::{Autotag, Repository, SystemRunner, TagResolver};

/// Arguments for the status command.
#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Environment to report on (default: every configured environment)
    pub environment: Option<String>,
}

/// Runs the status command.
pub fn run(args: &StatusArgs) -> Result<()> {
    let environments = if let Some(environment) = &args.environment {
        vec![environment.clone()]
    } else {
        let config = find_and_load_config().context("failed to load configuration")?;
        if config.environments.is_empty() {
            bail!("no environments configured");
        }
        config.environments.into_keys().collect()
    };

    let runner = SystemRunner::new();
    let tags = Autotag::new(&runner);
    let generator = NotesGenerator::new(TagResolver::new(Repository::new(&runner), &tags));

    for environment in &environments {
        let summary = generator
            .notes_for_summary(environment)
            .with_context(|| format!("failed to read deployment state of {environment}"))?;
        println!("{environment}: {summary}");
    }

    Ok(())
}
