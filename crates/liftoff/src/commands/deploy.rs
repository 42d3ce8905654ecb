//! Deploy command.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use liftoff_config::{Credentials, find_and_load_config};
use liftoff_core::{
    DeployManager, DeployRequest, HttpTransport, NotesGenerator, TerminalPrompt, UploadParams,
    UploadPipeline,
};
use liftoff_git::{Autotag, Repository, SystemRunner, TagResolver};

/// Arguments for the deploy command.
#[derive(Debug, Args)]
pub struct DeployArgs {
    /// Environment to deploy to
    pub environment: String,

    /// Build artifact to upload (default: from configuration)
    #[arg(short, long)]
    pub artifact: Option<PathBuf>,

    /// Debug-symbol bundle to compress and attach
    #[arg(long)]
    pub dsym: Option<PathBuf>,

    /// Distribution list to release the build to
    #[arg(short, long)]
    pub distribution_list: Option<String>,

    /// Notify testers
    #[arg(long, overrides_with = "no_notify")]
    pub notify: bool,

    /// Do not notify testers
    #[arg(long, overrides_with = "notify")]
    pub no_notify: bool,

    /// Type the deploy notes instead of generating them
    #[arg(long)]
    pub prompt_notes: bool,

    /// Skip deployment tag creation
    #[arg(long)]
    pub no_tag: bool,
}

impl DeployArgs {
    /// Returns the explicitly requested notify flag, if any.
    pub fn notify(&self) -> Option<bool> {
        if self.notify {
            Some(true)
        } else if self.no_notify {
            Some(false)
        } else {
            None
        }
    }
}

/// Runs the deploy command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: DeployArgs) -> Result<()> {
    let config = find_and_load_config().context("failed to load configuration")?;
    let env = config.environment(&args.environment)?;

    let artifact = args
        .artifact
        .clone()
        .or_else(|| env.artifact.clone())
        .with_context(|| {
            format!(
                "no artifact to upload; pass --artifact or set environments.{}.artifact",
                args.environment
            )
        })?;

    let params = UploadParams {
        artifact,
        notify: args.notify().or(env.notify),
        distribution_list: args
            .distribution_list
            .clone()
            .unwrap_or_else(|| env.distribution_list.clone()),
        autogenerate_notes: env.autogenerate_notes && !args.prompt_notes,
        environment: args.environment.clone(),
        dsym: args.dsym.clone().or_else(|| env.dsym.clone()),
    };
    info!(?params, "resolved deploy parameters");

    let runner = SystemRunner::new();
    let tags = Autotag::new(&runner);
    let resolver = TagResolver::new(Repository::new(&runner), &tags);
    let transport = HttpTransport::new(Duration::from_secs(config.testflight.timeout_secs))
        .context("failed to create HTTP client")?;
    let prompt = TerminalPrompt;

    let pipeline = UploadPipeline::new(
        &runner,
        NotesGenerator::new(resolver),
        &prompt,
        &transport,
        Credentials::new(
            config.testflight.api_token.as_str(),
            config.testflight.team_token.as_str(),
        ),
        config.testflight.endpoint.as_str(),
    );

    let request = DeployRequest {
        params,
        bypass_clean_check: config.git.allow_dirty,
        skip_tag: args.no_tag,
    };

    let mut stdout = io::stdout().lock();
    DeployManager::new(resolver, pipeline)
        .deploy(&request, &mut stdout)
        .with_context(|| format!("failed to deploy to {}", args.environment))?;

    Ok(())
}
