//! TestFlight upload pipeline.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use liftoff_config::{Credentials, EnvOverrides, UploadSettings};
use liftoff_git::{CommandLine, CommandRunner};
use tracing::{debug, info};

use crate::{
    CoreError, CoreResult, NotesGenerator, Prompt, Transport, UploadRequest, UploadResult,
    parse_response,
};

/// Label shown when asking the operator for notes.
const NOTES_PROMPT: &str = "Deploy Notes: ";

/// Progress of a single upload call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    /// Nothing done yet.
    Init,
    /// Notes file written.
    NotesReady,
    /// Symbol bundle archived.
    Compressed,
    /// Request sent.
    Submitted,
    /// Service accepted the build.
    Succeeded,
    /// Service rejected the build.
    Failed,
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::NotesReady => "notes-ready",
            Self::Compressed => "compressed",
            Self::Submitted => "submitted",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Inputs for one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadParams {
    /// Build artifact to upload.
    pub artifact: PathBuf,
    /// Explicit notify flag. `NOTIFY` still wins when set.
    pub notify: Option<bool>,
    /// Distribution list name.
    pub distribution_list: String,
    /// Generate notes from history instead of prompting.
    pub autogenerate_notes: bool,
    /// Environment being deployed.
    pub environment: String,
    /// Debug-symbol bundle to compress and attach.
    pub dsym: Option<PathBuf>,
}

impl UploadParams {
    /// Creates parameters with autogenerated notes and no symbol bundle.
    #[must_use]
    pub fn new(artifact: impl Into<PathBuf>, environment: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
            notify: None,
            distribution_list: String::new(),
            autogenerate_notes: true,
            environment: environment.into(),
            dsym: None,
        }
    }
}

type EnvLookup<'a> = Box<dyn Fn(&str) -> Option<String> + 'a>;

/// Uploads build artifacts to the distribution service.
pub struct UploadPipeline<'a> {
    runner: &'a dyn CommandRunner,
    notes: NotesGenerator<'a>,
    prompt: &'a dyn Prompt,
    transport: &'a dyn Transport,
    credentials: Credentials,
    endpoint: String,
    env: EnvLookup<'a>,
}

impl<'a> UploadPipeline<'a> {
    /// Creates a pipeline reading overrides from the process environment.
    #[must_use]
    pub fn new(
        runner: &'a dyn CommandRunner,
        notes: NotesGenerator<'a>,
        prompt: &'a dyn Prompt,
        transport: &'a dyn Transport,
        credentials: Credentials,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            notes,
            prompt,
            transport,
            credentials,
            endpoint: endpoint.into(),
            env: Box::new(|key| std::env::var(key).ok()),
        }
    }

    /// Reads environment overrides through `lookup` instead.
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String> + 'a) -> Self {
        self.env = Box::new(lookup);
        self
    }

    /// Reads the current environment overrides.
    #[must_use]
    pub fn overrides(&self) -> EnvOverrides {
        EnvOverrides::from_lookup(&self.env)
    }

    /// Uploads `params.artifact`, writing progress lines to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UploadRejected`] if the service rejects the
    /// build, or an error if notes, compression or submission fail. Nothing
    /// is sent when a step before submission fails.
    pub fn upload(&self, params: &UploadParams, out: &mut dyn Write) -> CoreResult<UploadResult> {
        let mut stage = UploadStage::Init;
        debug!(%stage, environment = %params.environment, "starting upload");

        let settings = UploadSettings::resolve(&self.credentials, params.notify, &self.overrides());
        debug!(notify = settings.notify, credentials = ?settings.credentials, "resolved upload settings");

        let notes = if params.autogenerate_notes {
            self.notes.generate_notes(&params.environment)?
        } else {
            let text = self.prompt.ask(NOTES_PROMPT)?;
            self.notes.write(&text)?
        };
        stage = UploadStage::NotesReady;
        debug!(%stage, notes = %notes.path().display());

        let dsym = match &params.dsym {
            Some(bundle) => {
                let archive = self.compress(bundle)?;
                stage = UploadStage::Compressed;
                debug!(%stage, archive = %archive.display());
                Some(archive)
            }
            None => None,
        };

        let request = UploadRequest::new(
            &params.artifact,
            dsym,
            notes.path(),
            &settings,
            &params.distribution_list,
        );

        writeln!(out, "Uploading to TestFlight...")?;
        info!(artifact = %params.artifact.display(), endpoint = %self.endpoint, "uploading build");
        let body = self.transport.submit(&self.endpoint, &request)?;
        stage = UploadStage::Submitted;
        debug!(%stage);

        match parse_response(&body)? {
            UploadResult::Success => {
                stage = UploadStage::Succeeded;
                debug!(%stage);
                writeln!(out, "Finished uploading to TestFlight")?;
                Ok(UploadResult::Success)
            }
            UploadResult::Failure { status, message } => {
                stage = UploadStage::Failed;
                debug!(%stage, status);
                let err = CoreError::UploadRejected { status, message };
                writeln!(out, "{err}")?;
                Err(err)
            }
        }
    }

    /// Archives a symbol bundle next to itself, returning `<bundle>.zip`.
    fn compress(&self, bundle: &Path) -> CoreResult<PathBuf> {
        let source = bundle.display().to_string();
        let archive = format!("{source}.zip");

        info!(bundle = %source, "compressing symbol bundle");
        self.runner.run(
            &CommandLine::new("zip")
                .args(["-r", "-T", "-y"])
                .arg(archive.as_str())
                .arg(source),
        )?;

        Ok(PathBuf::from(archive))
    }
}
