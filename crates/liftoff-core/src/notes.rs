//! Deploy notes generation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use liftoff_git::{DeploymentState, TagResolver};
use tracing::{debug, info};

use crate::CoreResult;

/// A plain-text notes file on disk.
///
/// The file is persisted on creation and never removed by this crate;
/// whoever consumes it owns its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesFile {
    path: PathBuf,
}

impl NotesFile {
    /// Writes `contents` into a fresh temporary file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn materialize(contents: &str) -> CoreResult<Self> {
        Self::materialize_in(None, contents)
    }

    /// Writes `contents` into a fresh file under `dir`, or under the system
    /// temporary directory when `dir` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn materialize_in(dir: Option<&Path>, contents: &str) -> CoreResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("deploy-notes-").suffix(".txt");
        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(contents.as_bytes())?;
        file.flush()?;

        let (_, path) = file.keep().map_err(|err| err.error)?;
        debug!(path = %path.display(), bytes = contents.len(), "wrote notes file");
        Ok(Self { path })
    }

    /// Returns the file's path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the notes back.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(&self) -> CoreResult<String> {
        Ok(fs::read_to_string(&self.path)?)
    }

    /// Consumes the handle, returning the path.
    #[must_use]
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Produces deploy notes from commit history.
#[derive(Clone, Copy)]
pub struct NotesGenerator<'a> {
    resolver: TagResolver<'a>,
    dir: Option<&'a Path>,
}

impl<'a> NotesGenerator<'a> {
    /// Creates a generator over the given resolver.
    #[must_use]
    pub fn new(resolver: TagResolver<'a>) -> Self {
        Self {
            resolver,
            dir: None,
        }
    }

    /// Places notes files under `dir` instead of the system temporary
    /// directory.
    #[must_use]
    pub fn in_dir(self, dir: &'a Path) -> Self {
        Self {
            dir: Some(dir),
            ..self
        }
    }

    /// Writes `contents` into a fresh notes file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn write(&self, contents: &str) -> CoreResult<NotesFile> {
        NotesFile::materialize_in(self.dir, contents)
    }

    /// Writes the notes for deploying HEAD to `environment`.
    ///
    /// When the environment has been deployed before, the notes are the
    /// one-line log of everything after that commit up to HEAD. Otherwise
    /// they are the summary of HEAD alone.
    ///
    /// # Errors
    ///
    /// Returns an error if any git or tag command fails, or the file cannot
    /// be written.
    pub fn generate_notes(&self, environment: &str) -> CoreResult<NotesFile> {
        let repo = self.resolver.repository();
        let head = repo.head_commit()?;

        let notes = match self.resolver.latest_tagged_commit(environment)? {
            DeploymentState::Deployed(previous) => {
                info!(environment, %previous, %head, "generating notes from commit log");
                repo.log_between(&previous, &head)?
            }
            DeploymentState::NeverDeployed => {
                info!(environment, %head, "never deployed, using latest commit");
                repo.commit_summary(&head)?
            }
        };

        self.write(&notes)
    }

    /// Describes the last deployment of `environment` in one line.
    ///
    /// # Errors
    ///
    /// Returns an error if any git or tag command fails.
    pub fn notes_for_summary(&self, environment: &str) -> CoreResult<String> {
        match self.resolver.latest_tagged_commit(environment)? {
            DeploymentState::Deployed(commit) => {
                let summary = self.resolver.repository().commit_summary(&commit)?;
                Ok(summary.trim().to_string())
            }
            DeploymentState::NeverDeployed => Ok(format!("Never deployed to {environment}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftoff_git::{Autotag, Repository, ScriptedRunner};
    use tempfile::TempDir;

    #[test]
    fn test_materialize_roundtrip() {
        let notes = NotesFile::materialize("abc Fix crash\n").unwrap();
        assert!(notes.path().exists());
        assert_eq!(notes.read().unwrap(), "abc Fix crash\n");
        fs::remove_file(notes.into_path()).unwrap();
    }

    #[test]
    fn test_materialize_creates_distinct_files() {
        let a = NotesFile::materialize("a").unwrap();
        let b = NotesFile::materialize("a").unwrap();
        assert_ne!(a.path(), b.path());
        fs::remove_file(a.path()).unwrap();
        fs::remove_file(b.path()).unwrap();
    }

    #[test]
    fn test_materialize_in_dir() {
        let scratch = TempDir::new().unwrap();
        let notes = NotesFile::materialize_in(Some(scratch.path()), "notes").unwrap();
        assert_eq!(notes.path().parent(), Some(scratch.path()));
        let name = notes.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("deploy-notes-"));
        assert!(name.ends_with(".txt"));
        assert_eq!(notes.read().unwrap(), "notes");
    }

    #[test]
    fn test_generate_notes_writes_into_dir() {
        let runner = ScriptedRunner::new()
            .output("git rev-parse HEAD", "h\n")
            .output("autotag list qa", "")
            .output("git log --oneline -n 1 h", "h Only commit\n");
        let tags = Autotag::new(&runner);
        let scratch = TempDir::new().unwrap();
        let generator = NotesGenerator::new(TagResolver::new(Repository::new(&runner), &tags))
            .in_dir(scratch.path());

        let notes = generator.generate_notes("qa").unwrap();
        assert_eq!(notes.path().parent(), Some(scratch.path()));
        let prompted = generator.write("typed").unwrap();
        assert_eq!(prompted.path().parent(), Some(scratch.path()));
        assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_generate_notes_from_commit_log() {
        let runner = ScriptedRunner::new()
            .output("git rev-parse HEAD", "latest_commit\n")
            .output(
                "autotag list staging",
                "7342334 ref/blah\nlatest_deployed_commit",
            )
            .output(
                "git log --oneline latest_deployed_commit..latest_commit",
                "c3 Add settings screen\nc2 Fix login crash\n",
            );
        let tags = Autotag::new(&runner);
        let scratch = TempDir::new().unwrap();
        let generator = NotesGenerator::new(TagResolver::new(Repository::new(&runner), &tags))
            .in_dir(scratch.path());

        let notes = generator.generate_notes("staging").unwrap();
        assert_eq!(
            notes.read().unwrap(),
            "c3 Add settings screen\nc2 Fix login crash\n"
        );
        assert!(!runner.was_called("git log --oneline -n 1 latest_commit"));
    }

    #[test]
    fn test_generate_notes_never_deployed() {
        let runner = ScriptedRunner::new()
            .output("git rev-parse HEAD", "latest_commit\n")
            .output("autotag list staging", "\n")
            .output("git log --oneline -n 1 latest_commit", "summary");
        let tags = Autotag::new(&runner);
        let scratch = TempDir::new().unwrap();
        let generator = NotesGenerator::new(TagResolver::new(Repository::new(&runner), &tags))
            .in_dir(scratch.path());

        let notes = generator.generate_notes("staging").unwrap();
        assert_eq!(notes.read().unwrap(), "summary");
    }

    #[test]
    fn test_generate_notes_is_fresh_per_call() {
        let runner = ScriptedRunner::new()
            .output("git rev-parse HEAD", "h\n")
            .output("autotag list qa", "")
            .output("git log --oneline -n 1 h", "h Only commit\n");
        let tags = Autotag::new(&runner);
        let scratch = TempDir::new().unwrap();
        let generator = NotesGenerator::new(TagResolver::new(Repository::new(&runner), &tags))
            .in_dir(scratch.path());

        let first = generator.generate_notes("qa").unwrap();
        let second = generator.generate_notes("qa").unwrap();
        assert_ne!(first.path(), second.path());
        assert_eq!(
            runner
                .calls()
                .iter()
                .filter(|c| *c == "autotag list qa")
                .count(),
            2
        );
    }

    #[test]
    fn test_generate_notes_tag_failure_is_fatal() {
        let runner = ScriptedRunner::new()
            .output("git rev-parse HEAD", "h\n")
            .fail("autotag list staging");
        let tags = Autotag::new(&runner);
        let scratch = TempDir::new().unwrap();
        let generator = NotesGenerator::new(TagResolver::new(Repository::new(&runner), &tags))
            .in_dir(scratch.path());

        assert!(generator.generate_notes("staging").is_err());
    }

    #[test]
    fn test_generate_notes_head_failure_is_fatal() {
        let runner = ScriptedRunner::new().fail("git rev-parse HEAD");
        let tags = Autotag::new(&runner);
        let scratch = TempDir::new().unwrap();
        let generator = NotesGenerator::new(TagResolver::new(Repository::new(&runner), &tags))
            .in_dir(scratch.path());

        assert!(generator.generate_notes("staging").is_err());
        assert_eq!(runner.calls(), ["git rev-parse HEAD"]);
    }

    #[test]
    fn test_notes_for_summary_deployed() {
        let runner = ScriptedRunner::new()
            .output(
                "autotag list staging",
                "7342334 ref/blah\nlatest_deployed_commit ref/blahblah",
            )
            .output(
                "git log --oneline -n 1 latest_deployed_commit",
                "summary\n",
            );
        let tags = Autotag::new(&runner);
        let scratch = TempDir::new().unwrap();
        let generator = NotesGenerator::new(TagResolver::new(Repository::new(&runner), &tags))
            .in_dir(scratch.path());

        assert_eq!(generator.notes_for_summary("staging").unwrap(), "summary");
    }

    #[test]
    fn test_notes_for_summary_never_deployed() {
        let runner = ScriptedRunner::new().output("autotag list staging", "\n");
        let tags = Autotag::new(&runner);
        let scratch = TempDir::new().unwrap();
        let generator = NotesGenerator::new(TagResolver::new(Repository::new(&runner), &tags))
            .in_dir(scratch.path());

        assert_eq!(
            generator.notes_for_summary("staging").unwrap(),
            "Never deployed to staging"
        );
    }
}
