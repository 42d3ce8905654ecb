//! Git repository queries.

use crate::{CommandLine, CommandRunner, GitResult};

const GIT: &str = "git";

/// Git operations needed for deploy bookkeeping, executed through a
/// [`CommandRunner`].
#[derive(Clone, Copy)]
pub struct Repository<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> Repository<'a> {
    /// Creates a repository handle that shells out through `runner`.
    #[must_use]
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Returns the commit identifier of HEAD.
    ///
    /// # Errors
    ///
    /// Returns an error if `git rev-parse` fails.
    pub fn head_commit(&self) -> GitResult<String> {
        let out = self.git_capture(&["rev-parse", "HEAD"])?;
        Ok(out.trim_end().to_string())
    }

    /// Returns the one-line summary of a single commit.
    ///
    /// # Errors
    ///
    /// Returns an error if `git log` fails.
    pub fn commit_summary(&self, rev: &str) -> GitResult<String> {
        self.git_capture(&["log", "--oneline", "-n", "1", rev])
    }

    /// Returns the one-line-per-commit log for the range `from..to`.
    ///
    /// # Errors
    ///
    /// Returns an error if `git log` fails.
    pub fn log_between(&self, from: &str, to: &str) -> GitResult<String> {
        let range = format!("{from}..{to}");
        self.git_capture(&["log", "--oneline", &range])
    }

    /// Fails if the working tree has uncommitted changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree is dirty or git cannot be run.
    pub fn check_clean(&self) -> GitResult<()> {
        self.runner
            .run(&CommandLine::new(GIT).args(["diff-index", "--quiet", "HEAD"]))
    }

    /// Checks out the given revision.
    ///
    /// # Errors
    ///
    /// Returns an error if `git checkout` fails.
    pub fn checkout(&self, rev: &str) -> GitResult<()> {
        self.runner
            .run(&CommandLine::new(GIT).args(["checkout", rev]))
    }

    fn git_capture(&self, args: &[&str]) -> GitResult<String> {
        self.runner
            .capture(&CommandLine::new(GIT).args(args.iter().copied()))
    }
}
