//! Deployment tag markers.
//!
//! Deployments are recorded with `autotag`, which keeps one lightweight
//! reference per deploy under a per-environment namespace. `autotag list
//! <label>` prints one `<commit> <reference>` pair per line, oldest first.

use tracing::debug;

use crate::{CommandLine, CommandRunner, GitResult};

const AUTOTAG: &str = "autotag";

/// A single entry of a tag listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    /// Leading token of the line: a commit identifier, or a tag name when
    /// listing checkout tags.
    pub commit: String,
    /// The tag reference. May be empty.
    pub reference: String,
}

impl TagEntry {
    /// Creates a new tag entry.
    #[must_use]
    pub fn new(commit: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            commit: commit.into(),
            reference: reference.into(),
        }
    }
}

/// Typed access to deployment tags.
pub trait TagStore {
    /// Lists tags for `filter`, ordered oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying listing fails.
    fn list_tags(&self, filter: &str) -> GitResult<Vec<TagEntry>>;

    /// Marks the current HEAD as deployed to `label`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag cannot be created.
    fn create_tag(&self, label: &str) -> GitResult<()>;
}

/// [`TagStore`] backed by the `autotag` command.
pub struct Autotag<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> Autotag<'a> {
    /// Creates a tag store that shells out through `runner`.
    #[must_use]
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }
}

impl TagStore for Autotag<'_> {
    fn list_tags(&self, filter: &str) -> GitResult<Vec<TagEntry>> {
        let output = self
            .runner
            .capture(&CommandLine::new(AUTOTAG).args(["list", filter]))?;
        let entries = parse_tag_listing(&output);
        debug!(filter, count = entries.len(), "listed tags");
        Ok(entries)
    }

    fn create_tag(&self, label: &str) -> GitResult<()> {
        self.runner
            .run(&CommandLine::new(AUTOTAG).args(["create", label]))
    }
}

/// Parses line-oriented tag listing output.
///
/// Blank lines are skipped. The first whitespace-delimited token of each line
/// becomes [`TagEntry::commit`], the rest of the line (trimmed) the reference.
#[must_use]
pub fn parse_tag_listing(output: &str) -> Vec<TagEntry> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let mut parts = line.splitn(2, char::is_whitespace);
            let commit = parts.next().filter(|c| !c.is_empty())?;
            let reference = parts.next().unwrap_or("").trim();
            Some(TagEntry::new(commit, reference))
        })
        .collect()
}
