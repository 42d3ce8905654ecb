//! Deployment history resolution.

use std::fmt;
use std::io::Write;

use tracing::{debug, info, warn};

use crate::{GitError, GitResult, Repository, TagStore};

/// Where an environment stands, derived fresh from the tag listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentState {
    /// The environment was last deployed from this commit.
    Deployed(String),
    /// No deployment has ever been tagged for the environment.
    NeverDeployed,
}

impl DeploymentState {
    /// Returns the deployed commit, if any.
    #[must_use]
    pub fn commit(&self) -> Option<&str> {
        match self {
            Self::Deployed(commit) => Some(commit),
            Self::NeverDeployed => None,
        }
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deployed(commit) => write!(f, "deployed at {commit}"),
            Self::NeverDeployed => f.write_str("never deployed"),
        }
    }
}

/// Maps environments to their last deployed commit and manages the working
/// tree around deploys.
///
/// Nothing is cached: every call re-reads the tag listing.
#[derive(Clone, Copy)]
pub struct TagResolver<'a> {
    repo: Repository<'a>,
    tags: &'a dyn TagStore,
}

impl<'a> TagResolver<'a> {
    /// Creates a resolver over the given repository and tag store.
    #[must_use]
    pub fn new(repo: Repository<'a>, tags: &'a dyn TagStore) -> Self {
        Self { repo, tags }
    }

    /// Returns the underlying repository.
    #[must_use]
    pub fn repository(&self) -> Repository<'a> {
        self.repo
    }

    /// Resolves the last deployed commit for `environment`.
    ///
    /// The tag listing is ordered oldest first, so the last entry wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag listing fails.
    pub fn latest_tagged_commit(&self, environment: &str) -> GitResult<DeploymentState> {
        let state = self
            .tags
            .list_tags(environment)?
            .pop()
            .map_or(DeploymentState::NeverDeployed, |entry| {
                DeploymentState::Deployed(entry.commit)
            });
        debug!(environment, %state, "resolved deployment state");
        Ok(state)
    }

    /// Verifies that the working tree has no uncommitted changes.
    ///
    /// With `bypass` set the check is skipped and a warning is written to
    /// `out` instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree is dirty or git cannot be run.
    pub fn ensure_clean_tree(&self, bypass: bool, out: &mut dyn Write) -> GitResult<()> {
        if bypass {
            warn!("skipping clean working tree check");
            writeln!(out, "WARNING NOT CHECKING FOR CLEAN WORKING DIRECTORY")?;
            return Ok(());
        }

        writeln!(out, "Checking for clean working tree...")?;
        self.repo.check_clean()
    }

    /// Checks out the most recent tag listed for `label`.
    ///
    /// Unlike deployment listings, the leading token here is a tag name.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NoTags`] if nothing is listed for `label`, or an
    /// error if listing or checkout fails.
    pub fn checkout_tag(&self, label: &str) -> GitResult<String> {
        let tag_name = self
            .tags
            .list_tags(label)?
            .pop()
            .map(|entry| entry.commit)
            .ok_or_else(|| GitError::NoTags(label.to_string()))?;

        self.repo.checkout(&tag_name)?;
        info!(label, tag = %tag_name, "checked out tag");
        Ok(tag_name)
    }

    /// Records HEAD as the latest deployment of `environment`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag cannot be created.
    pub fn tag_deployment(&self, environment: &str) -> GitResult<()> {
        self.tags.create_tag(environment)?;
        info!(environment, "tagged deployment");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Autotag, ScriptedRunner};

    #[test]
    fn test_latest_tagged_commit_uses_last_line() {
        let runner = ScriptedRunner::new().output(
            "autotag list staging",
            "7342334 ref/blah\nlatest_deployed_commit ref/blahblah",
        );
        let tags = Autotag::new(&runner);
        let resolver = TagResolver::new(Repository::new(&runner), &tags);

        let state = resolver.latest_tagged_commit("staging").unwrap();
        assert_eq!(
            state,
            DeploymentState::Deployed("latest_deployed_commit".to_string())
        );
    }

    #[test]
    fn test_latest_tagged_commit_single_line() {
        let runner = ScriptedRunner::new().output("autotag list qa", "abc123 refs/autotags/qa/1\n");
        let tags = Autotag::new(&runner);
        let resolver = TagResolver::new(Repository::new(&runner), &tags);

        let state = resolver.latest_tagged_commit("qa").unwrap();
        assert_eq!(state.commit(), Some("abc123"));
    }

    #[test]
    fn test_latest_tagged_commit_never_deployed() {
        let runner = ScriptedRunner::new().output("autotag list staging", "\n");
        let tags = Autotag::new(&runner);
        let resolver = TagResolver::new(Repository::new(&runner), &tags);

        let state = resolver.latest_tagged_commit("staging").unwrap();
        assert_eq!(state, DeploymentState::NeverDeployed);
        assert_eq!(state.commit(), None);
    }

    #[test]
    fn test_latest_tagged_commit_is_not_cached() {
        let runner = ScriptedRunner::new().output("autotag list staging", "abc ref\n");
        let tags = Autotag::new(&runner);
        let resolver = TagResolver::new(Repository::new(&runner), &tags);

        resolver.latest_tagged_commit("staging").unwrap();
        resolver.latest_tagged_commit("staging").unwrap();
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn test_latest_tagged_commit_propagates_failure() {
        let runner = ScriptedRunner::new().fail("autotag list staging");
        let tags = Autotag::new(&runner);
        let resolver = TagResolver::new(Repository::new(&runner), &tags);

        assert!(resolver.latest_tagged_commit("staging").is_err());
    }

    #[test]
    fn test_ensure_clean_tree_runs_check() {
        let runner = ScriptedRunner::new();
        let tags = Autotag::new(&runner);
        let resolver = TagResolver::new(Repository::new(&runner), &tags);
        let mut out = Vec::new();

        resolver.ensure_clean_tree(false, &mut out).unwrap();
        assert!(runner.was_called("git diff-index --quiet HEAD"));
        assert!(!String::from_utf8(out).unwrap().contains("WARNING"));
    }

    #[test]
    fn test_ensure_clean_tree_dirty_is_fatal() {
        let runner = ScriptedRunner::new().fail("git diff-index --quiet HEAD");
        let tags = Autotag::new(&runner);
        let resolver = TagResolver::new(Repository::new(&runner), &tags);

        assert!(resolver.ensure_clean_tree(false, &mut Vec::new()).is_err());
    }

    #[test]
    fn test_ensure_clean_tree_bypass_warns_and_skips() {
        let runner = ScriptedRunner::new().fail("git diff-index --quiet HEAD");
        let tags = Autotag::new(&runner);
        let resolver = TagResolver::new(Repository::new(&runner), &tags);
        let mut out = Vec::new();

        resolver.ensure_clean_tree(true, &mut out).unwrap();
        assert!(runner.calls().is_empty());
        assert!(
            String::from_utf8(out)
                .unwrap()
                .contains("WARNING NOT CHECKING FOR CLEAN WORKING DIRECTORY")
        );
    }

    #[test]
    fn test_checkout_tag_uses_last_tag_name() {
        let runner = ScriptedRunner::new().output(
            "autotag list ci",
            "7342334 ref/blah\nlatest_ci_tag ref/blahblah",
        );
        let tags = Autotag::new(&runner);
        let resolver = TagResolver::new(Repository::new(&runner), &tags);

        let tag = resolver.checkout_tag("ci").unwrap();
        assert_eq!(tag, "latest_ci_tag");
        assert_eq!(
            runner.calls(),
            ["autotag list ci", "git checkout latest_ci_tag"]
        );
    }

    #[test]
    fn test_checkout_tag_without_tags() {
        let runner = ScriptedRunner::new().output("autotag list ci", "");
        let tags = Autotag::new(&runner);
        let resolver = TagResolver::new(Repository::new(&runner), &tags);

        let result = resolver.checkout_tag("ci");
        assert!(matches!(result, Err(GitError::NoTags(label)) if label == "ci"));
    }

    #[test]
    fn test_checkout_tag_checkout_failure() {
        let runner = ScriptedRunner::new()
            .output("autotag list ci", "tag_1 ref\n")
            .fail("git checkout tag_1");
        let tags = Autotag::new(&runner);
        let resolver = TagResolver::new(Repository::new(&runner), &tags);

        assert!(resolver.checkout_tag("ci").is_err());
    }

    #[test]
    fn test_tag_deployment() {
        let runner = ScriptedRunner::new();
        let tags = Autotag::new(&runner);
        let resolver = TagResolver::new(Repository::new(&runner), &tags);

        resolver.tag_deployment("staging").unwrap();
        assert_eq!(runner.calls(), ["autotag create staging"]);
    }

    #[test]
    fn test_deployment_state_display() {
        assert_eq!(
            DeploymentState::Deployed("abc".to_string()).to_string(),
            "deployed at abc"
        );
        assert_eq!(DeploymentState::NeverDeployed.to_string(), "never deployed");
    }
}
