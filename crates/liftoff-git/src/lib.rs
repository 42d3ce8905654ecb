//! Git and deployment-tag layer for Liftoff.
//!
//! This crate provides:
//! - Command execution through the [`CommandRunner`] collaborator
//! - Typed access to the `autotag` deployment markers ([`TagStore`])
//! - Git queries used for deploy notes ([`Repository`])
//! - Resolution of the last deployed commit per environment ([`TagResolver`])

mod error;
mod repository;
mod resolver;
mod runner;
mod tags;

pub use error::{GitError, GitResult};
pub use repository::Repository;
pub use resolver::{DeploymentState, TagResolver};
#[cfg(any(test, feature = "test-support"))]
pub use runner::ScriptedRunner;
pub use runner::{CommandLine, CommandRunner, SystemRunner};
pub use tags::{Autotag, TagEntry, TagStore, parse_tag_listing};
