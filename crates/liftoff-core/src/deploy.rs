//! Deployment orchestration.

use std::io::Write;

use liftoff_git::TagResolver;
use tracing::{debug, info};

use crate::{CoreResult, UploadParams, UploadPipeline, UploadResult};

/// A single deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    /// Upload inputs.
    pub params: UploadParams,
    /// Skip the clean working tree check. `IGNORE_GIT` has the same effect.
    pub bypass_clean_check: bool,
    /// Leave the deployment untagged.
    pub skip_tag: bool,
}

impl DeployRequest {
    /// Creates a request that checks the tree and tags on success.
    #[must_use]
    pub fn new(params: UploadParams) -> Self {
        Self {
            params,
            bypass_clean_check: false,
            skip_tag: false,
        }
    }
}

/// Manages the deployment process.
pub struct DeployManager<'a> {
    resolver: TagResolver<'a>,
    pipeline: UploadPipeline<'a>,
}

impl<'a> DeployManager<'a> {
    /// Creates a new deploy manager.
    #[must_use]
    pub fn new(resolver: TagResolver<'a>, pipeline: UploadPipeline<'a>) -> Self {
        Self { resolver, pipeline }
    }

    /// Deploys the current HEAD.
    ///
    /// The tag is only created once the service has accepted the build.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree is dirty, the upload fails or is
    /// rejected, or the tag cannot be created.
    pub fn deploy(&self, request: &DeployRequest, out: &mut dyn Write) -> CoreResult<UploadResult> {
        let environment = request.params.environment.as_str();
        info!(environment, "starting deployment");

        let bypass = request.bypass_clean_check || self.pipeline.overrides().ignore_git;
        self.resolver.ensure_clean_tree(bypass, out)?;

        let result = self.pipeline.upload(&request.params, out)?;

        if request.skip_tag {
            debug!(environment, "skipping deployment tag");
        } else {
            self.resolver.tag_deployment(environment)?;
        }

        info!(environment, "deployment completed");
        Ok(result)
    }
}
