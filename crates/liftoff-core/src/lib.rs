//! Core library for Liftoff.
//!
//! This crate provides deploy-note generation and the TestFlight upload
//! pipeline, plus the orchestration that ties them to deployment tags.

mod deploy;
mod error;
mod notes;
mod prompt;
mod request;
mod response;
mod transport;
mod upload;

pub use deploy::{DeployManager, DeployRequest};
pub use error::{CoreError, CoreResult};
pub use notes::{NotesFile, NotesGenerator};
pub use prompt::{Prompt, TerminalPrompt};
pub use request::{FormField, UploadRequest};
pub use response::{STATUS_MARKER, UploadResult, parse_response};
pub use transport::{HttpTransport, Transport};
pub use upload::{UploadParams, UploadPipeline, UploadStage};
