//! Upload transport.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::blocking::multipart::Form;
use tracing::{debug, info};

use crate::{CoreResult, FormField, STATUS_MARKER, UploadRequest};

/// Delivers an upload request and returns the raw response text.
///
/// The returned text must end with [`STATUS_MARKER`] followed by the HTTP
/// status code, so it can be handed to [`crate::parse_response`].
pub trait Transport {
    /// Posts `request` to `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or sent.
    fn submit(&self, url: &str, request: &UploadRequest) -> CoreResult<String>;
}

/// Multipart HTTP transport backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn new(timeout: Duration) -> CoreResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("liftoff/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn submit(&self, url: &str, request: &UploadRequest) -> CoreResult<String> {
        let mut form = Form::new();
        for field in request.fields() {
            debug!(field = field.name(), "adding form field");
            form = match field {
                FormField::File { name, path } => form.file(name, path)?,
                FormField::Text { name, value } => form.text(name, value),
            };
        }

        info!(url, "posting build");
        let response = self.client.post(url).multipart(form).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        debug!(status, bytes = body.len(), "received upload response");

        Ok(format!("{body}{STATUS_MARKER}{status}"))
    }
}
