//! Multipart upload request.

use std::fmt;
use std::path::{Path, PathBuf};

use liftoff_config::UploadSettings;

/// A single multipart form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    /// A file attachment.
    File {
        /// Field name.
        name: &'static str,
        /// File to attach.
        path: PathBuf,
    },
    /// A plain text value.
    Text {
        /// Field name.
        name: &'static str,
        /// Field value.
        value: String,
    },
}

impl FormField {
    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::File { name, .. } | Self::Text { name, .. } => name,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { name, path } => write!(f, "{name}=@{}", path.display()),
            Self::Text { name, value } => write!(f, "{name}={value}"),
        }
    }
}

/// Everything sent to the build-distribution service for one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Build artifact.
    pub file: PathBuf,
    /// Compressed debug-symbol bundle.
    pub dsym: Option<PathBuf>,
    /// API token.
    pub api_token: String,
    /// Team token.
    pub team_token: String,
    /// Notes file, sent as an attachment.
    pub notes: PathBuf,
    /// Whether testers are notified.
    pub notify: bool,
    /// Distribution list name.
    pub distribution_lists: String,
}

impl UploadRequest {
    /// Assembles a request from resolved settings.
    #[must_use]
    pub fn new(
        file: &Path,
        dsym: Option<PathBuf>,
        notes: &Path,
        settings: &UploadSettings,
        distribution_lists: &str,
    ) -> Self {
        Self {
            file: file.to_path_buf(),
            dsym,
            api_token: settings.credentials.api_token.clone(),
            team_token: settings.credentials.team_token.clone(),
            notes: notes.to_path_buf(),
            notify: settings.notify,
            distribution_lists: distribution_lists.to_string(),
        }
    }

    /// Returns the form fields in submission order.
    #[must_use]
    pub fn fields(&self) -> Vec<FormField> {
        let mut fields = vec![FormField::File {
            name: "file",
            path: self.file.clone(),
        }];

        if let Some(dsym) = &self.dsym {
            fields.push(FormField::File {
                name: "dsym",
                path: dsym.clone(),
            });
        }

        fields.extend([
            FormField::Text {
                name: "api_token",
                value: self.api_token.clone(),
            },
            FormField::Text {
                name: "team_token",
                value: self.team_token.clone(),
            },
            FormField::File {
                name: "notes",
                path: self.notes.clone(),
            },
            FormField::Text {
                name: "notify",
                value: if self.notify { "True" } else { "False" }.to_string(),
            },
            FormField::Text {
                name: "distribution_lists",
                value: self.distribution_lists.clone(),
            },
        ]);

        fields
    }
}
