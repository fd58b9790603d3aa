use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`CheckError`].
///
/// Lets a caller tell a bad request apart from a misconfigured deployment or
/// a failing upstream service without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied unusable input.
    Input,
    /// A deployment resource (canonical template, rules file) is missing.
    Resource,
    /// The external extraction capability failed.
    Service,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Resource => "resource",
            Self::Service => "service",
        }
    }
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("document text is empty")]
    EmptyText,

    #[error("unrecognized template '{0}'")]
    UnknownTemplate(String),

    #[error("contract template not identified (markers found: {markers:?})")]
    UndetectedTemplate { markers: Vec<String> },

    #[error("malformed field record: {0}")]
    MalformedRecord(String),

    #[error("canonical template file not found: {path}")]
    TemplateNotFound { path: PathBuf },

    #[error("invalid rules configuration: {0}")]
    Rules(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractError),
}

impl CheckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyText
            | Self::UnknownTemplate(_)
            | Self::UndetectedTemplate { .. }
            | Self::MalformedRecord(_) => ErrorKind::Input,
            Self::TemplateNotFound { .. } | Self::Rules(_) | Self::Io(_) => ErrorKind::Resource,
            Self::Extraction(_) => ErrorKind::Service,
        }
    }
}

/// Failure of the external field-extraction capability.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("extractor has no record for {0} documents")]
    UnsupportedKind(&'static str),
}
