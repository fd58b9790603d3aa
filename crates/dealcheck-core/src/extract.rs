//! The field-extraction capability consumed by the pipelines.
//!
//! Extraction itself (an LLM call, a replayed record, ...) happens elsewhere;
//! the core only relies on this contract: given raw text and, for contracts,
//! the detected template, return a [`FieldRecord`] or fail.

use serde::{Deserialize, Serialize};

use crate::{ExtractError, FieldRecord, Template};

/// Which kind of document the text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// CRM screenshots, already turned into text.
    Crm,
    /// Sales contract text.
    Contract,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crm => "crm",
            Self::Contract => "contract",
        }
    }
}

/// One extraction call.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRequest<'a> {
    pub kind: DocumentKind,
    pub text: &'a str,
    /// Detected template; set for contracts, `None` for CRM text.
    pub template: Option<&'a Template>,
    /// Field names the record must carry (as `null` when undetermined).
    pub expected_fields: &'a [String],
}

/// Source of structured fields for a document.
///
/// Implementations must never fabricate values: anything they cannot read
/// with confidence is returned as `null`.
pub trait FieldExtractor {
    fn extract(&self, request: &ExtractionRequest<'_>) -> Result<FieldRecord, ExtractError>;
}

impl<T: FieldExtractor + ?Sized> FieldExtractor for &T {
    fn extract(&self, request: &ExtractionRequest<'_>) -> Result<FieldRecord, ExtractError> {
        (**self).extract(request)
    }
}

impl<T: FieldExtractor + ?Sized> FieldExtractor for Box<T> {
    fn extract(&self, request: &ExtractionRequest<'_>) -> Result<FieldRecord, ExtractError> {
        (**self).extract(request)
    }
}
