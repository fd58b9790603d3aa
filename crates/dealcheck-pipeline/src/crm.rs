//! CRM pipeline: consolidate screen texts → extract → validate.

use dealcheck_core::{
    CheckError, CrmValidation, DocumentKind, ExtractionRequest, FieldExtractor, FieldRecord, Rules,
};
use dealcheck_validate::validate_crm;
use serde::Serialize;
use tracing::info;

/// Everything one CRM run produced.
#[derive(Debug, Clone, Serialize)]
pub struct CrmReport {
    /// The consolidated text that was sent for extraction.
    pub text: String,
    pub fields: FieldRecord,
    pub validation: CrmValidation,
}

pub struct CrmPipeline<'a> {
    rules: &'a Rules,
    extractor: &'a dyn FieldExtractor,
}

impl<'a> CrmPipeline<'a> {
    pub fn new(rules: &'a Rules, extractor: &'a dyn FieldExtractor) -> Self {
        Self { rules, extractor }
    }

    /// Validate the CRM record described by one or more screen texts.
    ///
    /// Blank texts are dropped; the rest are trimmed and joined by a blank
    /// line. Nothing left is an input error.
    pub fn run<S: AsRef<str>>(&self, texts: &[S]) -> Result<CrmReport, CheckError> {
        let text = consolidate(texts);
        if text.is_empty() {
            return Err(CheckError::EmptyText);
        }

        let expected = &self.rules.crm.required_fields;
        let request = ExtractionRequest {
            kind: DocumentKind::Crm,
            text: &text,
            template: None,
            expected_fields: expected,
        };
        let mut fields = self.extractor.extract(&request)?;
        fields.ensure_keys(expected);

        let validation = validate_crm(&self.rules.crm, &fields);
        info!(
            sources = texts.len(),
            chars = text.len(),
            status = validation.status.as_str(),
            "crm pipeline finished"
        );
        Ok(CrmReport {
            text,
            fields,
            validation,
        })
    }
}

fn consolidate<S: AsRef<str>>(texts: &[S]) -> String {
    texts
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
