//! Contract pipeline: detect → extract → validate → consolidate.

use std::path::{Path, PathBuf};

use dealcheck_core::{
    CheckError, ClauseValidation, Detection, DocumentKind, ExtractionRequest, FieldExtractor,
    FieldRecord, FieldValidation, RiskLevel, Rules, Status, Template,
};
use dealcheck_validate::{detect, reconcile, validate_clauses, validate_fields};
use serde::Serialize;
use tracing::info;

use crate::status::{contract_status, reconciliation_status};

/// Everything one contract run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub template: Template,
    pub detection: Detection,
    pub extracted_fields: FieldRecord,
    pub field_validation: FieldValidation,
    /// Set by [`ContractPipeline::run`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clause_validation: Option<ClauseValidation>,
    /// Set by [`ContractPipeline::run_reconciliation`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconciliation_warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    pub status: Status,
}

/// Runs contract text through detection, extraction and validation.
pub struct ContractPipeline<'a> {
    rules: &'a Rules,
    template_dir: PathBuf,
    extractor: &'a dyn FieldExtractor,
}

/// The steps both pipeline variants share.
struct Prepared {
    detection: Detection,
    fields: FieldRecord,
    field_validation: FieldValidation,
}

impl<'a> ContractPipeline<'a> {
    /// Pipeline reading canonical templates from the rules' default directory.
    pub fn new(rules: &'a Rules, extractor: &'a dyn FieldExtractor) -> Self {
        Self {
            rules,
            template_dir: rules.template_dir.clone(),
            extractor,
        }
    }

    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = dir.into();
        self
    }

    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    /// Validate fields and clauses against the canonical template.
    pub fn run(&self, text: &str) -> Result<PipelineResult, CheckError> {
        let prepared = self.prepare(text)?;
        let template = prepared.detection.template.clone();

        let clauses =
            validate_clauses(self.rules, &template, text, Some(self.template_dir.as_path()))?;
        let status = contract_status(&prepared.field_validation, &clauses);
        info!(template = %template, status = status.as_str(), "contract pipeline finished");

        Ok(PipelineResult {
            template,
            detection: prepared.detection,
            extracted_fields: prepared.fields,
            field_validation: prepared.field_validation,
            risk_level: Some(clauses.risk_level),
            clause_validation: Some(clauses),
            reconciliation_warnings: None,
            status,
        })
    }

    /// Validate fields and cross-check them with a CRM record instead of
    /// comparing clauses.
    pub fn run_reconciliation(
        &self,
        text: &str,
        crm_fields: &FieldRecord,
    ) -> Result<PipelineResult, CheckError> {
        let prepared = self.prepare(text)?;
        let template = prepared.detection.template.clone();

        let warnings = reconcile(self.rules, crm_fields, &prepared.fields);
        let status = reconciliation_status(&prepared.field_validation, &warnings);
        info!(
            template = %template,
            divergences = warnings.len(),
            status = status.as_str(),
            "reconciliation pipeline finished"
        );

        Ok(PipelineResult {
            template,
            detection: prepared.detection,
            extracted_fields: prepared.fields,
            field_validation: prepared.field_validation,
            clause_validation: None,
            reconciliation_warnings: Some(warnings),
            risk_level: None,
            status,
        })
    }

    fn prepare(&self, text: &str) -> Result<Prepared, CheckError> {
        if text.trim().is_empty() {
            return Err(CheckError::EmptyText);
        }

        let detection = detect(self.rules, text);
        if detection.template.is_unknown() {
            return Err(CheckError::UndetectedTemplate {
                markers: detection.markers_found,
            });
        }
        let template = &detection.template;

        let expected = self.rules.contract_field_names(template)?;
        let request = ExtractionRequest {
            kind: DocumentKind::Contract,
            text,
            template: Some(template),
            expected_fields: &expected,
        };
        let mut fields = self.extractor.extract(&request)?;
        fields.ensure_keys(&expected);

        let field_validation = validate_fields(self.rules, template, &fields)?;
        Ok(Prepared {
            detection,
            fields,
            field_validation,
        })
    }
}
