use dealcheck_core::{DocumentKind, ExtractError, ExtractionRequest, FieldExtractor, FieldRecord};
use tracing::debug;

/// Replays records extracted earlier instead of calling a model.
///
/// Used by the CLI when field records are supplied as files, and by tests.
#[derive(Debug, Clone, Default)]
pub struct FixedExtractor {
    crm: Option<FieldRecord>,
    contract: Option<FieldRecord>,
}

impl FixedExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_crm(mut self, record: FieldRecord) -> Self {
        self.crm = Some(record);
        self
    }

    pub fn with_contract(mut self, record: FieldRecord) -> Self {
        self.contract = Some(record);
        self
    }
}

impl FieldExtractor for FixedExtractor {
    fn extract(&self, request: &ExtractionRequest<'_>) -> Result<FieldRecord, ExtractError> {
        let record = match request.kind {
            DocumentKind::Crm => self.crm.as_ref(),
            DocumentKind::Contract => self.contract.as_ref(),
        }
        .ok_or(ExtractError::UnsupportedKind(request.kind.as_str()))?;

        debug!(kind = request.kind.as_str(), fields = record.len(), "replaying fixed record");
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealcheck_core::FieldValue;

    fn request(kind: DocumentKind) -> ExtractionRequest<'static> {
        ExtractionRequest {
            kind,
            text: "",
            template: None,
            expected_fields: &[],
        }
    }

    #[test]
    fn replays_by_kind() {
        let crm: FieldRecord = [("mrr", Some(FieldValue::Number(650.0)))].into_iter().collect();
        let extractor = FixedExtractor::new().with_crm(crm.clone());

        assert_eq!(extractor.extract(&request(DocumentKind::Crm)).unwrap(), crm);
        assert!(matches!(
            extractor.extract(&request(DocumentKind::Contract)),
            Err(ExtractError::UnsupportedKind("contract"))
        ));
    }
}
