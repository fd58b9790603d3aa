//! Prompts for the extraction model.

use dealcheck_core::{DocumentKind, ExtractionRequest};

const CONTRACT_SYSTEM: &str = "\
You extract data from Brazilian school subscription contracts.

Return EXCLUSIVELY one JSON object, starting with { and ending with }.
No markdown, no code fences, no commentary.

Absolute rules:
- Never invent or estimate values that are not literally in the text.
- Use null for any field that is absent or ambiguous. When in doubt, prefer null.
- Numeric fields must be JSON numbers, not strings: 1500.00, never \"1500.00\".
- Dates, names, identifiers and free text are strings.
- Do not include a template or model field; the caller already knows it.

Wrap the fields in a \"dados\" object:
{\"dados\": { ... }}";

const CRM_SYSTEM: &str = "\
You extract data from CRM screens of a school sales pipeline.

Return EXCLUSIVELY one JSON object, starting with { and ending with }.
No markdown, no code fences, no commentary.

Extraction rules:
- Extract only what is clearly and literally present in the text.
- If a field is absent or there is any doubt about it, return null.
- Never estimate, deduce, infer from outside knowledge, or calculate.
- Never derive \"arr\" from \"mrr\" or from any other field.
- Money values are JSON numbers, not strings.
- \"numero_alunos\" may be returned as the literal range text when the CRM shows
  a range (e.g. \"Até 50 alunos\", \"51–100 alunos\", \"Mais de 1001 alunos\").

Section mapping:
- Deal section (\"Negociação\"): nome (the deal name, not a person), nome_escola,
  vendedor, perfil_escola, numero_alunos, nivel_prioridade (e.g. \"GRUPO A\"), mrr,
  arr, dor_escola, valor_implantacao, link_contrato, forma_implantacao.
- Contacts section (\"Contatos\"): contato_nome, contato_telefone, contato_email,
  taken from the first contact only. Never use a name from the deal section.
  When there is no contacts section, all three are null.";

/// System prompt for a document kind, listing the keys to return.
pub fn system_prompt(request: &ExtractionRequest<'_>, numeric_fields: &[String]) -> String {
    let base = match request.kind {
        DocumentKind::Contract => CONTRACT_SYSTEM,
        DocumentKind::Crm => CRM_SYSTEM,
    };

    let mut prompt = String::from(base);
    prompt.push_str("\n\nReturn exactly these keys:\n");
    for name in request.expected_fields {
        let ty = if request.kind == DocumentKind::Contract && numeric_fields.contains(name) {
            "number | null"
        } else {
            "string | number | null"
        };
        prompt.push_str(&format!("- {name}: {ty}\n"));
    }
    prompt
}

/// User turn carrying the document text.
pub fn user_prompt(request: &ExtractionRequest<'_>) -> String {
    match (request.kind, request.template) {
        (DocumentKind::Contract, Some(template)) => format!(
            "Identified contract template: {template}\n\nExtract the data from this contract:\n\n{}",
            request.text
        ),
        (DocumentKind::Contract, None) => {
            format!("Extract the data from this contract:\n\n{}", request.text)
        }
        (DocumentKind::Crm, _) => {
            format!("Extract the data from this CRM text:\n\n{}", request.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealcheck_core::Template;

    #[test]
    fn contract_prompt_types_numeric_fields() {
        let expected = vec!["cnpj".to_string(), "implantacao".to_string()];
        let template = Template::new("novo");
        let request = ExtractionRequest {
            kind: DocumentKind::Contract,
            text: "CONTRATO ...",
            template: Some(&template),
            expected_fields: &expected,
        };

        let system = system_prompt(&request, &["implantacao".to_string()]);
        assert!(system.contains("- implantacao: number | null"));
        assert!(system.contains("- cnpj: string | number | null"));
        assert!(system.contains("\"dados\""));

        let user = user_prompt(&request);
        assert!(user.starts_with("Identified contract template: novo"));
        assert!(user.ends_with("CONTRATO ..."));
    }

    #[test]
    fn crm_prompt_lists_keys() {
        let expected = vec!["mrr".to_string()];
        let request = ExtractionRequest {
            kind: DocumentKind::Crm,
            text: "MRR: 650",
            template: None,
            expected_fields: &expected,
        };
        let system = system_prompt(&request, &[]);
        assert!(system.contains("Never derive \"arr\""));
        assert!(system.ends_with("- mrr: string | number | null\n"));
    }
}
