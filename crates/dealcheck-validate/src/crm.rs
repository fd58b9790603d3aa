//! Consistency checks over an extracted CRM record.

use dealcheck_core::rules::CrmRules;
use dealcheck_core::{CrmValidation, FieldRecord, FieldValue, Status, format_number};
use tracing::info;

/// Validate a CRM record. Every rule runs; errors accumulate.
pub fn validate_crm(rules: &CrmRules, fields: &FieldRecord) -> CrmValidation {
    let mut errors = Vec::new();

    for name in &rules.required_fields {
        if present(fields, name).is_none() {
            errors.push(format!("required field missing or empty: '{name}'"));
        }
    }

    if let Some(students) = present(fields, "numero_alunos") {
        if let Err(e) = check_student_count(students) {
            errors.push(e);
        }
    }

    let mrr = match present(fields, "mrr").map(as_f64) {
        None => None,
        Some(None) => {
            errors.push("'mrr' must be numeric".to_string());
            None
        }
        Some(Some(mrr)) if mrr <= 0.0 => {
            errors.push("'mrr' must be greater than zero".to_string());
            None
        }
        Some(Some(mrr)) => Some(mrr),
    };

    if let (Some(mrr), Some(level)) = (mrr, present(fields, "nivel_prioridade")) {
        let expected = expected_group(rules, mrr);
        if level.to_string().trim().to_uppercase() != expected.to_uppercase() {
            errors.push(format!(
                "'nivel_prioridade' is inconsistent with MRR {}; expected {expected}",
                format_number(mrr)
            ));
        }
    }

    if let Some(arr) = present(fields, "arr") {
        match (as_f64(arr), mrr) {
            (None, _) => errors.push("'arr' must be numeric".to_string()),
            (Some(arr), Some(mrr)) => {
                let expected = round10(mrr * rules.arr_months);
                if round10(arr) != expected {
                    errors.push(format!(
                        "'arr' must be exactly {} × mrr (expected {}, got {})",
                        format_number(rules.arr_months),
                        format_number(expected),
                        format_number(arr)
                    ));
                }
            }
            (Some(_), None) => {}
        }
    }

    if let Some(phone) = present(fields, "contato_telefone") {
        let digits = phone.to_string().chars().filter(char::is_ascii_digit).count();
        if digits < rules.min_phone_digits {
            errors.push(format!(
                "'contato_telefone' must have at least {} digits (found {digits})",
                rules.min_phone_digits
            ));
        }
    }

    if let Some(email) = present(fields, "contato_email") {
        if !email.to_string().contains('@') {
            errors.push("'contato_email' must contain '@'".to_string());
        }
    }

    if let Some(link) = present(fields, "link_contrato") {
        let link = link.to_string().trim().to_lowercase();
        if !link.starts_with(&rules.link_prefix.to_lowercase()) {
            errors.push(format!("'link_contrato' must start with '{}'", rules.link_prefix));
        }
    }

    let status = if errors.is_empty() {
        Status::Valid
    } else {
        Status::Invalid
    };
    info!(status = status.as_str(), errors = errors.len(), "validated crm record");
    CrmValidation { status, errors }
}

/// Group the MRR falls into, checking bands top-down.
pub fn expected_group(rules: &CrmRules, mrr: f64) -> &str {
    rules
        .priority_bands
        .iter()
        .find(|band| {
            if band.inclusive {
                mrr >= band.min_mrr
            } else {
                mrr > band.min_mrr
            }
        })
        .map_or(rules.fallback_group.as_str(), |band| band.group.as_str())
}

fn present<'a>(fields: &'a FieldRecord, name: &str) -> Option<&'a FieldValue> {
    fields.get(name).filter(|v| !v.is_blank())
}

fn as_f64(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(n) => Some(*n),
        FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
    }
}

fn check_student_count(value: &FieldValue) -> Result<(), String> {
    let count = match value {
        FieldValue::Number(n) => *n,
        FieldValue::Text(s) => s
            .trim()
            .parse::<i64>()
            .map(|n| n as f64)
            .map_err(|_| "'numero_alunos' must be a valid integer".to_string())?,
    };
    if count.trunc() <= 0.0 {
        Err("'numero_alunos' must be an integer greater than zero".to_string())
    } else if count.fract() != 0.0 {
        Err("'numero_alunos' must be a whole number".to_string())
    } else {
        Ok(())
    }
}

fn round10(x: f64) -> f64 {
    (x * 1e10).round() / 1e10
}
