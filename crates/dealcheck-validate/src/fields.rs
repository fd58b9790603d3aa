use std::collections::{HashMap, HashSet};

use dealcheck_core::{
    CheckError, FieldRecord, FieldValidation, FieldValue, Rules, Template, format_number,
};
use tracing::info;

/// Deterministic checks over the fields extracted from a contract.
///
/// Findings accumulate; the record is never rejected on the first violation.
/// A required field that is absent or blank is reported once and skipped by
/// every later rule in the same pass.
pub fn validate_fields(
    rules: &Rules,
    template: &Template,
    fields: &FieldRecord,
) -> Result<FieldValidation, CheckError> {
    let required = &rules.template(template)?.required_fields;
    let policy = &rules.fields;

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut absent: HashSet<&str> = HashSet::new();

    for name in required {
        let Some(value) = fields.get(name).filter(|v| !v.is_blank()) else {
            errors.push(format!("required field missing or empty: '{name}'"));
            absent.insert(name.as_str());
            continue;
        };
        if let Some(text) = value.as_text() {
            if has_placeholder(text, &policy.placeholders) {
                errors.push(format!("field '{name}' contains a placeholder: {text:?}"));
            }
        }
    }

    // Usable numeric values; wrong types and negatives are left out.
    let mut numbers: HashMap<&str, f64> = HashMap::new();
    for name in &policy.numeric_fields {
        if absent.contains(name.as_str()) {
            continue;
        }
        match fields.get(name) {
            None => {}
            Some(FieldValue::Text(text)) => errors.push(format!(
                "field '{name}' must be numeric, got string: {text:?}"
            )),
            Some(FieldValue::Number(n)) if *n < 0.0 => errors.push(format!(
                "field '{name}' cannot be negative (got {})",
                format_number(*n)
            )),
            Some(FieldValue::Number(n)) => {
                numbers.insert(name.as_str(), *n);
            }
        }
    }

    let total = numbers.get(policy.total_count_field.as_str()).copied();
    let gamified = numbers.get(policy.gamified_count_field.as_str()).copied();

    if let (Some(gamified), Some(total)) = (gamified, total) {
        if gamified > total {
            errors.push(format!(
                "'{}' ({}) cannot exceed '{}' ({})",
                policy.gamified_count_field,
                format_number(gamified),
                policy.total_count_field,
                format_number(total)
            ));
        }
    }

    if let Some(total) = total.filter(|t| *t <= policy.low_count_threshold) {
        warnings.push(format!(
            "'{}' is very low ({}); check the value",
            policy.total_count_field,
            format_number(total)
        ));
    }

    if numbers.get(policy.implementation_field.as_str()).copied()
        == Some(policy.zero_implementation_value)
    {
        warnings.push(format!(
            "'{}' is zero; check that implementation is really free of charge",
            policy.implementation_field
        ));
    }

    info!(
        template = %template,
        errors = errors.len(),
        warnings = warnings.len(),
        "validated contract fields"
    );

    Ok(FieldValidation {
        valid: errors.is_empty(),
        critical_errors: errors,
        warnings,
    })
}

fn has_placeholder(text: &str, placeholders: &[String]) -> bool {
    let text = text.to_lowercase();
    placeholders.iter().any(|p| text.contains(&p.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_record() -> FieldRecord {
        FieldRecord::from_json(
            r#"{
                "nome_escola": "Colégio Inovação",
                "razao_social": "Instituto Educacional Ltda.",
                "cnpj": "12.345.678/0001-90",
                "email_login": "admin@colegio.com.br",
                "email_financeiro": "fin@colegio.com.br",
                "whatsapp": "(31) 99999-8888",
                "alunos_totais": 420,
                "alunos_gamificados": 210,
                "implantacao": 3500.0,
                "assinatura": "R$ 890,00/mês",
                "inicio_implantacao": "01/03/2025",
                "inicio_cobranca": "01/04/2025",
                "cards_enviados": "Sim",
                "desconto_primeiro_ano": "10%",
                "saldo_loja": null,
                "ia": "Sim"
            }"#,
        )
        .unwrap()
    }

    fn run(record: &FieldRecord) -> FieldValidation {
        validate_fields(&Rules::default(), &Template::new("novo"), record).unwrap()
    }

    #[test]
    fn clean_record_is_valid() {
        let v = run(&clean_record());
        assert!(v.valid);
        assert!(v.critical_errors.is_empty());
        assert!(v.warnings.is_empty());
    }

    #[test]
    fn gamified_above_total_is_one_error_citing_both() {
        let mut record = clean_record();
        record.insert("alunos_totais", Some(FieldValue::Number(100.0)));
        record.insert("alunos_gamificados", Some(FieldValue::Number(150.0)));

        let v = run(&record);
        assert!(!v.valid);
        assert_eq!(v.critical_errors.len(), 1);
        assert!(v.critical_errors[0].contains("150"));
        assert!(v.critical_errors[0].contains("100"));
    }

    #[test]
    fn low_total_is_a_warning_only() {
        let mut record = clean_record();
        record.insert("alunos_totais", Some(FieldValue::Number(3.0)));
        record.insert("alunos_gamificados", Some(FieldValue::Number(2.0)));

        let v = run(&record);
        assert!(v.valid);
        assert_eq!(v.warnings.len(), 1);
        assert!(v.warnings[0].contains("alunos_totais"));
        assert!(v.warnings[0].contains('3'));
    }

    #[test]
    fn zero_implementation_is_a_warning() {
        let mut record = clean_record();
        record.insert("implantacao", Some(FieldValue::Number(0.0)));

        let v = run(&record);
        assert!(v.valid);
        assert_eq!(v.warnings.len(), 1);
        assert!(v.warnings[0].contains("implantacao"));
    }

    #[test]
    fn missing_blank_and_null_fields_are_reported_once() {
        let mut record = clean_record();
        record.insert("nome_escola", Some("".into()));
        record.insert("razao_social", Some("   ".into()));
        record.insert("email_login", None);
        record.insert("alunos_totais", Some("  ".into()));
        let record: FieldRecord = record
            .iter()
            .filter(|(k, _)| *k != "whatsapp")
            .map(|(k, v)| (k, v.cloned()))
            .collect();

        let v = run(&record);
        assert!(!v.valid);
        assert_eq!(v.critical_errors.len(), 5, "{:?}", v.critical_errors);
        for field in ["nome_escola", "razao_social", "email_login", "whatsapp", "alunos_totais"] {
            assert!(
                v.critical_errors
                    .contains(&format!("required field missing or empty: '{field}'")),
                "no presence error for {field}"
            );
        }
    }

    #[test]
    fn placeholders_are_critical() {
        let mut record = clean_record();
        record.insert("cnpj", Some("{{cnpj}}".into()));
        record.insert("cards_enviados", Some("____".into()));
        record.insert("whatsapp", Some("XXXXX-0000".into()));

        let v = run(&record);
        assert_eq!(v.critical_errors.len(), 3);
        assert!(v.critical_errors.iter().any(|e| e.contains("{{cnpj}}")));
    }

    #[test]
    fn negative_values_are_excluded_from_comparisons() {
        let mut record = clean_record();
        record.insert("alunos_totais", Some(FieldValue::Number(-10.0)));
        record.insert("alunos_gamificados", Some(FieldValue::Number(150.0)));
        record.insert("implantacao", Some(FieldValue::Number(-500.0)));

        let v = run(&record);
        assert_eq!(v.critical_errors.len(), 2, "{:?}", v.critical_errors);
        assert!(v.critical_errors.iter().all(|e| e.contains("negative")));
        assert!(v.critical_errors.iter().any(|e| e.contains("-500")));
        // A negative total is not reported as "very low" either.
        assert!(v.warnings.is_empty());
    }

    #[test]
    fn numeric_strings_are_the_wrong_type() {
        let mut record = clean_record();
        record.insert("implantacao", Some("3.500,00".into()));

        let v = run(&record);
        assert_eq!(v.critical_errors.len(), 1);
        assert!(v.critical_errors[0].contains("must be numeric, got string"));
    }

    #[test]
    fn unknown_template_is_an_input_error() {
        let rules = Rules::default();
        for template in [Template::unknown(), Template::new("v14")] {
            let err = validate_fields(&rules, &template, &clean_record()).unwrap_err();
            assert!(matches!(err, CheckError::UnknownTemplate(_)));
        }
    }

    #[test]
    fn optional_fields_may_be_null() {
        let mut record = clean_record();
        record.insert("desconto_primeiro_ano", None);
        record.insert("ia", None);
        assert!(run(&record).valid);
    }
}
