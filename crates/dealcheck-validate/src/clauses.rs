//! Clause integrity against the canonical template.
//!
//! The contract is segmented the same way as its canonical text and each
//! clause is compared by marker. Missing or extra clauses invalidate the
//! contract; altered clauses only raise the risk level.

use std::path::Path;

use dealcheck_core::rules::ClauseRules;
use dealcheck_core::{CheckError, ClauseValidation, RiskLevel, Rules, Template};
use tracing::{debug, info};

use crate::library::TemplateLibrary;
use crate::segment::{ClauseMap, segment};
use crate::similarity::similarity;

/// Compare a contract's clauses with the canonical template's.
///
/// `base_dir` overrides the template directory configured in `rules`.
pub fn validate_clauses(
    rules: &Rules,
    template: &Template,
    contract_text: &str,
    base_dir: Option<&Path>,
) -> Result<ClauseValidation, CheckError> {
    let library = match base_dir {
        Some(dir) => TemplateLibrary::new(dir),
        None => TemplateLibrary::from_rules(rules),
    };
    let base = segment(&library.load(rules, template)?);
    let contract = segment(contract_text);

    let result = compare_clauses(&rules.clauses, &base, &contract);
    info!(
        template = %template,
        base_clauses = base.len(),
        contract_clauses = contract.len(),
        altered = result.altered.len(),
        missing = result.missing.len(),
        extra = result.extra.len(),
        risk = result.risk_level.as_str(),
        "validated contract clauses"
    );
    Ok(result)
}

/// Pure comparison of two segmented texts.
///
/// Markers are reported in the order they appear in their own text: `missing`
/// and `altered` follow the base, `extra` follows the contract.
pub fn compare_clauses(
    rules: &ClauseRules,
    base: &ClauseMap,
    contract: &ClauseMap,
) -> ClauseValidation {
    let mut altered = Vec::new();
    let mut missing = Vec::new();

    for (marker, base_content) in base.iter() {
        let Some(contract_content) = contract.get(marker) else {
            missing.push(marker.to_string());
            continue;
        };
        let score = similarity(base_content, contract_content);
        debug!(marker, score, "clause similarity");
        if score < rules.similarity_threshold {
            altered.push(marker.to_string());
        }
    }

    let extra: Vec<String> = contract
        .markers()
        .filter(|m| !base.contains(m))
        .map(str::to_string)
        .collect();

    let risk_level = risk_level(rules, &altered, &missing, &extra, base, contract);

    ClauseValidation {
        valid: missing.is_empty() && extra.is_empty(),
        altered,
        missing,
        extra,
        risk_level,
        duplicate_markers: contract.duplicates().to_vec(),
    }
}

fn risk_level(
    rules: &ClauseRules,
    altered: &[String],
    missing: &[String],
    extra: &[String],
    base: &ClauseMap,
    contract: &ClauseMap,
) -> RiskLevel {
    if !missing.is_empty() || !extra.is_empty() {
        return RiskLevel::High;
    }

    let touches_critical_term = altered.iter().any(|marker| {
        let combined = format!(
            "{} {}",
            base.get(marker).unwrap_or_default(),
            contract.get(marker).unwrap_or_default()
        )
        .to_lowercase();
        rules
            .critical_keywords
            .iter()
            .any(|k| combined.contains(&k.to_lowercase()))
    });

    if touches_critical_term {
        RiskLevel::High
    } else if !altered.is_empty() {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "\
1. OBJETO DO CONTRATO
O presente contrato tem por objeto a prestação de serviços de software educacional.

2. PRAZO DE VIGÊNCIA
O contrato terá duração de 12 meses, renovável automaticamente.

3. VALOR E REAJUSTE
O valor mensal é fixo, sujeito a reajuste anual pelo IPCA.

4. RESCISÃO
Qualquer das partes poderá rescindir com aviso prévio de 30 dias, mediante multa de 20%.
";

    fn library_with(base: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("modelo_novo_base.txt"), base).unwrap();
        dir
    }

    fn run(contract: &str) -> ClauseValidation {
        let dir = library_with(BASE);
        validate_clauses(&Rules::default(), &Template::new("novo"), contract, Some(dir.path()))
            .unwrap()
    }

    #[test]
    fn identical_contract_is_clean() {
        let v = run(BASE);
        assert!(v.valid);
        assert!(v.altered.is_empty());
        assert!(v.missing.is_empty());
        assert!(v.extra.is_empty());
        assert_eq!(v.risk_level, RiskLevel::Low);
    }

    #[test]
    fn formatting_differences_are_not_alterations() {
        let reflowed = BASE.to_uppercase().replace(' ', "  ").replace('\n', "\n\n");
        let v = run(&reflowed);
        assert!(v.valid);
        assert_eq!(v.risk_level, RiskLevel::Low);
    }

    #[test]
    fn missing_extra_and_altered_clauses() {
        let contract = "\
1. OBJETO DO CONTRATO
O presente contrato tem por objeto a prestação de serviços de software educacional.

2. PRAZO DE VIGÊNCIA
O contrato terá duração de 12 meses, renovável automaticamente.

3. VALOR E REAJUSTE
O valor mensal poderá ser alterado a qualquer momento pela CONTRATADA, sem aviso.

5. EXCLUSIVIDADE
A escola se compromete a não contratar concorrentes.
";
        let v = run(contract);
        assert!(!v.valid);
        assert_eq!(v.missing, ["4"]);
        assert_eq!(v.extra, ["5"]);
        assert_eq!(v.altered, ["3"]);
        assert_eq!(v.risk_level, RiskLevel::High);
    }

    #[test]
    fn altered_critical_clause_is_high_risk_but_valid() {
        let contract = BASE.replace("multa de 20%", "multa de 80% sobre o valor total restante");
        let v = run(&contract);
        assert!(v.valid);
        assert_eq!(v.altered, ["4"]);
        assert_eq!(v.risk_level, RiskLevel::High);
    }

    #[test]
    fn altered_plain_clause_is_medium_risk() {
        let contract = BASE.replace(
            "prestação de serviços de software educacional",
            "licença de uso de plataforma gamificada para escolas",
        );
        let v = run(&contract);
        assert!(v.valid);
        assert_eq!(v.altered, ["1"]);
        assert_eq!(v.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn missing_base_file_is_a_resource_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_clauses(&Rules::default(), &Template::new("novo"), BASE, Some(dir.path()))
            .unwrap_err();
        assert!(matches!(err, CheckError::TemplateNotFound { .. }));
    }

    #[test]
    fn unknown_template_is_rejected_before_any_io() {
        let err = validate_clauses(&Rules::default(), &Template::unknown(), BASE, None).unwrap_err();
        assert!(matches!(err, CheckError::UnknownTemplate(_)));
    }

    #[test]
    fn duplicate_contract_markers_are_surfaced() {
        let contract = format!(
            "{BASE}\n2. PRAZO DE VIGÊNCIA\nO contrato terá duração de 12 meses, renovável automaticamente.\n"
        );
        let v = run(&contract);
        assert_eq!(v.duplicate_markers, ["2"]);
    }

    #[test]
    fn compare_clauses_is_pure() {
        let base = segment("1. Objeto\n2. Prazo de doze meses\n");
        let contract = segment("1. Objeto\n2. Prazo de vinte e quatro meses\n");

        let v = compare_clauses(&ClauseRules::default(), &base, &contract);
        assert!(v.valid);
        assert_eq!(v.altered, ["2"]);
        assert_eq!(v.risk_level, RiskLevel::High);
    }

    #[test]
    fn threshold_comes_from_rules() {
        let base = segment("1. Objeto do contrato de software\n");
        let contract = segment("1. Objeto do contrato de software livre\n");

        let strict = ClauseRules::default();
        assert_eq!(compare_clauses(&strict, &base, &contract).altered, ["1"]);

        let lenient = ClauseRules {
            similarity_threshold: 0.9,
            ..ClauseRules::default()
        };
        assert!(compare_clauses(&lenient, &base, &contract).altered.is_empty());
    }
}
