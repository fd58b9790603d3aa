//! Status consolidation. Each function applies its precedence top-down and
//! the first matching rule decides.

use dealcheck_core::{ClauseValidation, FieldValidation, RiskLevel, Status};

/// Fields and clauses together.
///
/// 1. invalid fields → invalid
/// 2. missing or extra clauses → invalid
/// 3. medium or high risk → manual review
/// 4. otherwise valid
pub fn contract_status(fields: &FieldValidation, clauses: &ClauseValidation) -> Status {
    let structural = !clauses.missing.is_empty() || !clauses.extra.is_empty();
    if !fields.valid || structural {
        Status::Invalid
    } else if clauses.risk_level >= RiskLevel::Medium {
        Status::ManualReview
    } else {
        Status::Valid
    }
}

/// Fields and CRM reconciliation together.
///
/// 1. invalid fields → invalid
/// 2. any divergence → manual review
/// 3. otherwise valid
pub fn reconciliation_status(fields: &FieldValidation, divergences: &[String]) -> Status {
    if !fields.valid {
        Status::Invalid
    } else if !divergences.is_empty() {
        Status::ManualReview
    } else {
        Status::Valid
    }
}

/// CRM status and contract status together.
///
/// 1. CRM invalid → invalid
/// 2. contract invalid → invalid
/// 3. contract in manual review → manual review
/// 4. otherwise valid
pub fn overall_status(crm: Status, contract: Status) -> Status {
    match (crm, contract) {
        (Status::Invalid, _) | (_, Status::Invalid) => Status::Invalid,
        (_, Status::ManualReview) => Status::ManualReview,
        _ => Status::Valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(valid: bool) -> FieldValidation {
        FieldValidation {
            valid,
            critical_errors: if valid { vec![] } else { vec!["x".into()] },
            warnings: vec![],
        }
    }

    fn clauses(missing: &[&str], extra: &[&str], risk_level: RiskLevel) -> ClauseValidation {
        let owned = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        ClauseValidation {
            valid: missing.is_empty() && extra.is_empty(),
            altered: vec![],
            missing: owned(missing),
            extra: owned(extra),
            risk_level,
            duplicate_markers: vec![],
        }
    }

    #[test]
    fn invalid_fields_win_over_everything() {
        let status = contract_status(&fields(false), &clauses(&[], &[], RiskLevel::Low));
        assert_eq!(status, Status::Invalid);
        let status = contract_status(&fields(false), &clauses(&["4"], &[], RiskLevel::High));
        assert_eq!(status, Status::Invalid);
    }

    #[test]
    fn structural_clause_changes_are_invalid() {
        let status = contract_status(&fields(true), &clauses(&[], &["9"], RiskLevel::High));
        assert_eq!(status, Status::Invalid);
    }

    #[test]
    fn elevated_risk_needs_review() {
        for risk in [RiskLevel::Medium, RiskLevel::High] {
            let status = contract_status(&fields(true), &clauses(&[], &[], risk));
            assert_eq!(status, Status::ManualReview);
        }
        let status = contract_status(&fields(true), &clauses(&[], &[], RiskLevel::Low));
        assert_eq!(status, Status::Valid);
    }

    #[test]
    fn reconciliation_precedence() {
        let divergence = vec!["divergence in total de alunos".to_string()];
        assert_eq!(reconciliation_status(&fields(false), &divergence), Status::Invalid);
        assert_eq!(reconciliation_status(&fields(true), &divergence), Status::ManualReview);
        assert_eq!(reconciliation_status(&fields(true), &[]), Status::Valid);
    }

    #[test]
    fn overall_precedence() {
        use Status::*;
        assert_eq!(overall_status(Invalid, Valid), Invalid);
        assert_eq!(overall_status(Invalid, ManualReview), Invalid);
        assert_eq!(overall_status(Valid, Invalid), Invalid);
        assert_eq!(overall_status(Valid, ManualReview), ManualReview);
        assert_eq!(overall_status(ManualReview, Valid), Valid);
        assert_eq!(overall_status(Valid, Valid), Valid);
    }
}
