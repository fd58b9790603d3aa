use dealcheck_core::{FieldRecord, Rules};
use tracing::{debug, info, warn};

use crate::amount::parse_amount;

/// Cross-check the figures a CRM record and a contract record both report.
///
/// Each configured pair whose values parse on both sides and differ yields
/// one warning naming the pair's label and both raw values. Pairs that are
/// absent or unparseable on either side are skipped. Never fails.
pub fn reconcile(rules: &Rules, crm: &FieldRecord, contract: &FieldRecord) -> Vec<String> {
    let mut warnings = Vec::new();

    for pair in &rules.reconcile.pairs {
        let (Some(crm_raw), Some(contract_raw)) =
            (crm.get(&pair.crm_field), contract.get(&pair.contract_field))
        else {
            debug!(label = %pair.label, "reconciliation pair skipped: value absent");
            continue;
        };

        let (Some(crm_value), Some(contract_value)) =
            (parse_amount(crm_raw), parse_amount(contract_raw))
        else {
            warn!(
                label = %pair.label,
                crm = %crm_raw,
                contract = %contract_raw,
                "reconciliation pair skipped: value not numeric"
            );
            continue;
        };

        if crm_value != contract_value {
            warnings.push(format!(
                "divergence in {}: CRM reports {}, contract reports {}",
                pair.label, crm_raw, contract_raw
            ));
        }
    }

    info!(
        pairs = rules.reconcile.pairs.len(),
        divergences = warnings.len(),
        "reconciled crm and contract"
    );
    warnings
}
