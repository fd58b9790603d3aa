use dealcheck_core::{CheckError, Status};
use serde::Serialize;
use tracing::info;

use crate::contract::{ContractPipeline, PipelineResult};
use crate::crm::{CrmPipeline, CrmReport};
use crate::status::overall_status;

/// A deal checked from both sides: the CRM record and the signed contract.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub crm: CrmReport,
    pub contract: PipelineResult,
    pub status: Status,
}

/// Run the CRM pipeline and the contract pipeline and consolidate their
/// statuses. The first hard failure aborts the review.
pub fn review<S: AsRef<str>>(
    crm: &CrmPipeline<'_>,
    contract: &ContractPipeline<'_>,
    crm_texts: &[S],
    contract_text: &str,
) -> Result<Review, CheckError> {
    let crm = crm.run(crm_texts)?;
    let contract = contract.run(contract_text)?;
    let status = overall_status(crm.validation.status, contract.status);

    info!(
        crm = crm.validation.status.as_str(),
        contract = contract.status.as_str(),
        status = status.as_str(),
        "review finished"
    );
    Ok(Review {
        crm,
        contract,
        status,
    })
}
