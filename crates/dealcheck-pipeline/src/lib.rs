//! Orchestration of the validation engine around an extraction capability.
//!
//! - [`ContractPipeline`]: contract text → template → fields → clauses or
//!   CRM reconciliation → status.
//! - [`CrmPipeline`]: CRM screen texts → fields → CRM rules → status.
//! - [`review`]: both of the above, consolidated into one status.

pub mod contract;
pub mod crm;
pub mod review;
pub mod status;

pub use contract::{ContractPipeline, PipelineResult};
pub use crm::{CrmPipeline, CrmReport};
pub use review::{Review, review};
pub use status::{contract_status, overall_status, reconciliation_status};
