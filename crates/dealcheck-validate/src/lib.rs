//! Deterministic validation engine: template detection, clause segmentation
//! and comparison, field rules, CRM rules and CRM–contract reconciliation.
//!
//! Nothing in this crate calls out to an extraction service; every function
//! is a pure function of its inputs, the [`Rules`](dealcheck_core::Rules) and,
//! for clause validation, the canonical template files.

pub mod amount;
pub mod clauses;
pub mod crm;
pub mod detector;
pub mod fields;
pub mod library;
pub mod reconcile;
pub mod segment;
pub mod similarity;

pub use amount::parse_amount;
pub use clauses::{compare_clauses, validate_clauses};
pub use crm::{expected_group, validate_crm};
pub use detector::detect;
pub use fields::validate_fields;
pub use library::TemplateLibrary;
pub use reconcile::reconcile;
pub use segment::{ClauseMap, segment};
pub use similarity::similarity;
