//! Validation result records shared by validators, pipelines and the CLI.

use serde::{Deserialize, Serialize};

use crate::Template;

/// Consolidated verdict of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Valid,
    Invalid,
    /// A human has to adjudicate; neither pass nor hard fail.
    ManualReview,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::ManualReview => "manual_review",
        }
    }
}

/// Legal risk derived from clause discrepancies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Outcome of template detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub template: Template,
    pub confidence: f64,
    pub markers_found: Vec<String>,
}

/// Outcome of one field-validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValidation {
    pub valid: bool,
    pub critical_errors: Vec<String>,
    /// Non-fatal findings; never affect `valid`.
    pub warnings: Vec<String>,
}

/// Outcome of comparing a contract's clauses with its canonical template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseValidation {
    /// False when any clause is missing or extra. Alterations only raise risk.
    pub valid: bool,
    pub altered: Vec<String>,
    pub missing: Vec<String>,
    pub extra: Vec<String>,
    pub risk_level: RiskLevel,
    /// Markers that appeared more than once in the contract. Diagnostic only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicate_markers: Vec<String>,
}

/// Outcome of validating a CRM record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmValidation {
    /// Either [`Status::Valid`] or [`Status::Invalid`].
    pub status: Status,
    pub errors: Vec<String>,
}
