//! Core types, rule configuration and error taxonomy for dealcheck.

pub mod error;
pub mod extract;
pub mod fields;
pub mod report;
pub mod rules;
pub mod template;
pub mod text;

pub use error::{CheckError, ErrorKind, ExtractError};
pub use extract::{DocumentKind, ExtractionRequest, FieldExtractor};
pub use fields::{FieldRecord, FieldValue, format_number};
pub use report::{ClauseValidation, CrmValidation, Detection, FieldValidation, RiskLevel, Status};
pub use rules::Rules;
pub use template::{Template, UNKNOWN_TEMPLATE};
pub use text::normalize;
