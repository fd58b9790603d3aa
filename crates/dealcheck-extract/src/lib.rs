//! Field extraction adapters.
//!
//! [`AnthropicExtractor`] asks a Claude model for the fields of a document and
//! checks the shape of what comes back; [`FixedExtractor`] replays records
//! that were extracted earlier.

pub mod anthropic;
pub mod fixed;
pub mod json_block;
pub mod prompt;
pub mod shape;

pub use anthropic::{AnthropicConfig, AnthropicExtractor, DEFAULT_MODEL};
pub use fixed::FixedExtractor;
pub use json_block::first_json_object;
pub use shape::{shape_contract, shape_crm, student_count};
