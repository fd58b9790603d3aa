//! Contract template identifiers.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a canonical contract template (a "modelo").
///
/// Known identifiers are whatever [`Rules::templates`](crate::Rules) binds;
/// [`Template::unknown`] is the terminal sentinel produced when detection
/// finds no template or more than one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Template(String);

/// Serialized form of the unknown-template sentinel.
pub const UNKNOWN_TEMPLATE: &str = "desconhecido";

impl Template {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        if id == "unknown" {
            return Self::unknown();
        }
        Self(id)
    }

    pub fn unknown() -> Self {
        Self(UNKNOWN_TEMPLATE.to_string())
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_TEMPLATE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Template {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Template::new)
    }
}
