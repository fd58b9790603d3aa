//! Extracted field records.
//!
//! A [`FieldRecord`] is what the external extraction capability hands back:
//! a flat mapping from field name to a string, a number, or `null`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CheckError;

/// A single extracted value. JSON `null` is represented by `None` at the
/// record level, not by a variant here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Name of the JSON type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "string",
        }
    }

    /// True for empty or whitespace-only text. Numbers are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Text(s) => s.trim().is_empty(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

/// Render a number without a trailing `.0` when it is integral.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Mapping from field name to extracted value (`None` = JSON `null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRecord {
    fields: BTreeMap<String, Option<FieldValue>>,
}

impl FieldRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a record from JSON text. Anything other than a flat object of
    /// strings, numbers and nulls is rejected.
    pub fn from_json(json: &str) -> Result<Self, CheckError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| CheckError::MalformedRecord(e.to_string()))?;
        Self::from_value(value)
    }

    /// Convert an already-parsed JSON value into a record.
    pub fn from_value(value: serde_json::Value) -> Result<Self, CheckError> {
        let serde_json::Value::Object(map) = value else {
            return Err(CheckError::MalformedRecord(format!(
                "expected a JSON object, got {}",
                json_type_name(&value)
            )));
        };

        let mut fields = BTreeMap::new();
        for (name, value) in map {
            let parsed = match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(FieldValue::Text(s)),
                serde_json::Value::Number(n) => {
                    let n = n.as_f64().ok_or_else(|| {
                        CheckError::MalformedRecord(format!("field '{name}' is not a finite number"))
                    })?;
                    Some(FieldValue::Number(n))
                }
                other => {
                    return Err(CheckError::MalformedRecord(format!(
                        "field '{name}' must be a string, number or null, got {}",
                        json_type_name(&other)
                    )));
                }
            };
            fields.insert(name, parsed);
        }
        Ok(Self { fields })
    }

    /// Value of a field, flattening "absent" and "null" into `None`.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).and_then(Option::as_ref)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Option<FieldValue>) {
        self.fields.insert(name.into(), value);
    }

    /// Insert every missing name as `null`, leaving existing values untouched.
    pub fn ensure_keys<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            self.fields.entry(name.as_ref().to_string()).or_insert(None);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FieldValue>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<FieldValue>)> for FieldRecord {
    fn from_iter<I: IntoIterator<Item = (K, Option<FieldValue>)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_strings_numbers_and_nulls() {
        let record = FieldRecord::from_json(
            r#"{"nome_escola": "Colégio Inovação", "alunos_totais": 420, "saldo_loja": null}"#,
        )
        .unwrap();

        assert_eq!(record.len(), 3);
        assert_eq!(
            record.get("nome_escola"),
            Some(&FieldValue::Text("Colégio Inovação".into()))
        );
        assert_eq!(record.get("alunos_totais"), Some(&FieldValue::Number(420.0)));
        assert!(record.contains_key("saldo_loja"));
        assert!(record.get("saldo_loja").is_none());
    }

    #[test]
    fn rejects_non_object_documents() {
        let err = FieldRecord::from_json("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, CheckError::MalformedRecord(_)));
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn rejects_nested_values() {
        let err = FieldRecord::from_json(r#"{"cnpj": ["12", "34"]}"#).unwrap_err();
        assert!(err.to_string().contains("'cnpj'"));

        let err = FieldRecord::from_json(r#"{"ia": true}"#).unwrap_err();
        assert!(err.to_string().contains("boolean"));
    }

    #[test]
    fn ensure_keys_fills_missing_with_null() {
        let mut record: FieldRecord = [("cnpj", Some(FieldValue::from("12.345.678/0001-90")))]
            .into_iter()
            .collect();
        record.ensure_keys(&["cnpj", "whatsapp"]);

        assert_eq!(record.len(), 2);
        assert!(record.contains_key("whatsapp"));
        assert!(record.get("cnpj").is_some());
    }

    #[test]
    fn blank_detection() {
        assert!(FieldValue::from("   ").is_blank());
        assert!(FieldValue::from("").is_blank());
        assert!(!FieldValue::from("x").is_blank());
        assert!(!FieldValue::Number(0.0).is_blank());
    }

    #[test]
    fn numbers_display_without_trailing_zero() {
        assert_eq!(FieldValue::Number(150.0).to_string(), "150");
        assert_eq!(FieldValue::Number(3500.5).to_string(), "3500.5");
        assert_eq!(FieldValue::Number(-500.0).to_string(), "-500");
    }

    #[test]
    fn serializes_back_to_flat_json() {
        let record: FieldRecord = [
            ("alunos_totais", Some(FieldValue::Number(420.0))),
            ("ia", None),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["alunos_totais"], 420.0);
        assert!(json["ia"].is_null());
    }
}
