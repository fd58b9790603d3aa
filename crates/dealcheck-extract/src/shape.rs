//! Turning a parsed model reply into a [`FieldRecord`].
//!
//! Replies are checked strictly: a value of the wrong shape fails the whole
//! extraction rather than being coerced, so that the validators only ever see
//! what the document actually said.

use std::sync::LazyLock;

use dealcheck_core::{ExtractError, FieldRecord, FieldValue};
use regex::Regex;
use serde_json::{Map, Value};

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid pattern"));

/// Shape a contract reply.
///
/// The fields may be wrapped in a `"dados"` object; anything outside it is
/// ignored. `numeric_fields` must hold numbers or `null`. Expected keys the
/// reply omits are added as `null`.
pub fn shape_contract(
    reply: Map<String, Value>,
    expected: &[String],
    numeric_fields: &[String],
) -> Result<FieldRecord, ExtractError> {
    let fields = match reply.get("dados") {
        Some(Value::Object(inner)) => inner.clone(),
        Some(other) => {
            return Err(ExtractError::MalformedResponse(format!(
                "'dados' must be an object, got {}",
                type_name(other)
            )));
        }
        None => reply,
    };

    let mut problems = Vec::new();
    for name in numeric_fields {
        match fields.get(name) {
            None | Some(Value::Null) | Some(Value::Number(_)) => {}
            Some(other) => problems.push(format!(
                "'{name}' must be a number or null, got {}: {other}",
                type_name(other)
            )),
        }
    }

    let mut record = to_record(fields, &mut problems);
    if !problems.is_empty() {
        return Err(ExtractError::MalformedResponse(problems.join("; ")));
    }
    record.ensure_keys(expected);
    Ok(record)
}

/// Shape a CRM reply. Student-count ranges are reduced to a single count.
pub fn shape_crm(
    reply: Map<String, Value>,
    expected: &[String],
) -> Result<FieldRecord, ExtractError> {
    let students = reply.get("numero_alunos").cloned();

    let mut problems = Vec::new();
    let mut record = to_record(reply, &mut problems);
    if !problems.is_empty() {
        return Err(ExtractError::MalformedResponse(problems.join("; ")));
    }

    if let Some(students) = students {
        let count = student_count(&students).map(FieldValue::from);
        record.insert("numero_alunos", count);
    }
    record.ensure_keys(expected);
    Ok(record)
}

/// Read a student count from a number or a textual range.
///
/// `"Até 50 alunos"` → 50, `"51–100 alunos"` → 100 (upper bound),
/// `"Mais de 1001 alunos"` → 1001, `"450"` → 450. Fractional numbers are
/// truncated. Text without digits gives `None`.
pub fn student_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let text = s.trim();
            let numbers: Vec<i64> = DIGIT_RUN
                .find_iter(text)
                .filter_map(|m| m.as_str().parse().ok())
                .collect();
            let lower = text.to_lowercase();
            if lower.starts_with("até") || lower.starts_with("ate") || lower.contains("mais de") {
                numbers.first().copied()
            } else {
                numbers.last().copied()
            }
        }
        _ => None,
    }
}

fn to_record(fields: Map<String, Value>, problems: &mut Vec<String>) -> FieldRecord {
    let mut record = FieldRecord::new();
    for (name, value) in fields {
        let value = match value {
            Value::Null => None,
            Value::String(s) => Some(FieldValue::Text(s)),
            Value::Number(n) => match n.as_f64() {
                Some(f) => Some(FieldValue::Number(f)),
                None => {
                    problems.push(format!("'{name}' is not a representable number"));
                    continue;
                }
            },
            other => {
                problems.push(format!(
                    "'{name}' must be a string, number or null, got {}",
                    type_name(&other)
                ));
                continue;
            }
        };
        record.insert(name, value);
    }
    record
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn contract_unwraps_dados_and_fills_keys() {
        let reply = object(json!({
            "modelo": "antigo_v13",
            "dados": {"nome_escola": "Colégio Inovação", "alunos_totais": 420}
        }));
        let record = shape_contract(
            reply,
            &names(&["nome_escola", "alunos_totais", "cnpj"]),
            &names(&["alunos_totais"]),
        )
        .unwrap();

        assert_eq!(record.len(), 3);
        assert!(!record.contains_key("modelo"));
        assert_eq!(record.get("alunos_totais"), Some(&FieldValue::Number(420.0)));
        assert!(record.contains_key("cnpj"));
        assert!(record.get("cnpj").is_none());
    }

    #[test]
    fn contract_without_wrapper_is_accepted() {
        let reply = object(json!({"implantacao": 3500.0}));
        let fields = names(&["implantacao"]);
        let record = shape_contract(reply, &fields, &fields).unwrap();
        assert_eq!(record.get("implantacao"), Some(&FieldValue::Number(3500.0)));
    }

    #[test]
    fn contract_rejects_numeric_strings_and_nested_values() {
        let reply = object(json!({"dados": {
            "implantacao": "3.500,00",
            "cnpj": ["12", "34"]
        }}));
        let err = shape_contract(reply, &[], &names(&["implantacao"])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'implantacao' must be a number or null"), "{msg}");
        assert!(msg.contains("'cnpj'"), "{msg}");
        assert!(msg.contains("array"), "{msg}");
    }

    #[test]
    fn contract_rejects_non_object_dados() {
        let reply = object(json!({"dados": "nada"}));
        assert!(shape_contract(reply, &[], &[]).is_err());
    }

    #[test]
    fn crm_ranges_become_counts() {
        let cases = [
            (json!("Até 50 alunos"), Some(50)),
            (json!("51–100 alunos"), Some(100)),
            (json!("501-1000 alunos"), Some(1000)),
            (json!("Mais de 1001 alunos"), Some(1001)),
            (json!("450"), Some(450)),
            (json!(450), Some(450)),
            (json!(450.7), Some(450)),
            (json!("não informado"), None),
            (json!(true), None),
        ];
        for (value, expected) in cases {
            assert_eq!(student_count(&value), expected, "{value}");
        }
    }

    #[test]
    fn crm_shaping_fills_keys_and_converts_students() {
        let reply = object(json!({
            "nome": "Colégio Modelo",
            "numero_alunos": "51–100 alunos",
            "mrr": 650.0
        }));
        let record = shape_crm(reply, &names(&["nome", "numero_alunos", "mrr", "arr"])).unwrap();

        assert_eq!(record.get("numero_alunos"), Some(&FieldValue::Number(100.0)));
        assert!(record.contains_key("arr"));
        assert!(record.get("arr").is_none());
    }

    #[test]
    fn crm_unrecognized_range_is_null() {
        let reply = object(json!({"numero_alunos": "muitos"}));
        let record = shape_crm(reply, &[]).unwrap();
        assert!(record.contains_key("numero_alunos"));
        assert!(record.get("numero_alunos").is_none());
    }
}
