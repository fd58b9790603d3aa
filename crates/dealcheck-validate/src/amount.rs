//! Locale-tolerant amount parsing.

use std::str::FromStr;
use std::sync::LazyLock;

use dealcheck_core::FieldValue;
use regex::Regex;
use rust_decimal::Decimal;

/// `1.234`, `1.234.567,89`: dot-grouped thousands, optional comma decimals.
static DOT_GROUPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d{1,3}(?:\.\d{3})+(?:,\d+)?$").expect("valid pattern"));

/// `1234,56`: comma decimals without grouping.
static COMMA_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+,\d+$").expect("valid pattern"));

/// `1234`, `3.5`.
static PLAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(?:\.\d+)?$").expect("valid pattern"));

const CURRENCY_PREFIXES: &[&str] = &["R$", "BRL", "$"];

/// Read a monetary or count value as an exact decimal.
///
/// Numbers are taken as-is. Text may carry a currency prefix and use
/// Brazilian grouping: `"R$ 3.500,00"`, `"3.500"` and `"3500"` all read as
/// 3500. A single dot followed by exactly three digits is a thousands
/// separator; any other single dot is a decimal point.
pub fn parse_amount(value: &FieldValue) -> Option<Decimal> {
    match value {
        FieldValue::Number(n) if n.is_finite() => Decimal::from_str(&n.to_string()).ok(),
        FieldValue::Number(_) => None,
        FieldValue::Text(text) => parse_text(text),
    }
}

fn parse_text(text: &str) -> Option<Decimal> {
    let mut s = text.trim();
    for prefix in CURRENCY_PREFIXES {
        if s.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        {
            s = s[prefix.len()..].trim_start();
            break;
        }
    }

    let canonical = if DOT_GROUPED.is_match(s) {
        s.replace('.', "").replace(',', ".")
    } else if COMMA_DECIMAL.is_match(s) {
        s.replace(',', ".")
    } else if PLAIN.is_match(s) {
        s.to_string()
    } else {
        return None;
    };
    Decimal::from_str(&canonical).ok()
}
