use dealcheck_core::rules::{CONFIDENCE_AMBIGUOUS, CONFIDENCE_DETECTED, CONFIDENCE_NONE};
use dealcheck_core::{Detection, Rules, Template};
use tracing::info;

/// Identify which configured contract template a text was written from.
///
/// Each template's markers are searched case-insensitively as literal
/// substrings. Exactly one matching template is a detection; none, or more
/// than one, yields the unknown template.
pub fn detect(rules: &Rules, text: &str) -> Detection {
    let haystack = text.to_lowercase();

    let mut matched = Vec::new();
    let mut markers_found = Vec::new();
    for template in &rules.templates {
        let found: Vec<String> = template
            .markers
            .iter()
            .filter(|m| haystack.contains(&m.to_lowercase()))
            .cloned()
            .collect();
        if !found.is_empty() {
            matched.push(template.id.as_str());
            markers_found.extend(found);
        }
    }

    let detection = match matched.as_slice() {
        [] => Detection {
            template: Template::unknown(),
            confidence: CONFIDENCE_NONE,
            markers_found: Vec::new(),
        },
        [id] => Detection {
            template: Template::new(*id),
            confidence: CONFIDENCE_DETECTED,
            markers_found,
        },
        _ => Detection {
            template: Template::unknown(),
            confidence: CONFIDENCE_AMBIGUOUS,
            markers_found,
        },
    };

    info!(
        template = %detection.template,
        confidence = detection.confidence,
        candidates = matched.len(),
        "detected contract template"
    );
    detection
}
