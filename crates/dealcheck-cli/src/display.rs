//! Vertical card display for check results.
//!
//! Each printer renders one result as a titled card with aligned
//! `label value` rows, grouped into sections that are skipped when empty.

use dealcheck_core::{
    ClauseValidation, CrmValidation, Detection, FieldRecord, FieldValidation, Status,
};
use dealcheck_pipeline::{CrmReport, PipelineResult, Review};
use dealcheck_validate::ClauseMap;

const PREVIEW_CHARS: usize = 72;

// ── Public API ──

pub fn print_detection(detection: &Detection) {
    println!("=== Template detection ===");
    println!();
    row("template", detection.template.as_str());
    row("confidence", &format!("{:.2}", detection.confidence));
    list("markers found", &detection.markers_found);
    println!();
}

/// Print the clause map in document order with a one-line preview per clause.
pub fn print_segments(clauses: &ClauseMap) {
    println!("=== {} clause(s) ===", clauses.len());
    println!();
    for (marker, content) in clauses.iter() {
        row(marker, &preview(content));
    }
    if !clauses.duplicates().is_empty() {
        println!();
        list("duplicate markers", clauses.duplicates());
    }
    println!();
}

pub fn print_field_validation(validation: &FieldValidation) {
    println!("Fields");
    row("valid", yes_no(validation.valid));
    bullets("critical errors", &validation.critical_errors);
    bullets("warnings", &validation.warnings);
    println!();
}

pub fn print_clause_validation(validation: &ClauseValidation) {
    println!("Clauses");
    row("valid", yes_no(validation.valid));
    row("risk level", validation.risk_level.as_str());
    list("altered", &validation.altered);
    list("missing", &validation.missing);
    list("extra", &validation.extra);
    list("duplicate markers", &validation.duplicate_markers);
    println!();
}

pub fn print_reconciliation(warnings: &[String]) {
    println!("Reconciliation");
    if warnings.is_empty() {
        row("divergences", "none");
    } else {
        bullets("divergences", warnings);
    }
    println!();
}

pub fn print_record(header: &str, record: &FieldRecord) {
    println!("{header}");
    for (name, value) in record.iter() {
        match value {
            Some(v) => row(name, &v.to_string()),
            None => row(name, "-"),
        }
    }
    println!();
}

pub fn print_contract(result: &PipelineResult) {
    println!("=== Contract ({}) ===", result.template);
    println!();
    print_record("Extracted fields", &result.extracted_fields);
    print_field_validation(&result.field_validation);
    if let Some(clauses) = &result.clause_validation {
        print_clause_validation(clauses);
    }
    if let Some(warnings) = &result.reconciliation_warnings {
        print_reconciliation(warnings);
    }
    print_status(result.status);
}

pub fn print_crm_validation(validation: &CrmValidation) {
    println!("CRM rules");
    if validation.errors.is_empty() {
        row("errors", "none");
    } else {
        bullets("errors", &validation.errors);
    }
    println!();
}

pub fn print_crm(report: &CrmReport) {
    println!("=== CRM record ===");
    println!();
    print_record("Extracted fields", &report.fields);
    print_crm_validation(&report.validation);
    print_status(report.validation.status);
}

pub fn print_review(review: &Review) {
    print_crm(&review.crm);
    print_contract(&review.contract);
    println!("=== Review ===");
    row("crm", review.crm.validation.status.as_str());
    row("contract", review.contract.status.as_str());
    print_status(review.status);
}

pub fn print_status(status: Status) {
    println!("{:<26} {}", "STATUS", status.as_str().to_uppercase());
    println!();
}

// ── Row rendering ──

fn row(label: &str, value: &str) {
    println!("  {label:<26} {value}");
}

fn list(label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    row(label, &items.join(", "));
}

fn bullets(label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("  {label} ({}):", items.len());
    for item in items {
        println!("    - {item}");
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_cuts_on_char_boundaries() {
        let long = "ç".repeat(100);
        let cut = preview(&long);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 3);
        assert!(cut.ends_with("..."));

        assert_eq!(preview("objeto do contrato"), "objeto do contrato");
    }
}
