//! Static rule configuration.
//!
//! Everything the validators treat as business policy lives here: required
//! field sets, detection markers, thresholds, keyword sets and canonical file
//! bindings. A [`Rules`] value is built once (from [`Default`] or a JSON file)
//! and only read afterwards.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::template::UNKNOWN_TEMPLATE;
use crate::{CheckError, Template};

/// Minimum similarity for a clause to count as unaltered.
pub const SIMILARITY_THRESHOLD: f64 = 0.97;

/// Student totals at or below this value raise a warning.
pub const LOW_STUDENT_COUNT: f64 = 5.0;

/// Implementation value that raises a "free of charge?" warning.
pub const ZERO_IMPLEMENTATION_VALUE: f64 = 0.0;

/// Detection confidence when exactly one template matches.
pub const CONFIDENCE_DETECTED: f64 = 0.95;

/// Detection confidence when several templates match.
pub const CONFIDENCE_AMBIGUOUS: f64 = 0.5;

/// Detection confidence when no template matches.
pub const CONFIDENCE_NONE: f64 = 0.0;

const CONTRACT_FIELDS: &[&str] = &[
    "nome_escola",
    "razao_social",
    "cnpj",
    "email_login",
    "email_financeiro",
    "whatsapp",
    "alunos_totais",
    "alunos_gamificados",
    "implantacao",
    "assinatura",
    "inicio_implantacao",
    "inicio_cobranca",
    "cards_enviados",
];

const CONTRACT_OPTIONAL_FIELDS: &[&str] = &["desconto_primeiro_ano", "saldo_loja", "ia"];

const CRM_FIELDS: &[&str] = &[
    "nome",
    "nome_escola",
    "vendedor",
    "perfil_escola",
    "numero_alunos",
    "nivel_prioridade",
    "mrr",
    "arr",
    "dor_escola",
    "valor_implantacao",
    "link_contrato",
    "forma_implantacao",
    "contato_nome",
    "contato_telefone",
    "contato_email",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Complete rule set for detection, validation and reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub templates: Vec<TemplateRules>,
    /// Directory searched for canonical template files when the caller
    /// does not name one.
    pub template_dir: PathBuf,
    pub fields: FieldRules,
    pub clauses: ClauseRules,
    pub reconcile: ReconcileRules,
    pub crm: CrmRules,
}

/// Per-template configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateRules {
    pub id: String,
    /// Literal strings whose presence (case-insensitive) identifies the template.
    pub markers: Vec<String>,
    pub required_fields: Vec<String>,
    /// Canonical clause text, relative to the template directory.
    pub base_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldRules {
    /// Fields that must hold JSON numbers when present.
    pub numeric_fields: Vec<String>,
    /// Fields the extractor is asked for in addition to the required ones.
    pub optional_fields: Vec<String>,
    /// Reserved tokens that betray an unfilled template (matched case-insensitively).
    pub placeholders: Vec<String>,
    pub total_count_field: String,
    pub gamified_count_field: String,
    pub implementation_field: String,
    pub low_count_threshold: f64,
    pub zero_implementation_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClauseRules {
    pub similarity_threshold: f64,
    pub critical_keywords: Vec<String>,
}

/// A CRM field compared against its contract counterpart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldPair {
    pub label: String,
    pub crm_field: String,
    pub contract_field: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileRules {
    pub pairs: Vec<FieldPair>,
}

/// Lower bound of an MRR priority band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityBand {
    pub group: String,
    pub min_mrr: f64,
    /// When false the bound is exclusive (`mrr > min_mrr`).
    #[serde(default = "default_true")]
    pub inclusive: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrmRules {
    pub required_fields: Vec<String>,
    /// Bands checked top-down; the first one that admits the MRR wins.
    pub priority_bands: Vec<PriorityBand>,
    pub fallback_group: String,
    pub arr_months: f64,
    pub min_phone_digits: usize,
    pub link_prefix: String,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            templates: vec![
                TemplateRules {
                    id: "novo".into(),
                    markers: strings(&[
                        "ANEXO 1 - TABELA RESUMO COMERCIAL",
                        "CONTRATO DE ASSINATURA DE SOFTWARE (SaaS)",
                    ]),
                    required_fields: strings(CONTRACT_FIELDS),
                    base_file: "modelo_novo_base.txt".into(),
                },
                TemplateRules {
                    id: "antigo_v13".into(),
                    markers: strings(&["saldo em loja", "Contrato Escolas v13"]),
                    required_fields: strings(CONTRACT_FIELDS),
                    base_file: "modelo_antigo_base.txt".into(),
                },
            ],
            template_dir: PathBuf::from("templates"),
            fields: FieldRules::default(),
            clauses: ClauseRules::default(),
            reconcile: ReconcileRules::default(),
            crm: CrmRules::default(),
        }
    }
}

impl Default for FieldRules {
    fn default() -> Self {
        Self {
            numeric_fields: strings(&["alunos_totais", "alunos_gamificados", "implantacao"]),
            optional_fields: strings(CONTRACT_OPTIONAL_FIELDS),
            placeholders: strings(&["{{", "}}", "____", "xxxxx"]),
            total_count_field: "alunos_totais".into(),
            gamified_count_field: "alunos_gamificados".into(),
            implementation_field: "implantacao".into(),
            low_count_threshold: LOW_STUDENT_COUNT,
            zero_implementation_value: ZERO_IMPLEMENTATION_VALUE,
        }
    }
}

impl Default for ClauseRules {
    fn default() -> Self {
        Self {
            similarity_threshold: SIMILARITY_THRESHOLD,
            critical_keywords: strings(&["multa", "prazo", "rescisão", "rescisao", "reajuste"]),
        }
    }
}

impl Default for ReconcileRules {
    fn default() -> Self {
        Self {
            pairs: vec![
                FieldPair {
                    label: "total de alunos".into(),
                    crm_field: "numero_alunos".into(),
                    contract_field: "alunos_totais".into(),
                },
                FieldPair {
                    label: "valor de implantação".into(),
                    crm_field: "valor_implantacao".into(),
                    contract_field: "implantacao".into(),
                },
            ],
        }
    }
}

impl Default for CrmRules {
    fn default() -> Self {
        let band = |group: &str, min_mrr: f64, inclusive: bool| PriorityBand {
            group: group.into(),
            min_mrr,
            inclusive,
        };
        Self {
            required_fields: strings(CRM_FIELDS),
            priority_bands: vec![
                band("GRUPO A", 700.0, false),
                band("GRUPO B", 401.0, true),
                band("GRUPO C", 300.0, true),
                band("GRUPO D", 100.0, true),
            ],
            fallback_group: "GRUPO E".into(),
            arr_months: 12.0,
            min_phone_digits: 10,
            link_prefix: "http".into(),
        }
    }
}

impl Rules {
    /// Load rules from a JSON file. Keys the file omits keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, CheckError> {
        let text = std::fs::read_to_string(path)?;
        let rules: Rules = serde_json::from_str(&text)
            .map_err(|e| CheckError::Rules(format!("{}: {e}", path.display())))?;
        rules.check()?;
        info!(path = %path.display(), templates = rules.templates.len(), "loaded rules");
        Ok(rules)
    }

    /// Reject configurations the validators cannot run with.
    pub fn check(&self) -> Result<(), CheckError> {
        let threshold = self.clauses.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CheckError::Rules(format!(
                "similarity_threshold must be within [0, 1], got {threshold}"
            )));
        }
        for (i, t) in self.templates.iter().enumerate() {
            if t.id == UNKNOWN_TEMPLATE || t.id == "unknown" {
                return Err(CheckError::Rules(format!(
                    "template id '{}' is reserved",
                    t.id
                )));
            }
            if self.templates[..i].iter().any(|other| other.id == t.id) {
                return Err(CheckError::Rules(format!("duplicate template id '{}'", t.id)));
            }
            if t.markers.is_empty() {
                return Err(CheckError::Rules(format!(
                    "template '{}' has no detection markers",
                    t.id
                )));
            }
        }
        Ok(())
    }

    /// Configuration for a known template.
    ///
    /// The unknown sentinel and unconfigured ids are input errors.
    pub fn template(&self, template: &Template) -> Result<&TemplateRules, CheckError> {
        self.templates
            .iter()
            .find(|t| t.id == template.as_str())
            .ok_or_else(|| CheckError::UnknownTemplate(template.to_string()))
    }

    /// Every field the extractor should return for a contract of this template.
    pub fn contract_field_names(&self, template: &Template) -> Result<Vec<String>, CheckError> {
        let mut names = self.template(template)?.required_fields.clone();
        for name in &self.fields.optional_fields {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        Ok(names)
    }
}
