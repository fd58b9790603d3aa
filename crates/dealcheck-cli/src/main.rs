mod display;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use dealcheck_core::{
    CheckError, ClauseValidation, FieldExtractor, FieldRecord, FieldValidation, RiskLevel, Rules,
    Status, Template,
};
use dealcheck_extract::{AnthropicConfig, AnthropicExtractor, FixedExtractor};
use dealcheck_pipeline::{ContractPipeline, CrmPipeline, review};
use dealcheck_validate::{detect, reconcile, segment, validate_clauses, validate_fields};
use serde::Serialize;
use tracing::Level;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Checks signed school contracts and CRM records before onboarding.
#[derive(Parser)]
#[command(name = "dealcheck", version, about = "Contract and CRM consistency checks")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// JSON rules file; keys it omits keep their built-in values
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Directory holding the canonical contract templates
    #[arg(long, global = true, env = "DEALCHECK_TEMPLATE_DIR")]
    template_dir: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect which contract template a text was written from
    Detect {
        /// Contract text file
        file: PathBuf,
    },

    /// Split a text into numbered clauses
    Segment {
        /// Contract or template text file
        file: PathBuf,
    },

    /// Validate an extracted contract field record
    Fields {
        /// Field record (JSON object)
        record: PathBuf,
        /// Template the record was extracted from
        #[arg(long)]
        template: String,
    },

    /// Compare a contract's clauses with its canonical template
    Clauses {
        /// Contract text file
        file: PathBuf,
        /// Template to compare against (detected when omitted)
        #[arg(long)]
        template: Option<String>,
    },

    /// Cross-check a CRM record with a contract record
    Reconcile {
        /// CRM field record (JSON object)
        #[arg(long)]
        crm: PathBuf,
        /// Contract field record (JSON object)
        #[arg(long)]
        contract: PathBuf,
    },

    /// Extract and validate a CRM record from one or more screen texts
    Crm {
        /// CRM screen text files, consolidated in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Run the contract pipeline
    Contract {
        /// Contract text file
        file: PathBuf,
        /// Reconcile with this CRM record (JSON) instead of comparing clauses
        #[arg(long)]
        reconcile_with: Option<PathBuf>,
        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Check a deal end to end: CRM screens plus the signed contract
    Review {
        /// Contract text file
        contract: PathBuf,
        /// CRM screen text file (repeatable)
        #[arg(long = "crm", required = true)]
        crm: Vec<PathBuf>,
        #[command(flatten)]
        extract: ExtractArgs,
    },
}

/// Where extracted fields come from.
#[derive(Args)]
struct ExtractArgs {
    /// Replay this contract field record (JSON) instead of calling the model
    #[arg(long)]
    contract_fields: Option<PathBuf>,

    /// Replay this CRM field record (JSON) instead of calling the model
    #[arg(long)]
    crm_fields: Option<PathBuf>,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model to extract with
    #[arg(long)]
    model: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.quiet { Level::WARN } else { Level::INFO })
        .init();
    tracing::debug!("dealcheck v{}", env!("CARGO_PKG_VERSION"));

    let output = cli.output;
    match run(cli) {
        Ok(Some(status)) => exit_code(status),
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e, output);
            ExitCode::from(3)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<Option<Status>> {
    let rules = load_rules(cli.rules.as_deref(), cli.template_dir)?;
    let output = cli.output;

    match cli.command {
        Commands::Detect { file } => {
            let detection = detect(&rules, &read_text(&file)?);
            emit(output, &detection, display::print_detection)?;
            Ok(None)
        }
        Commands::Segment { file } => {
            let clauses = segment(&read_text(&file)?);
            emit(output, &clauses, display::print_segments)?;
            Ok(None)
        }
        Commands::Fields { record, template } => {
            let fields = read_record(&record)?;
            let validation = validate_fields(&rules, &Template::new(template), &fields)?;
            emit(output, &validation, display::print_field_validation)?;
            Ok(Some(field_status(&validation)))
        }
        Commands::Clauses { file, template } => {
            let text = read_text(&file)?;
            let template = match template {
                Some(id) => Template::new(id),
                None => detected_template(&rules, &text)?,
            };
            let validation = validate_clauses(&rules, &template, &text, None)?;
            emit(output, &validation, display::print_clause_validation)?;
            Ok(Some(clause_status(&validation)))
        }
        Commands::Reconcile { crm, contract } => {
            let warnings = reconcile(&rules, &read_record(&crm)?, &read_record(&contract)?);
            let status = if warnings.is_empty() {
                Status::Valid
            } else {
                Status::ManualReview
            };
            let report = ReconcileReport { warnings, status };
            emit(output, &report, |r| {
                display::print_reconciliation(&r.warnings);
                display::print_status(r.status);
            })?;
            Ok(Some(status))
        }
        Commands::Crm { files, extract } => {
            let texts = read_texts(&files)?;
            let extractor = build_extractor(&extract, &rules)?;
            let report = CrmPipeline::new(&rules, extractor.as_ref()).run(&texts)?;
            emit(output, &report, display::print_crm)?;
            Ok(Some(report.validation.status))
        }
        Commands::Contract {
            file,
            reconcile_with,
            extract,
        } => {
            let text = read_text(&file)?;
            let extractor = build_extractor(&extract, &rules)?;
            let pipeline = ContractPipeline::new(&rules, extractor.as_ref());
            let result = match reconcile_with {
                Some(path) => pipeline.run_reconciliation(&text, &read_record(&path)?)?,
                None => pipeline.run(&text)?,
            };
            emit(output, &result, display::print_contract)?;
            Ok(Some(result.status))
        }
        Commands::Review {
            contract,
            crm,
            extract,
        } => {
            let crm_texts = read_texts(&crm)?;
            let contract_text = read_text(&contract)?;
            let extractor = build_extractor(&extract, &rules)?;
            let result = review(
                &CrmPipeline::new(&rules, extractor.as_ref()),
                &ContractPipeline::new(&rules, extractor.as_ref()),
                &crm_texts,
                &contract_text,
            )?;
            emit(output, &result, display::print_review)?;
            Ok(Some(result.status))
        }
    }
}

#[derive(Serialize)]
struct ReconcileReport {
    warnings: Vec<String>,
    status: Status,
}

// ── Setup ──

fn load_rules(path: Option<&Path>, template_dir: Option<PathBuf>) -> anyhow::Result<Rules> {
    let mut rules = match path {
        Some(path) => Rules::from_json_file(path)
            .with_context(|| format!("loading rules from {}", path.display()))?,
        None => Rules::default(),
    };
    if let Some(dir) = template_dir {
        rules.template_dir = dir;
    }
    Ok(rules)
}

/// Replayed records when any were given, the Anthropic API otherwise.
fn build_extractor(args: &ExtractArgs, rules: &Rules) -> anyhow::Result<Box<dyn FieldExtractor>> {
    if args.contract_fields.is_some() || args.crm_fields.is_some() {
        let mut fixed = FixedExtractor::new();
        if let Some(path) = &args.contract_fields {
            fixed = fixed.with_contract(read_record(path)?);
        }
        if let Some(path) = &args.crm_fields {
            fixed = fixed.with_crm(read_record(path)?);
        }
        return Ok(Box::new(fixed));
    }

    let api_key = args
        .api_key
        .clone()
        .context("no extraction source: set ANTHROPIC_API_KEY or pass --contract-fields/--crm-fields")?;
    let mut config = AnthropicConfig::new(api_key);
    config.numeric_fields = rules.fields.numeric_fields.clone();
    if let Some(model) = &args.model {
        config = config.with_model(model.as_str());
    }
    if let Some(secs) = args.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    tracing::info!(model = %config.model, "extracting with Anthropic API");
    Ok(Box::new(AnthropicExtractor::new(config)?))
}

fn detected_template(rules: &Rules, text: &str) -> Result<Template, CheckError> {
    let detection = detect(rules, text);
    if detection.template.is_unknown() {
        return Err(CheckError::UndetectedTemplate {
            markers: detection.markers_found,
        });
    }
    Ok(detection.template)
}

// ── File input ──

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_texts(paths: &[PathBuf]) -> anyhow::Result<Vec<String>> {
    paths.iter().map(|p| read_text(p)).collect()
}

fn read_record(path: &Path) -> anyhow::Result<FieldRecord> {
    let json = read_text(path)?;
    FieldRecord::from_json(&json).with_context(|| format!("parsing field record {}", path.display()))
}

// ── Output ──

fn emit<T: Serialize>(output: OutputFormat, value: &T, text: impl FnOnce(&T)) -> anyhow::Result<()> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => text(value),
    }
    Ok(())
}

fn report_error(err: &anyhow::Error, output: OutputFormat) {
    let kind = err.downcast_ref::<CheckError>().map(|e| e.kind().as_str());
    match output {
        OutputFormat::Json => {
            let body = serde_json::json!({ "error": format!("{err:#}"), "kind": kind });
            eprintln!("{body}");
        }
        OutputFormat::Text => match kind {
            Some(kind) => eprintln!("error ({kind}): {err:#}"),
            None => eprintln!("error: {err:#}"),
        },
    }
}

fn field_status(validation: &FieldValidation) -> Status {
    if validation.valid {
        Status::Valid
    } else {
        Status::Invalid
    }
}

fn clause_status(validation: &ClauseValidation) -> Status {
    if !validation.valid {
        Status::Invalid
    } else if validation.risk_level >= RiskLevel::Medium {
        Status::ManualReview
    } else {
        Status::Valid
    }
}

fn exit_code(status: Status) -> ExitCode {
    match status {
        Status::Valid => ExitCode::SUCCESS,
        Status::Invalid => ExitCode::from(1),
        Status::ManualReview => ExitCode::from(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn review_takes_repeated_crm_texts() {
        let cli = Cli::try_parse_from([
            "dealcheck",
            "--output",
            "json",
            "review",
            "contrato.txt",
            "--crm",
            "negociacao.txt",
            "--crm",
            "contatos.txt",
            "--contract-fields",
            "contrato.json",
        ])
        .unwrap();

        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Commands::Review { crm, extract, .. } => {
                assert_eq!(crm.len(), 2);
                assert!(extract.contract_fields.is_some());
            }
            _ => panic!("expected review"),
        }
    }

    #[test]
    fn clause_status_follows_risk() {
        let mut validation = ClauseValidation {
            valid: true,
            altered: vec![],
            missing: vec![],
            extra: vec![],
            risk_level: RiskLevel::Low,
            duplicate_markers: vec![],
        };
        assert_eq!(clause_status(&validation), Status::Valid);

        validation.risk_level = RiskLevel::High;
        assert_eq!(clause_status(&validation), Status::ManualReview);

        validation.valid = false;
        assert_eq!(clause_status(&validation), Status::Invalid);
    }

    #[test]
    fn template_dir_flag_overrides_rules() {
        let rules = load_rules(None, Some(PathBuf::from("/srv/modelos"))).unwrap();
        assert_eq!(rules.template_dir, PathBuf::from("/srv/modelos"));
        assert_eq!(load_rules(None, None).unwrap().template_dir, PathBuf::from("templates"));
    }
}
