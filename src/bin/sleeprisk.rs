//! Sleep Risk CLI - Command-line interface for sleep-disorder risk assessment
//!
//! Commands:
//! - assess: Assess one or more health profiles
//! - simulate: Compare a profile against adjusted habits (what-if)
//! - validate: Range-check health profiles
//! - doctor: Diagnose model artifacts and configuration
//! - importance: Print the model's feature importances
//! - schema: Print input/output schema information

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use sleep_risk::model::{
    DEFAULT_LABEL_ENCODER_FILE, DEFAULT_MODEL_FILE, DEFAULT_OCCUPATION_ENCODER_FILE,
};
use sleep_risk::{
    ArtifactPaths, Assessment, AssessmentError, AssessmentPipeline, HealthProfile, Occupation,
    Simulation, WhatIf, PRODUCER_NAME, VERSION,
};

/// Sleep Risk - Sleep-disorder risk assessment from self-reported health metrics
#[derive(Parser)]
#[command(name = "sleeprisk")]
#[command(version = VERSION)]
#[command(about = "Assess sleep-disorder risk from health metrics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Model artifact location, shared by commands that load the classifier
#[derive(Args, Clone)]
struct ModelArgs {
    /// Directory holding sleep_model.json and label_encoder.json
    #[arg(long, env = "SLEEPRISK_MODEL_DIR", default_value = "models")]
    model_dir: PathBuf,

    /// Override the forest artifact path
    #[arg(long)]
    model: Option<PathBuf>,

    /// Override the target label encoder path
    #[arg(long)]
    label_encoder: Option<PathBuf>,

    /// Override the occupation encoder path
    #[arg(long)]
    occupation_encoder: Option<PathBuf>,
}

impl ModelArgs {
    fn paths(&self) -> ArtifactPaths {
        let defaults = ArtifactPaths::from_dir(&self.model_dir);
        ArtifactPaths {
            model: self.model.clone().unwrap_or(defaults.model),
            label_encoder: self.label_encoder.clone().unwrap_or(defaults.label_encoder),
            occupation_encoder: self
                .occupation_encoder
                .clone()
                .or(defaults.occupation_encoder),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Assess one or more health profiles
    Assess {
        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "report")]
        output_format: OutputFormat,

        /// Fail instead of continuing when the model artifacts are missing
        #[arg(long)]
        require_model: bool,

        /// Reject profiles with out-of-range values instead of assessing them
        #[arg(long)]
        strict: bool,

        /// Also write each report to this directory
        #[arg(long)]
        report_dir: Option<PathBuf>,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Compare a profile against adjusted habits
    Simulate {
        /// Input file path holding a single profile (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Simulated sleep duration in hours
        #[arg(long)]
        sleep_duration: Option<f64>,

        /// Simulated sleep quality (1-10)
        #[arg(long)]
        sleep_quality: Option<u32>,

        /// Simulated stress level (1-10)
        #[arg(long)]
        stress_level: Option<u32>,

        /// Simulated physical activity in minutes per day
        #[arg(long)]
        physical_activity: Option<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Range-check health profiles
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose model artifacts and configuration
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Print the model's feature importances, most important first
    Importance {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Print schema information
    Schema {
        /// Schema to print
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// A single JSON profile object
    Json,
    /// JSON array of profiles
    Array,
    /// Newline-delimited JSON (one profile per line)
    Ndjson,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Plain-text report per profile
    Report,
    /// Newline-delimited JSON (one assessment per line)
    Ndjson,
    /// JSON array of assessments
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Health profile input
    Profile,
    /// Assessment output
    Assessment,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), SleepRiskCliError> {
    match cli.command {
        Commands::Assess {
            input,
            output,
            input_format,
            output_format,
            require_model,
            strict,
            report_dir,
            model,
        } => cmd_assess(
            &input,
            &output,
            input_format,
            output_format,
            require_model,
            strict,
            report_dir.as_deref(),
            &model,
        ),

        Commands::Simulate {
            input,
            sleep_duration,
            sleep_quality,
            stress_level,
            physical_activity,
            json,
            model,
        } => {
            let what_if = WhatIf {
                sleep_duration,
                sleep_quality,
                stress_level,
                physical_activity,
            };
            cmd_simulate(&input, &what_if, json, &model)
        }

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Doctor { json, model } => cmd_doctor(&model, json),

        Commands::Importance { json, model } => cmd_importance(&model, json),

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),
    }
}

fn cmd_assess(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    require_model: bool,
    strict: bool,
    report_dir: Option<&Path>,
    model: &ModelArgs,
) -> Result<(), SleepRiskCliError> {
    let profiles = parse_profiles(&read_input(input)?, &input_format)?;
    if profiles.is_empty() {
        return Err(SleepRiskCliError::NoProfiles);
    }

    let pipeline = AssessmentPipeline::from_paths(&model.paths())?;
    if require_model {
        if let Some(reason) = pipeline.classifier().unavailable_reason() {
            return Err(SleepRiskCliError::ModelUnavailable(reason.to_string()));
        }
    }

    let assessments: Vec<Assessment> = if strict {
        profiles
            .iter()
            .map(|p| pipeline.assess_validated(p))
            .collect::<Result<_, _>>()?
    } else {
        profiles.iter().map(|p| pipeline.assess(p)).collect()
    };

    if let Some(dir) = report_dir {
        write_reports(dir, &assessments)?;
    }

    write_output(output, &format_output(&assessments, &output_format)?)
}

fn cmd_simulate(
    input: &Path,
    what_if: &WhatIf,
    json: bool,
    model: &ModelArgs,
) -> Result<(), SleepRiskCliError> {
    if what_if.is_empty() {
        return Err(SleepRiskCliError::NoAdjustments);
    }

    let profiles = parse_profiles(&read_input(input)?, &InputFormat::Json)?;
    let profile = profiles.first().ok_or(SleepRiskCliError::NoProfiles)?;

    let pipeline = AssessmentPipeline::from_paths(&model.paths())?;
    let simulation = pipeline.simulate(profile, what_if);

    if json {
        println!("{}", serde_json::to_string_pretty(&SimulationSummary::from(&simulation))?);
        return Ok(());
    }

    println!("What-If Simulation");
    println!("==================");
    println!(
        "Current score:   {}/100 ({})",
        simulation.current_score().value,
        simulation.current_score().band
    );
    println!(
        "Simulated score: {}/100 ({})",
        simulation.simulated_score().value,
        simulation.simulated_score().band
    );
    println!("Change:          {:+}", simulation.score_delta);

    match (simulation.current_label(), simulation.simulated_label()) {
        (Some(current), Some(simulated)) => {
            println!("Current status:   {current}");
            println!("Simulated status: {simulated}");
        }
        _ => println!("Status:          model unavailable"),
    }

    println!();
    println!("{}", simulation.verdict.message());

    Ok(())
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), SleepRiskCliError> {
    let profiles = parse_profiles(&read_input(input)?, &input_format)?;

    let mut errors = Vec::new();
    let mut invalid_profiles = 0;
    for (index, profile) in profiles.iter().enumerate() {
        if let Err(profile_errors) = profile.validate() {
            invalid_profiles += 1;
            errors.extend(profile_errors.iter().map(|e| ValidationErrorDetail {
                index,
                field: e.field().to_string(),
                error: e.to_string(),
            }));
        }
        if let Occupation::Unlisted(name) = &profile.occupation {
            tracing::info!(index, occupation = %name, "occupation is not in the listed set");
        }
    }

    let report = ValidationReport {
        total_profiles: profiles.len(),
        valid_profiles: profiles.len() - invalid_profiles,
        invalid_profiles,
        errors,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total profiles:   {}", report.total_profiles);
        println!("Valid profiles:   {}", report.valid_profiles);
        println!("Invalid profiles: {}", report.invalid_profiles);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - Profile {} ({}): {}", err.index, err.field, err.error);
            }
        }
    }

    if report.invalid_profiles > 0 {
        Err(SleepRiskCliError::ValidationFailed(report.invalid_profiles))
    } else {
        Ok(())
    }
}

fn cmd_doctor(model: &ModelArgs, json: bool) -> Result<(), SleepRiskCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();
    let paths = model.paths();

    checks.push(DoctorCheck {
        name: "version".to_string(),
        status: CheckStatus::Ok,
        message: format!("{} version {}", PRODUCER_NAME, VERSION),
    });

    // Missing artifacts only disable prediction; assess still runs without them
    checks.push(file_check(DEFAULT_MODEL_FILE, &paths.model));
    checks.push(file_check(DEFAULT_LABEL_ENCODER_FILE, &paths.label_encoder));
    if let Some(path) = &paths.occupation_encoder {
        checks.push(file_check(DEFAULT_OCCUPATION_ENCODER_FILE, path));
    }

    // Load through the library so shape errors surface exactly as at runtime
    match AssessmentPipeline::from_paths(&paths) {
        Ok(pipeline) => {
            let facade = pipeline.classifier();
            let check = match facade.layout() {
                Some(layout) => DoctorCheck {
                    name: "model".to_string(),
                    status: CheckStatus::Ok,
                    message: format!(
                        "Model loaded ({} features, occupation {})",
                        layout.len(),
                        if facade.encoder().encodes_occupation() {
                            "encoded"
                        } else {
                            "not used"
                        }
                    ),
                },
                None => DoctorCheck {
                    name: "model".to_string(),
                    status: CheckStatus::Warning,
                    message: format!(
                        "Model unavailable: {}",
                        facade.unavailable_reason().unwrap_or("unknown reason")
                    ),
                },
            };
            checks.push(check);
        }
        Err(e) => checks.push(DoctorCheck {
            name: "model".to_string(),
            status: CheckStatus::Error,
            message: e.to_string(),
        }),
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (pass profiles with --input)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (ready to read profiles)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: VERSION.to_string(),
        model_dir: model.model_dir.display().to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Sleep Risk Doctor Report");
        println!("========================");
        println!("Producer:  {}", report.producer);
        println!("Version:   {}", report.version);
        println!("Model dir: {}", report.model_dir);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(SleepRiskCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_importance(model: &ModelArgs, json: bool) -> Result<(), SleepRiskCliError> {
    let pipeline = AssessmentPipeline::from_paths(&model.paths())?;
    let facade = pipeline.classifier();
    if let Some(reason) = facade.unavailable_reason() {
        return Err(SleepRiskCliError::ModelUnavailable(reason.to_string()));
    }
    let ranked = facade.importances().ok_or(SleepRiskCliError::NoImportances)?;

    if json {
        let entries: Vec<ImportanceEntry> = ranked
            .iter()
            .map(|(feature, importance)| ImportanceEntry {
                feature: feature.to_string(),
                importance: *importance,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("Feature Importance");
        println!("==================");
        for (feature, importance) in &ranked {
            println!("  {:<24} {:.4}", feature, importance);
        }
    }

    Ok(())
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), SleepRiskCliError> {
    match schema_type {
        SchemaType::Profile => {
            if json_schema {
                println!("{}", profile_json_schema());
            } else {
                println!("Input Schema: health profile");
                println!();
                println!("- sex: Male | Female");
                println!("- age: integer, 10-100");
                println!("- occupation: optional, defaults to \"Other\"");
                println!("  listed: {}", listed_occupations().join(", "));
                println!("  any other string is accepted and encoded with the default code");
                println!("- bmi_category: Normal | Overweight | Obese");
                println!("- sleep_duration: hours, 0.0-12.0");
                println!("- sleep_quality: 1-10");
                println!("- physical_activity: minutes/day, 0-120");
                println!("- daily_steps: 0-20000");
                println!("- stress_level: 1-10");
                println!("- heart_rate: bpm, 40-120");
                println!("- bp_systolic: 80-200");
                println!("- bp_diastolic: 50-130");
            }
        }
        SchemaType::Assessment => {
            if json_schema {
                println!("{}", assessment_json_schema());
            } else {
                println!("Output Schema: assessment");
                println!();
                println!("- id: UUID v4");
                println!("- assessed_at: RFC 3339 timestamp (UTC)");
                println!("- profile: the input profile");
                println!("- result: {{ label, risk_score, raw_label, override_rule }} or null");
                println!("  label: Healthy (15) | Insomnia (65) | Sleep Apnea (92)");
                println!("- sleep_score: {{ value, band, breakdown }}");
                println!("- recommendations: non-empty list of recommendation ids");
                println!("- report: {{ text, generated_at }} or null");
                println!("- flags: unknown_occupation | model_unavailable | inference_failed | rule_override");
            }
        }
    }

    Ok(())
}

// Helper functions

fn read_input(input: &Path) -> Result<String, SleepRiskCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn write_output(output: &Path, data: &str) -> Result<(), SleepRiskCliError> {
    if output.to_string_lossy() == "-" {
        print!("{}", data);
    } else {
        fs::write(output, data)?;
    }
    Ok(())
}

fn parse_profiles(data: &str, format: &InputFormat) -> Result<Vec<HealthProfile>, SleepRiskCliError> {
    match format {
        InputFormat::Json => Ok(vec![serde_json::from_str(data)?]),
        InputFormat::Array => Ok(serde_json::from_str(data)?),
        InputFormat::Ndjson => {
            let mut profiles = Vec::new();
            for (line_no, line) in data.lines().enumerate() {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let profile = serde_json::from_str(trimmed).map_err(|e| {
                    SleepRiskCliError::ParseError(format!("line {}: {}", line_no + 1, e))
                })?;
                profiles.push(profile);
            }
            Ok(profiles)
        }
    }
}

fn format_output(assessments: &[Assessment], format: &OutputFormat) -> Result<String, SleepRiskCliError> {
    match format {
        OutputFormat::Report => Ok(assessments
            .iter()
            .map(render_text)
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for assessment in assessments {
                lines.push(serde_json::to_string(assessment)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(assessments)? + "\n"),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(assessments)? + "\n"),
    }
}

/// Report text, or a reduced summary when there is no label to report
fn render_text(assessment: &Assessment) -> String {
    if let Some(report) = &assessment.report {
        return report.text.clone();
    }

    let mut lines = vec![
        "SLEEP HEALTH SUMMARY".to_string(),
        "Prediction: unavailable (model not loaded)".to_string(),
        format!(
            "Sleep Score: {}/100 ({})",
            assessment.sleep_score.value, assessment.sleep_score.band
        ),
        "RECOMMENDATIONS:".to_string(),
    ];
    lines.extend(assessment.recommendations.iter().map(|r| format!("- {}", r.plain())));
    lines.join("\n") + "\n"
}

fn write_reports(dir: &Path, assessments: &[Assessment]) -> Result<(), SleepRiskCliError> {
    fs::create_dir_all(dir)?;
    let reports: Vec<_> = assessments.iter().filter_map(|a| a.report.as_ref()).collect();
    for (i, report) in reports.iter().enumerate() {
        let name = if reports.len() == 1 {
            report.file_name()
        } else {
            // One file per profile; the daily name alone would collide
            report.file_name().replace(".txt", &format!("_{}.txt", i + 1))
        };
        fs::write(dir.join(&name), &report.text)?;
        tracing::info!(file = %name, "wrote report");
    }
    Ok(())
}

fn listed_occupations() -> Vec<String> {
    Occupation::LISTED.iter().map(|o| o.as_str().to_string()).collect()
}

fn profile_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "health_profile",
        "description": "Self-reported health metrics for a sleep risk assessment",
        "type": "object",
        "required": [
            "sex", "age", "bmi_category", "sleep_duration", "sleep_quality",
            "physical_activity", "daily_steps", "stress_level", "heart_rate",
            "bp_systolic", "bp_diastolic"
        ],
        "properties": {
            "sex": { "type": "string", "enum": ["Male", "Female"] },
            "age": { "type": "integer", "minimum": 10, "maximum": 100 },
            "occupation": {
                "type": "string",
                "examples": listed_occupations(),
                "default": "Other"
            },
            "bmi_category": {
                "type": "string",
                "enum": ["Normal", "Normal Weight", "Overweight", "Obese"]
            },
            "sleep_duration": { "type": "number", "minimum": 0.0, "maximum": 12.0 },
            "sleep_quality": { "type": "integer", "minimum": 1, "maximum": 10 },
            "physical_activity": { "type": "integer", "minimum": 0, "maximum": 120 },
            "daily_steps": { "type": "integer", "minimum": 0, "maximum": 20000 },
            "stress_level": { "type": "integer", "minimum": 1, "maximum": 10 },
            "heart_rate": { "type": "integer", "minimum": 40, "maximum": 120 },
            "bp_systolic": { "type": "integer", "minimum": 80, "maximum": 200 },
            "bp_diastolic": { "type": "integer", "minimum": 50, "maximum": 130 }
        }
    })
    .to_string()
}

fn assessment_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "assessment",
        "description": "Sleep risk assessment output",
        "type": "object",
        "required": ["id", "assessed_at", "profile", "result", "sleep_score", "recommendations", "report", "flags"],
        "properties": {
            "id": { "type": "string", "format": "uuid" },
            "assessed_at": { "type": "string", "format": "date-time" },
            "profile": { "type": "object" },
            "result": {
                "type": ["object", "null"],
                "properties": {
                    "label": { "type": "string", "enum": ["Healthy", "Insomnia", "Sleep Apnea"] },
                    "risk_score": { "type": "integer", "minimum": 0, "maximum": 100 },
                    "raw_label": { "type": "string", "enum": ["Healthy", "Insomnia", "Sleep Apnea"] },
                    "override_rule": {
                        "type": ["string", "null"],
                        "enum": ["short_sleep", "long_sleep", "stressed_poor_sleep", "abnormal_heart_rate", null]
                    }
                }
            },
            "sleep_score": {
                "type": "object",
                "properties": {
                    "value": { "type": "integer", "minimum": 0, "maximum": 100 },
                    "band": { "type": "string", "enum": ["good", "needs_improvement"] },
                    "breakdown": { "type": "object" }
                }
            },
            "recommendations": { "type": "array", "minItems": 1, "items": { "type": "string" } },
            "report": {
                "type": ["object", "null"],
                "properties": {
                    "text": { "type": "string" },
                    "generated_at": { "type": "string", "format": "date-time" }
                }
            },
            "flags": {
                "type": "array",
                "items": {
                    "type": "string",
                    "enum": ["unknown_occupation", "model_unavailable", "inference_failed", "rule_override"]
                }
            }
        }
    })
    .to_string()
}

fn file_check(name: &str, path: &Path) -> DoctorCheck {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => DoctorCheck {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: format!("{} ({} bytes)", path.display(), meta.len()),
        },
        Ok(_) => DoctorCheck {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: format!("{} is not a file", path.display()),
        },
        Err(_) => DoctorCheck {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: format!("{} does not exist", path.display()),
        },
    }
}

// Error types

#[derive(Debug)]
enum SleepRiskCliError {
    Io(io::Error),
    Assessment(AssessmentError),
    Json(serde_json::Error),
    NoProfiles,
    NoAdjustments,
    ModelUnavailable(String),
    NoImportances,
    ValidationFailed(usize),
    DoctorFailed,
    ParseError(String),
}

impl From<io::Error> for SleepRiskCliError {
    fn from(e: io::Error) -> Self {
        SleepRiskCliError::Io(e)
    }
}

impl From<AssessmentError> for SleepRiskCliError {
    fn from(e: AssessmentError) -> Self {
        SleepRiskCliError::Assessment(e)
    }
}

impl From<serde_json::Error> for SleepRiskCliError {
    fn from(e: serde_json::Error) -> Self {
        SleepRiskCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<SleepRiskCliError> for CliError {
    fn from(e: SleepRiskCliError) -> Self {
        match e {
            SleepRiskCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            SleepRiskCliError::Assessment(AssessmentError::InvalidProfile(msg)) => CliError {
                code: "INVALID_PROFILE".to_string(),
                message: msg,
                hint: Some("Run 'sleeprisk validate' for details".to_string()),
            },
            SleepRiskCliError::Assessment(e) if e.is_fatal() => CliError {
                code: "MODEL_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Re-export the model artifacts and run 'sleeprisk doctor'".to_string()),
            },
            SleepRiskCliError::Assessment(e) => CliError {
                code: "ASSESSMENT_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            SleepRiskCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax and run 'sleeprisk schema profile'".to_string()),
            },
            SleepRiskCliError::NoProfiles => CliError {
                code: "NO_PROFILES".to_string(),
                message: "No profiles found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            SleepRiskCliError::NoAdjustments => CliError {
                code: "NO_ADJUSTMENTS".to_string(),
                message: "No habit adjustments given".to_string(),
                hint: Some(
                    "Pass at least one of --sleep-duration, --sleep-quality, --stress-level, --physical-activity"
                        .to_string(),
                ),
            },
            SleepRiskCliError::ModelUnavailable(reason) => CliError {
                code: "MODEL_UNAVAILABLE".to_string(),
                message: reason,
                hint: Some("Set --model-dir or SLEEPRISK_MODEL_DIR".to_string()),
            },
            SleepRiskCliError::NoImportances => CliError {
                code: "NO_IMPORTANCES".to_string(),
                message: "Model artifact carries no feature importances".to_string(),
                hint: Some("Export the forest with feature_importances".to_string()),
            },
            SleepRiskCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} profiles failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            SleepRiskCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
            SleepRiskCliError::ParseError(msg) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Check input format".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_profiles: usize,
    valid_profiles: usize,
    invalid_profiles: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    field: String,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    model_dir: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

#[derive(serde::Serialize)]
struct ImportanceEntry {
    feature: String,
    importance: f64,
}

#[derive(serde::Serialize)]
struct SimulationSummary {
    current_score: u8,
    simulated_score: u8,
    score_delta: i16,
    verdict: sleep_risk::Verdict,
    message: &'static str,
    current_label: Option<sleep_risk::SleepDisorder>,
    simulated_label: Option<sleep_risk::SleepDisorder>,
    adjusted_profile: HealthProfile,
}

impl From<&Simulation> for SimulationSummary {
    fn from(sim: &Simulation) -> Self {
        Self {
            current_score: sim.current_score().value,
            simulated_score: sim.simulated_score().value,
            score_delta: sim.score_delta,
            verdict: sim.verdict,
            message: sim.verdict.message(),
            current_label: sim.current_label(),
            simulated_label: sim.simulated_label(),
            adjusted_profile: sim.simulated.profile.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_artifact_is_warning_not_error() {
        let dir = TempDir::new().unwrap();
        let check = file_check(DEFAULT_MODEL_FILE, &dir.path().join(DEFAULT_MODEL_FILE));
        assert!(matches!(check.status, CheckStatus::Warning));
    }

    #[test]
    fn test_present_artifact_is_ok() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_LABEL_ENCODER_FILE);
        fs::write(&path, r#"{"classes": ["Healthy"]}"#).unwrap();

        let check = file_check(DEFAULT_LABEL_ENCODER_FILE, &path);
        assert!(matches!(check.status, CheckStatus::Ok));
    }

    #[test]
    fn test_directory_in_place_of_artifact_is_error() {
        let dir = TempDir::new().unwrap();
        let check = file_check(DEFAULT_MODEL_FILE, dir.path());
        assert!(matches!(check.status, CheckStatus::Error));
    }
}
