use clap::{Parser, Subcommand};
use iban_testgen::export::{ExportFormat, ExportMetadata, IbanExport};
use iban_testgen::generator::{BatchStatus, IbanGenerator};
use iban_testgen::logging;
use iban_testgen::models::{CountrySpec, FieldSpec, ValidationResult};
use iban_testgen::request::{validate_country_code, GenerationRequest};
use iban_testgen::validation::validate_iban_with;
use iban_testgen::{format_iban, Entropy, IbanConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "iban-testgen")]
#[command(about = "Test IBAN generator and validator", long_about = None)]
struct Cli {
    /// JSON configuration replacing the built-in country table
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Generate(GenerateArgs),
    Validate(ValidateArgs),
    Format(FormatArgs),
    Countries,
    Banks(BanksArgs),
}

#[derive(Parser)]
struct GenerateArgs {
    #[arg(long)]
    country: String,
    /// Directory key or bank code
    #[arg(long)]
    bank: Option<String>,
    #[arg(long, default_value_t = 1)]
    quantity: usize,
    #[arg(long, value_enum)]
    format: Option<ExportFormat>,
    /// File or directory to write the export to
    #[arg(long)]
    output: Option<PathBuf>,
    /// Reproducible run; not for production data
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser)]
struct ValidateArgs {
    ibans: Vec<String>,
    /// File with one IBAN per line
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser)]
struct FormatArgs {
    iban: String,
}

#[derive(Parser)]
struct BanksArgs {
    #[arg(long)]
    country: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CandidateReport<'a> {
    input: &'a str,
    #[serde(flatten)]
    result: &'a ValidationResult,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    logging::init_logging("iban-testgen")?;
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => IbanConfig::load(path).map_err(|err| err.to_string())?,
        None => IbanConfig::builtin(),
    };
    match cli.command {
        Command::Generate(args) => run_generate(&config, args),
        Command::Validate(args) => run_validate(&config, args),
        Command::Format(args) => {
            println!("{}", format_iban(&args.iban));
            Ok(())
        }
        Command::Countries => run_countries(&config),
        Command::Banks(args) => run_banks(&config, args),
    }
}

fn run_generate(config: &IbanConfig, args: GenerateArgs) -> Result<(), String> {
    let mut request = GenerationRequest::new(&args.country, args.quantity);
    if let Some(bank) = &args.bank {
        request = request.with_bank(bank);
    }
    let request = request.validate(config).map_err(|err| err.to_string())?;

    let mut rng = args.seed.map(Entropy::seeded).unwrap_or_else(Entropy::os);
    let generator = IbanGenerator::new(config);
    let outcome = generator.generate_batch(
        &mut rng,
        &request.country,
        request.bank.as_ref(),
        request.quantity,
    );
    match outcome.status() {
        BatchStatus::Failed => {
            return Err(outcome
                .summary()
                .unwrap_or_else(|| "IBAN generation failed".to_string()))
        }
        BatchStatus::Partial { .. } => {
            if let Some(summary) = outcome.summary() {
                log::warn!("{summary}");
            }
        }
        BatchStatus::Complete => {}
    }

    let metadata = ExportMetadata {
        country: Some(request.country.clone()),
        bank: request.bank.as_ref().map(|bank| bank.name.clone()),
        quantity: Some(request.quantity),
        generated_at: Some(chrono::Utc::now()),
    };
    let export = IbanExport::new(config, &outcome.ibans, metadata);

    match (&args.output, args.format) {
        (Some(output), format) => {
            let format = format.unwrap_or(ExportFormat::Text);
            let path = resolve_output_path(output, &export.filename(format));
            export
                .write_to(&path, format)
                .map_err(|err| err.to_string())?;
            emit_info_line(&format!(
                "Generated {} {} IBANs -> {}",
                outcome.ibans.len(),
                request.country,
                path.display()
            ));
        }
        (None, Some(format)) => {
            let rendered = export.render(format).map_err(|err| err.to_string())?;
            println!("{}", rendered.trim_end());
        }
        (None, None) => {
            for iban in &outcome.ibans {
                println!("{iban}");
            }
        }
    }
    Ok(())
}

fn resolve_output_path(output: &Path, filename: &str) -> PathBuf {
    if output.is_dir() {
        output.join(filename)
    } else {
        output.to_path_buf()
    }
}

fn read_candidates(args: &ValidateArgs) -> Result<Vec<String>, String> {
    let mut candidates = args.ibans.clone();
    if let Some(input) = &args.input {
        let contents = std::fs::read_to_string(input)
            .map_err(|err| format!("{}: {}", input.display(), err))?;
        candidates.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }
    if candidates.is_empty() {
        return Err("no IBANs given; pass them as arguments or with --input".to_string());
    }
    Ok(candidates)
}

fn run_validate(config: &IbanConfig, args: ValidateArgs) -> Result<(), String> {
    let candidates = read_candidates(&args)?;
    let results: Vec<ValidationResult> = candidates
        .iter()
        .map(|candidate| validate_iban_with(config, candidate))
        .collect();

    if args.json {
        let reports: Vec<CandidateReport> = candidates
            .iter()
            .zip(&results)
            .map(|(input, result)| CandidateReport { input, result })
            .collect();
        let json = serde_json::to_string_pretty(&reports).map_err(|err| err.to_string())?;
        println!("{json}");
    } else {
        for (candidate, result) in candidates.iter().zip(&results) {
            match &result.formatted {
                Some(formatted) if result.is_valid => println!("VALID    {formatted}"),
                _ => println!("INVALID  {}: {}", candidate, result.errors.join("; ")),
            }
        }
    }

    let invalid = results.iter().filter(|result| !result.is_valid).count();
    emit_info_line(&format!(
        "Validated {} IBANs: {} valid, {} invalid",
        results.len(),
        results.len() - invalid,
        invalid
    ));
    emit_error_summary(&results);

    if invalid > 0 {
        return Err(format!("{} of {} IBANs are invalid", invalid, results.len()));
    }
    Ok(())
}

fn emit_error_summary(results: &[ValidationResult]) {
    let mut counts = std::collections::HashMap::new();
    for message in results.iter().flat_map(|result| result.errors.iter()) {
        *counts.entry(message.as_str()).or_insert(0usize) += 1;
    }
    if counts.is_empty() {
        return;
    }

    let mut items: Vec<(&str, usize)> = counts.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let max_items = 5usize;
    for (message, count) in items.iter().take(max_items) {
        emit_info_line(&format!("Validation errors: {} = {}", message, count));
    }
    if items.len() > max_items {
        emit_info_line(&format!(
            "Validation errors: {} additional error types not shown",
            items.len() - max_items
        ));
    }
}

fn describe_field(label: &str, field: FieldSpec) -> String {
    format!("{} {}{}", label, field.length, short_kind(field))
}

fn short_kind(field: FieldSpec) -> &'static str {
    match field.kind {
        iban_testgen::CharacterType::Numeric => "n",
        iban_testgen::CharacterType::AlphaUpper => "a",
        iban_testgen::CharacterType::AlphanumericUpper => "c",
    }
}

fn describe_spec(spec: &CountrySpec) -> String {
    let mut parts = vec![describe_field("bank", spec.bank_code())];
    if let Some(branch) = spec.branch_code() {
        parts.push(describe_field("branch", branch));
    }
    parts.push(describe_field("account", spec.account()));
    if let Some(check) = spec.national_check() {
        parts.push(describe_field("check", check));
    }
    parts.join(", ")
}

fn run_countries(config: &IbanConfig) -> Result<(), String> {
    for code in config.available_countries() {
        let Some(spec) = config.country_spec(&code) else {
            continue;
        };
        println!(
            "{}  {:<16} {:>2}  {}",
            code,
            config.country_name(&code),
            spec.length,
            describe_spec(&spec)
        );
    }
    Ok(())
}

fn run_banks(config: &IbanConfig, args: BanksArgs) -> Result<(), String> {
    let country = validate_country_code(config, &args.country).map_err(|err| err.to_string())?;
    let banks = config.country_banks(&country);
    if banks.is_empty() {
        emit_info_line(&format!("No banks listed for {country}"));
        return Ok(());
    }
    for (key, bank) in banks {
        println!("{:<10} {:<10} {}", key, bank.code, bank.name);
    }
    Ok(())
}

fn emit_info_line(message: &str) {
    if log::log_enabled!(log::Level::Info) {
        log::info!("{}", message);
    } else {
        eprintln!("{message}");
    }
}
