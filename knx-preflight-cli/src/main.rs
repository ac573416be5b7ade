use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use knx_preflight_core::{validate_file, Report, Verdict};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "knx-preflight")]
#[command(about = "Pre-flight validator for KNX device-description XML")]
struct Cli {
    /// Device description to validate
    document: PathBuf,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let report = validate_file(&cli.document);

    if cli.json {
        print_json(&cli.document, &report)?;
    } else {
        print_text(&cli.document, &report);
    }

    Ok(match report.verdict() {
        Verdict::Pass => ExitCode::SUCCESS,
        Verdict::Fail => ExitCode::FAILURE,
    })
}

fn print_json(document: &PathBuf, report: &Report) -> Result<()> {
    let payload = serde_json::json!({
        "document": document.display().to_string(),
        "passed": report.passed(),
        "warnings": report.warnings(),
        "errors": report.errors(),
        "verdict": report.verdict(),
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn print_text(document: &PathBuf, report: &Report) {
    let rule = "=".repeat(60);

    println!("Validating: {}", document.display());
    println!("\n{rule}");
    println!("KNX XML VALIDATION REPORT");
    println!("{rule}");

    if !report.passed().is_empty() {
        println!("\nPASSED ({}):", report.passed().len());
        for msg in report.passed() {
            println!("  OK: {msg}");
        }
    }

    if !report.warnings().is_empty() {
        println!("\nWARNINGS ({}):", report.warnings().len());
        for msg in report.warnings() {
            println!("  WARNING: {msg}");
        }
    }

    if !report.errors().is_empty() {
        println!("\nERRORS ({}):", report.errors().len());
        for msg in report.errors() {
            println!("  ERROR: {msg}");
        }
    }

    println!("\n{rule}");
    match report.verdict() {
        Verdict::Fail => println!(
            "RESULT: FAIL - {} error(s) will cause import failure",
            report.error_count()
        ),
        Verdict::Pass => println!("RESULT: PASS - document should import successfully"),
    }
    println!("{rule}");
}
