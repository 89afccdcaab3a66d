use colored::*;
use schemas_core::{FieldStatus, ValidationResult};
use schemas_validator::{ReportFormat, Reporter, summary_lines};

pub fn print_validation_result(result: &ValidationResult, format: ReportFormat) {
    match format {
        ReportFormat::Json => println!("{}", Reporter::format(result, ReportFormat::Json)),
        ReportFormat::Text => print_text_report(result),
    }
}

fn print_text_report(result: &ValidationResult) {
    println!("\n{}", "═".repeat(60));
    println!(
        "{}",
        format!("  VALIDATION REPORT: {}", result.data_type()).bold()
    );
    println!("{}", "═".repeat(60));

    if result.passed() {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    if !result.diagnostics().is_empty() {
        println!("\n{}", "Diagnostics:".red().bold());
        for (i, diagnostic) in result.diagnostics().iter().enumerate() {
            println!("  {}. {}", i + 1, diagnostic.to_string().red());
        }
    }

    if !result.warnings().is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for (i, warning) in result.warnings().iter().enumerate() {
            println!("  {}. {}", i + 1, warning.yellow());
        }
    }

    println!("\n{}", "Fields:".bold());
    for outcome in result.outcomes() {
        let status = format!("{:<12}", outcome.status);
        let status = match outcome.status {
            FieldStatus::Passed => status.green(),
            FieldStatus::Failed | FieldStatus::Missing => status.red(),
            FieldStatus::Skipped => status.yellow(),
            FieldStatus::NotProvided => status.dimmed(),
        };
        println!("  {:<24} {} ({})", outcome.field, status, outcome.origin);
    }

    println!("\n{}", "Summary:".bold());
    for (label, count) in summary_lines(result) {
        println!("  {:<17}{}", label, count);
    }
    println!("{}", "═".repeat(60));
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
