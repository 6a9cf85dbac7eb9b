//! Shared output formatting for analysis results.

use anyhow::Result;
use lookml_qa_core::{Report, Status};
use serde::Serialize;

use super::check::Analyzed;
use crate::OutputFormat;

const RESET: &str = "\x1b[0m";

/// Terminal color for each status.
fn status_color(status: Status) -> &'static str {
    match status {
        Status::Pass => "\x1b[32m",
        Status::Warning => "\x1b[33m",
        Status::Fail => "\x1b[31m",
    }
}

/// Print analysis results in the specified format.
pub fn print(analyzed: &[Analyzed], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(analyzed),
        OutputFormat::Json => return print_json(analyzed),
        OutputFormat::Compact => print_compact(analyzed),
    }
    Ok(())
}

fn print_text(analyzed: &[Analyzed]) {
    let (mut passed, mut failed, mut warnings) = (0, 0, 0);

    for item in analyzed {
        let report = &item.report;
        println!("==> {}", item.name);
        for result in report.results() {
            let status = result.status();
            println!(
                "{}{:<7}{} {} [{}]",
                status_color(status),
                status.label(),
                RESET,
                result.name,
                result.category
            );
            println!("  {}", result.message());
            let recommendation = result
                .outcome
                .finding()
                .and_then(|f| f.recommendation.as_deref());
            if let Some(recommendation) = recommendation {
                println!("  = help: {recommendation}");
            }
        }
        println!();
        passed += report.passed();
        failed += report.failed();
        warnings += report.warnings();
    }

    let worst = if failed > 0 {
        Status::Fail
    } else if warnings > 0 {
        Status::Warning
    } else {
        Status::Pass
    };

    println!(
        "{}Passed: {}, Failed: {}, Warnings: {} in {} file(s){}",
        status_color(worst),
        passed,
        failed,
        warnings,
        analyzed.len(),
        RESET
    );
}

#[derive(Serialize)]
struct FileReport<'a> {
    file: &'a str,
    report: &'a Report,
}

fn print_json(analyzed: &[Analyzed]) -> Result<()> {
    let files: Vec<FileReport<'_>> = analyzed
        .iter()
        .map(|a| FileReport {
            file: &a.name,
            report: &a.report,
        })
        .collect();
    let json = serde_json::to_string_pretty(&files)?;
    println!("{json}");
    Ok(())
}

fn print_compact(analyzed: &[Analyzed]) {
    for item in analyzed {
        for result in item.report.results() {
            if result.status() == Status::Pass {
                continue;
            }
            println!(
                "{}: {} [{}] {}",
                item.name,
                result.status(),
                result.id,
                result.message(),
            );
        }
    }
}
