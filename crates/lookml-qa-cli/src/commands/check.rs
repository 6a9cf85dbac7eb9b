//! Check command implementation.

use anyhow::{Context, Result};
use chrono::Utc;
use lookml_qa_core::{AnalysisSession, ModelBuilder, Report, RuleEngine};
use lookml_qa_rules::Preset;
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// File extensions treated as LookML.
const LOOKML_EXTENSIONS: &[&str] = &["lkml", "lookml"];

/// Path that stands for standard input.
const STDIN_PATH: &str = "-";

/// Options of the check command.
#[derive(Debug)]
pub struct CheckOptions {
    pub paths: Vec<PathBuf>,
    pub format: OutputFormat,
    pub checks: Vec<String>,
    pub preset: Option<String>,
    pub export: Option<PathBuf>,
    pub parallel: bool,
}

/// One analyzed input.
pub struct Analyzed {
    pub name: String,
    pub report: Report,
}

/// Runs the check command.
pub fn run(options: &CheckOptions, source: &ConfigSource) -> Result<()> {
    let config = source.load()?;

    let preset = match &options.preset {
        Some(name) => name.parse::<Preset>()?,
        None => Preset::from_config(&config).context("Invalid preset in config")?,
    };
    let mut registry = preset.registry(&config);
    if !options.checks.is_empty() {
        registry = registry
            .filtered(&options.checks)
            .context("Invalid --checks selection")?;
    }

    let engine = RuleEngine::from_config(&config).parallel(options.parallel || config.engine.parallel);
    let session = AnalysisSession::new(&registry)
        .with_engine(engine)
        .with_builder(ModelBuilder::new().max_depth(config.engine.max_depth));

    let inputs = collect_inputs(&options.paths)?;
    tracing::info!(
        "Analyzing {} file(s) with {} checks (preset: {})",
        inputs.len(),
        registry.len(),
        preset
    );

    let mut analyzed = Vec::new();
    let mut parse_errors = 0usize;
    for input in &inputs {
        let (name, text) = read_input(input)?;
        match session.analyze(&text) {
            Ok(report) => analyzed.push(Analyzed { name, report }),
            Err(err) => {
                parse_errors += 1;
                let diagnostic =
                    miette::Report::new(err).with_source_code(miette::NamedSource::new(&name, text));
                eprintln!("{diagnostic:?}");
            }
        }
    }

    super::output::print(&analyzed, options.format)?;

    if let Some(dir) = &options.export {
        export_reports(&session, &analyzed, dir)?;
    }

    let threshold = config.fail_threshold();
    if parse_errors > 0 || analyzed.iter().any(|a| a.report.has_findings_at(threshold)) {
        std::process::exit(1);
    }

    Ok(())
}

/// Expands the command-line paths into the LookML files to analyze.
///
/// Directories are walked respecting `.gitignore`; files inside them are
/// sorted so reports come out in a stable order. Explicit file paths are
/// taken as given.
fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.as_os_str() == STDIN_PATH || !path.is_dir() {
            inputs.push(path.clone());
            continue;
        }

        let mut found = Vec::new();
        for entry in ignore::WalkBuilder::new(path).build() {
            let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
            if entry.file_type().is_some_and(|t| t.is_file()) && is_lookml(entry.path()) {
                found.push(entry.into_path());
            }
        }
        found.sort();
        if found.is_empty() {
            tracing::warn!("No LookML files found under {}", path.display());
        }
        inputs.extend(found);
    }
    Ok(inputs)
}

fn is_lookml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| LOOKML_EXTENSIONS.contains(&e))
}

fn read_input(path: &Path) -> Result<(String, String)> {
    if path.as_os_str() == STDIN_PATH {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(("<stdin>".to_string(), text));
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok((path.display().to_string(), text))
}

/// Writes one text report per analyzed input.
///
/// With several inputs, file names are prefixed with the input's file stem
/// so reports generated within the same millisecond do not collide. Inputs
/// sharing a stem get `-2`, `-3`, ... suffixes in input order.
fn export_reports(session: &AnalysisSession<'_>, analyzed: &[Analyzed], dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let generated_at = Utc::now();
    let prefixes = export_prefixes(analyzed.iter().map(|a| a.name.as_str()));
    for (item, prefix) in analyzed.iter().zip(prefixes) {
        let exported = session.export(&item.report, generated_at);
        let file_name = if analyzed.len() > 1 {
            format!("{prefix}.{}", exported.file_name)
        } else {
            exported.file_name
        };
        let target = dir.join(file_name);
        std::fs::write(&target, &exported.bytes)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        tracing::info!("Exported report to {}", target.display());
    }
    Ok(())
}

/// Unique, file-name-safe prefixes for the given input names.
fn export_prefixes<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::new();
    names
        .map(|name| {
            let base = stem(name);
            let mut candidate = base.clone();
            let mut n = 1;
            while !taken.insert(candidate.clone()) {
                n += 1;
                candidate = format!("{base}-{n}");
            }
            candidate
        })
        .collect()
}

/// File stem with every extension removed, reduced to `[A-Za-z0-9_-]`.
fn stem(name: &str) -> String {
    let raw = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .map_or(name, |n| n.split('.').next().unwrap_or(n));
    let safe: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let safe = safe.trim_matches('_');
    if safe.is_empty() {
        "input".to_string()
    } else {
        safe.to_string()
    }
}
