use crate::cli::{configure_thread_pool, get_worker_count};
use crate::config::{load_config, RecordAuditConfig};
use crate::io::output::{create_writer, OutputFormat};
use crate::io::{load_snapshot, write_corrections_file};
use crate::observability::{set_phase, AuditPhase};
use crate::pipeline::{run_audit, AuditOptions, AuditReport};
use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// Inputs of `record-audit audit`.
#[derive(Debug, Clone, Default)]
pub struct AuditCommand {
    pub snapshot: PathBuf,
    pub year: Option<i32>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub corrections: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub no_parallel: bool,
    pub jobs: Option<usize>,
}

/// CLI flag, then `[audit] target_year`, then the current UTC year.
pub fn resolve_target_year(cli_year: Option<i32>, config: &RecordAuditConfig) -> i32 {
    cli_year
        .or_else(|| config.target_year())
        .unwrap_or_else(|| Utc::now().year())
}

pub fn resolve_options(command: &AuditCommand, config: &RecordAuditConfig) -> AuditOptions {
    AuditOptions {
        target_year: resolve_target_year(command.year, config),
        parallel: !command.no_parallel && config.parallel(),
    }
}

/// Run the audit and write the report. Returns the report for exit-status
/// decisions.
pub fn audit_archive(command: AuditCommand) -> Result<AuditReport> {
    let config = load_config(command.config.as_deref())?;
    let options = resolve_options(&command, &config);
    if options.parallel {
        let jobs = command.jobs.unwrap_or_else(|| config.jobs());
        configure_thread_pool(jobs);
        info!(workers = get_worker_count(jobs), "Parallel record scans enabled");
    }

    let snapshot = load_snapshot(&command.snapshot, config.continent_tags()?)
        .with_context(|| format!("Failed to load snapshot {}", command.snapshot.display()))?;

    let report = run_audit(&snapshot, &options).context("Record audit failed")?;

    let _phase = set_phase(AuditPhase::OutputGeneration);
    let format = command
        .format
        .or_else(|| config.default_format())
        .unwrap_or(OutputFormat::Terminal);
    write_report(&report, format, command.output.as_ref())?;

    if let Some(path) = &command.corrections {
        write_corrections_file(&report, path)?;
        info!(path = %path.display(), "Wrote corrections");
    }
    Ok(report)
}

fn write_report(report: &AuditReport, format: OutputFormat, output: Option<&PathBuf>) -> Result<()> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output file {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    create_writer(format, sink).write_report(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_cli_year_wins() {
        let config = parse_config("[audit]\ntarget_year = 2020\n").unwrap();
        assert_eq!(resolve_target_year(Some(2024), &config), 2024);
        assert_eq!(resolve_target_year(None, &config), 2020);
    }

    #[test]
    fn test_year_defaults_to_current() {
        let year = resolve_target_year(None, &RecordAuditConfig::default());
        assert_eq!(year, Utc::now().year());
    }

    #[test]
    fn test_no_parallel_flag_overrides_config() {
        let config = RecordAuditConfig::default();
        let command = AuditCommand {
            no_parallel: true,
            year: Some(2024),
            ..AuditCommand::default()
        };
        let options = resolve_options(&command, &config);
        assert!(!options.parallel);
        assert_eq!(options.target_year, 2024);
    }
}
