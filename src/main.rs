use anyhow::Result;
use record_audit::cli::{parse_args, Commands};
use record_audit::commands::{self, AuditCommand};
use record_audit::observability::{init_tracing, install_panic_hook};
use std::process::ExitCode;

/// Exit status when `--fail-on-discrepancy` is set and labels need fixing.
const DISCREPANCY_EXIT_CODE: u8 = 2;

fn main() -> Result<ExitCode> {
    install_panic_hook();
    let cli = parse_args();
    init_tracing(cli.verbosity);

    match cli.command {
        Commands::Audit {
            snapshot,
            year,
            format,
            output,
            corrections,
            config,
            no_parallel,
            jobs,
            fail_on_discrepancy,
        } => {
            let report = commands::audit_archive(AuditCommand {
                snapshot,
                year,
                format: format.map(Into::into),
                output,
                corrections,
                config,
                no_parallel,
                jobs,
            })?;
            if fail_on_discrepancy && report.has_discrepancies() {
                return Ok(ExitCode::from(DISCREPANCY_EXIT_CODE));
            }
        }
        Commands::Validate { snapshot, config } => {
            commands::validate_snapshot(snapshot, config)?;
        }
        Commands::Init { force } => commands::init_config(force)?,
    }
    Ok(ExitCode::SUCCESS)
}
