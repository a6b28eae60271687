//! `backup perform`: configure paths once, then run every trigger.
//!
//! A path configuration failure aborts before any trigger runs.  Per-trigger
//! failures are collected; the command fails at the end if there was at
//! least one.

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::{
    cli::PerformArgs,
    engine::{Engine, RunReport},
    logging,
    paths::{RunConfiguration, apply_overrides, configure},
    resolver::TomlResolver,
    ui,
};

// ─── Entry point ──────────────────────────────────────────────────────────────

pub fn run(args: &PerformArgs) -> Result<()> {
    if args.print_config {
        let run = apply_overrides(RunConfiguration::default(), args.overrides());
        print!("{}", toml::to_string_pretty(&run).context("rendering paths")?);
        return Ok(());
    }

    let raw = args.trigger.as_deref().context("--trigger is required")?;
    let run = configure(RunConfiguration::default(), args.overrides())
        .context("configuring backup paths")?;
    logging::init_logging(Some(&run.log_root))?;

    let report = execute(&run, raw);
    ui::print_summary(&report);
    check(&report)
}

/// Run all triggers in `raw` against already-configured paths.
pub fn execute(run: &RunConfiguration, raw: &str) -> RunReport {
    info!(
        config = %run.config_source.display(),
        data = %run.data_root.display(),
        "performing triggers: {raw}"
    );
    Engine::new(run, TomlResolver).run(raw)
}

/// Turn a report into the command's result.
pub fn check(report: &RunReport) -> Result<()> {
    let failed = report.failures().count();
    if failed > 0 {
        bail!(
            "{failed} of {} trigger(s) failed",
            report.outcomes.len()
        );
    }
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
