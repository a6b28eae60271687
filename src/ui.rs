//! Terminal UI: spinners, job headings, stage lines and the run summary.
//!
//! # Design goals
//!
//! - **Clean by default.** While a stage is running the user sees only a spinner and the stage
//!   name.  Raw command output is captured and hidden.
//! - **Informative on failure.** If a stage exits non-zero its captured stdout *and* stderr are
//!   printed in full so the operator can diagnose the problem without re-running manually.
//!
//! Structured log lines go through `tracing` (see [`crate::logging`]); this
//! module only draws the human-facing progress view.

use std::{
    io::{self, Write},
    process::{Command, Output, Stdio},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::engine::RunReport;

// ─── Icons ───────────────────────────────────────────────────────────────────

/// Braille spinner frames, same style as indicatif's default.
static SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

fn icon_ok() -> console::StyledObject<&'static str> {
    style("✓").green().bold()
}
fn icon_err() -> console::StyledObject<&'static str> {
    style("✗").red().bold()
}
fn icon_done() -> console::StyledObject<&'static str> {
    style("✓").cyan().bold()
}

// ─── Stage result ─────────────────────────────────────────────────────────────

/// The outcome of a single job stage.
///
/// Carries the stage name plus whatever the command wrote to stdout/stderr so
/// it can be replayed to the terminal when something goes wrong.
#[derive(Debug)]
pub struct StageOutcome {
    pub label: String,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub error: Option<String>,
}

impl StageOutcome {
    /// Print the one-line summary (✓/✗ + label).
    ///
    /// On failure, also prints the captured stdout/stderr and the error
    /// message so the operator has everything they need without re-running.
    pub fn print(&self) {
        if self.success {
            println!("    {}  {}", icon_ok(), style(&self.label).bold());
            return;
        }

        println!("    {}  {}", icon_err(), style(&self.label).bold());

        if let Some(ref msg) = self.error {
            eprintln!();
            eprintln!("    {} {}", style("Error:").red().bold(), msg);
        }
        if !self.stdout.is_empty() {
            eprintln!();
            eprintln!("    {} stdout:", style("►").dim());
            for line in self.stdout.lines() {
                eprintln!("      {line}");
            }
        }
        if !self.stderr.is_empty() {
            eprintln!();
            eprintln!("    {} stderr:", style("►").dim());
            for line in self.stderr.lines() {
                eprintln!("      {line}");
            }
        }
    }

    pub const fn failed(&self) -> bool {
        !self.success
    }
}

// ─── Spinner ──────────────────────────────────────────────────────────────────

/// Create and start an indeterminate spinner for `label`.
fn make_spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let spinner_style = ProgressStyle::with_template("    {spinner:.cyan}  {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(SPINNER_CHARS);
    pb.set_style(spinner_style);
    pb.set_message(format!("{}", style(label).dim()));
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

// ─── Execution ────────────────────────────────────────────────────────────────

/// Run a command, capturing both stdout and stderr.
///
/// Returns `(success, stdout_text, stderr_text)`.
pub fn run_captured(args: &[String]) -> Result<(bool, String, String)> {
    let (prog, rest) = args.split_first().context("cannot run an empty command")?;

    let output: Output = Command::new(prog)
        .args(rest)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .with_context(|| format!("failed to spawn: {}", args.join(" ")))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    Ok((output.status.success(), stdout, stderr))
}

/// Run a command attached to the terminal so it can prompt (e.g. for a
/// passphrase).  Errors if it cannot be spawned or exits non-zero.
pub fn run_interactive(args: &[String]) -> Result<()> {
    let (prog, rest) = args.split_first().context("cannot run an empty command")?;

    let status = Command::new(prog)
        .args(rest)
        .status()
        .with_context(|| format!("failed to spawn: {}", args.join(" ")))?;

    if !status.success() {
        bail!("command exited non-zero: {}", args.join(" "));
    }
    Ok(())
}

/// Run one stage behind a spinner, returning a [`StageOutcome`].
///
/// The spinner is cleared before the outcome is returned, so the terminal
/// always shows a clean, static summary when the stage finishes.
pub fn run_stage(label: &str, args: &[String]) -> StageOutcome {
    let spinner = make_spinner(label);

    let result = run_captured(args);
    spinner.finish_and_clear();

    let (success, stdout, stderr, error) = match result {
        Ok((true, stdout, stderr)) => (true, stdout, stderr, None),
        Ok((false, stdout, stderr)) => (
            false,
            stdout,
            stderr,
            Some(format!("command exited non-zero: {}", args.join(" "))),
        ),
        Err(e) => (false, String::new(), String::new(), Some(format!("{e:#}"))),
    };

    StageOutcome {
        label: label.to_string(),
        success,
        stdout,
        stderr,
        error,
    }
}

// ─── Headings and summary ─────────────────────────────────────────────────────

/// Printed once per job, before its stages.
pub fn print_job_heading(label: &str, trigger: &str) {
    println!();
    println!(
        "  {}  {}",
        style(label).bold(),
        style(format!("({trigger})")).dim()
    );
}

/// Print the final summary after every trigger has been processed.
///
/// A clean run goes to stdout; a run with failures goes to stderr.
pub fn print_summary(report: &RunReport) {
    let result = if report.all_succeeded() {
        write_summary(&mut std::io::stdout().lock(), report)
    } else {
        write_summary(&mut std::io::stderr().lock(), report)
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, "could not print run summary");
    }
}

fn write_summary(out: &mut dyn Write, report: &RunReport) -> io::Result<()> {
    writeln!(out)?;
    if report.all_succeeded() {
        writeln!(
            out,
            "  {} {}",
            icon_done(),
            style("All triggers completed successfully.").cyan().bold()
        )?;
    } else {
        writeln!(
            out,
            "  {}  {}",
            icon_err(),
            style("Some triggers failed.").red().bold()
        )?;
        for o in report.failures() {
            let reason = o
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            writeln!(
                out,
                "    {} {}  {}",
                icon_err(),
                style(display_trigger(&o.trigger)).red(),
                style(reason).dim()
            )?;
        }
    }
    writeln!(out)
}

/// Blank trigger names would otherwise print as nothing at all.
fn display_trigger(trigger: &str) -> String {
    if trigger.is_empty() {
        "(blank trigger)".into()
    } else {
        trigger.to_string()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
