//! Trigger execution engine.
//!
//! Takes the raw `--trigger` argument, splits it into names and processes
//! them one at a time, strictly in the order given:
//!
//! 1. create `data_root/<trigger>`
//! 2. capture the timestamp into a fresh [`TriggerContext`]
//! 3. resolve the trigger into a [`Job`] against a fresh [`Registry`]
//! 4. log the job's label and call [`Job::perform`]
//! 5. drop the context and the registry
//!
//! A failure in any step is recorded for that trigger and the loop moves on.
//! Both per-trigger values live only inside [`Engine::run_trigger`], so there
//! is nothing to undo between iterations.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, error, info};

use crate::{
    errors::{PerformError, ResolutionError, TriggerError},
    model::Registry,
    paths::RunConfiguration,
};

/// `YYYY.MM.DD.HH.MM.SS`: fixed width, sorts lexicographically.
pub const TIMESTAMP_FORMAT: &str = "%Y.%m.%d.%H.%M.%S";

// ─── Collaborators ────────────────────────────────────────────────────────────

/// A resolved, runnable unit of work for one trigger.
pub trait Job {
    fn label(&self) -> &str;

    fn perform(&self, ctx: &TriggerContext, run: &RunConfiguration) -> Result<(), PerformError>;
}

/// Turns a trigger name plus config source into a [`Job`].
///
/// Anything the resolver accumulates while evaluating the config source goes
/// into `registry`, which the engine owns and discards after the trigger.
pub trait JobResolver {
    fn resolve(
        &self,
        trigger: &str,
        config_source: &Path,
        registry: &mut Registry,
    ) -> Result<Box<dyn Job>, ResolutionError>;
}

// ─── Per-trigger context ──────────────────────────────────────────────────────

/// Runtime values for the trigger currently being processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerContext {
    pub trigger_name: String,
    pub timestamp: String,
    pub data_dir: PathBuf,
}

impl TriggerContext {
    /// Context for `trigger` stamped with the current local time.
    pub fn new(trigger: &str, run: &RunConfiguration) -> Self {
        Self::with_timestamp(trigger, run, Local::now().format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn with_timestamp(trigger: &str, run: &RunConfiguration, timestamp: String) -> Self {
        Self {
            trigger_name: trigger.to_string(),
            timestamp,
            data_dir: run.trigger_data_dir(trigger),
        }
    }
}

// ─── Trigger list ─────────────────────────────────────────────────────────────

/// Split the raw `--trigger` argument on `,` and trim each piece.
///
/// Order and duplicates are kept.  Blank pieces are kept too: they resolve
/// like any other name and fail there, so a stray comma is reported instead
/// of silently skipped.
pub fn split_triggers(raw: &str) -> Vec<String> {
    raw.split(',').map(|t| t.trim().to_string()).collect()
}

// ─── Outcomes ─────────────────────────────────────────────────────────────────

/// What happened to one trigger.
#[derive(Debug)]
pub struct TriggerOutcome {
    pub trigger: String,
    /// Label of the resolved job; `None` when resolution never succeeded.
    pub label: Option<String>,
    pub error: Option<TriggerError>,
}

impl TriggerOutcome {
    pub const fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Outcomes for every trigger in input order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<TriggerOutcome>,
}

impl RunReport {
    pub fn failures(&self) -> impl Iterator<Item = &TriggerOutcome> {
        self.outcomes.iter().filter(|o| o.failed())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }
}

// ─── Engine ───────────────────────────────────────────────────────────────────

pub struct Engine<'a, R> {
    run: &'a RunConfiguration,
    resolver: R,
}

impl<'a, R: JobResolver> Engine<'a, R> {
    pub const fn new(run: &'a RunConfiguration, resolver: R) -> Self {
        Self { run, resolver }
    }

    /// Process every trigger in `raw`, in order, and report each outcome.
    pub fn run(&self, raw: &str) -> RunReport {
        let outcomes = split_triggers(raw)
            .into_iter()
            .map(|trigger| self.run_trigger(trigger))
            .collect();
        RunReport { outcomes }
    }

    /// One full iteration.  The registry is created here and dropped on
    /// return, whatever the result.
    fn run_trigger(&self, trigger: String) -> TriggerOutcome {
        let mut registry = Registry::default();
        let mut label = None;

        let result = self.process(&trigger, &mut registry, &mut label);
        if let Err(ref e) = result {
            error!(trigger = %trigger, error = %e, "trigger failed");
        }

        TriggerOutcome {
            trigger,
            label,
            error: result.err(),
        }
    }

    fn process(
        &self,
        trigger: &str,
        registry: &mut Registry,
        label: &mut Option<String>,
    ) -> Result<(), TriggerError> {
        let data_dir = self.run.trigger_data_dir(trigger);
        std::fs::create_dir_all(&data_dir).map_err(|source| TriggerError::DataDir {
            path: data_dir,
            source,
        })?;

        let ctx = TriggerContext::new(trigger, self.run);
        debug!(trigger = %trigger, timestamp = %ctx.timestamp, "trigger started");

        let job = self
            .resolver
            .resolve(trigger, &self.run.config_source, registry)?;
        *label = Some(job.label().to_string());

        info!(trigger = %trigger, "performing {}", job.label());
        job.perform(&ctx, self.run)?;

        info!(trigger = %trigger, "finished {}", job.label());
        Ok(())
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
