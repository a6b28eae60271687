//! The job produced by the TOML resolver: an ordered list of stage commands.
//!
//! `perform` works in `tmp_root/<trigger>`, runs each stage behind a spinner
//! and stops at the first failure.  After a successful run it records
//! `last_run.toml` in the trigger's data directory and removes the working
//! directory; after a failure the working directory is kept for inspection.
//!
//! A trigger that is not a single plain path component is refused before
//! anything is created, and only a directory strictly inside the tmp root is
//! ever removed.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    config::validate_trigger,
    engine::{Job, TriggerContext},
    errors::PerformError,
    model::Model,
    paths::RunConfiguration,
    runner, ui,
};

/// File written to the trigger data directory after a successful run.
pub const LAST_RUN_FILE: &str = "last_run.toml";

/// Contents of [`LAST_RUN_FILE`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LastRun {
    pub trigger: String,
    pub timestamp: String,
    pub package: String,
    pub stages: Vec<String>,
}

pub struct StagedJob {
    model: Model,
}

impl StagedJob {
    pub const fn new(model: Model) -> Self {
        Self { model }
    }
}

impl Job for StagedJob {
    fn label(&self) -> &str {
        self.model.definition.display_label()
    }

    fn perform(&self, ctx: &TriggerContext, run: &RunConfiguration) -> Result<(), PerformError> {
        let def = &self.model.definition;
        if def.stages.is_empty() {
            return Err(PerformError::NoStages);
        }

        validate_trigger(&ctx.trigger_name).map_err(|reason| PerformError::UnsafeTrigger {
            trigger: ctx.trigger_name.clone(),
            reason,
        })?;

        let workdir = run.trigger_tmp_dir(&ctx.trigger_name);
        std::fs::create_dir_all(&workdir).map_err(|source| PerformError::Workspace {
            path: workdir.clone(),
            source,
        })?;

        let package = self.model.package_name(&ctx.timestamp);
        let vars = runner::placeholders(ctx, run, &package);

        ui::print_job_heading(self.label(), &ctx.trigger_name);
        for stage in &def.stages {
            let args = runner::stage_args(stage, def.sudo, &vars);
            debug!(stage = %stage.name, command = ?args, "running stage");

            let outcome = ui::run_stage(&stage.name, &args);
            outcome.print();
            if outcome.failed() {
                warn!(workdir = %workdir.display(), "keeping working directory after failure");
                return Err(PerformError::Stage {
                    stage: stage.name.clone(),
                    reason: outcome.error.unwrap_or_default(),
                });
            }
        }

        write_last_run(&ctx.data_dir, &LastRun {
            trigger: ctx.trigger_name.clone(),
            timestamp: ctx.timestamp.clone(),
            package,
            stages: def.stages.iter().map(|s| s.name.clone()).collect(),
        })?;

        remove_workdir(run, &workdir);
        Ok(())
    }
}

fn remove_workdir(run: &RunConfiguration, workdir: &Path) {
    if workdir == run.tmp_root || !workdir.starts_with(&run.tmp_root) {
        warn!(
            workdir = %workdir.display(),
            tmp_root = %run.tmp_root.display(),
            "not removing a directory outside the tmp root"
        );
        return;
    }
    if let Err(e) = std::fs::remove_dir_all(workdir) {
        warn!(workdir = %workdir.display(), error = %e, "could not remove working directory");
    }
}

fn write_last_run(data_dir: &Path, record: &LastRun) -> Result<(), PerformError> {
    let path = data_dir.join(LAST_RUN_FILE);
    let text = toml::to_string(record).map_err(|e| PerformError::Record {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    std::fs::write(&path, text).map_err(|e| PerformError::Record {
        path,
        reason: e.to_string(),
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────────
