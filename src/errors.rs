//! Error types for each layer of a run.
//!
//! | Error                  | Scope       | Effect                               |
//! |------------------------|-------------|--------------------------------------|
//! | [`ConfigurationError`] | whole run   | fatal, nothing is triggered          |
//! | [`ResolutionError`]    | one trigger | trigger skipped, loop continues      |
//! | [`PerformError`]       | one trigger | trigger failed, loop continues       |
//! | [`TriggerError`]       | one trigger | wraps the above for the run report   |

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure while applying path overrides or creating the root directories.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("cannot create {kind} directory {}: {source}", path.display())]
    CreateDir {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure turning a trigger name into a runnable job.
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("cannot read config source {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config source {} is malformed: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: ConfigFault,
    },

    #[error("no job with trigger '{trigger}' in {}", path.display())]
    NotFound { trigger: String, path: PathBuf },

    #[error("trigger '{trigger}' is defined {count} times in {}", path.display())]
    Ambiguous {
        trigger: String,
        path: PathBuf,
        count: usize,
    },
}

/// What is wrong with a config source that parsed as a file.
#[derive(Error, Debug)]
pub enum ConfigFault {
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error("trigger '{trigger}' {reason}")]
    Trigger {
        trigger: String,
        reason: TriggerNameError,
    },
}

/// Why a name cannot be used as a trigger.
///
/// A trigger names a directory under the data and tmp roots, so it has to
/// be exactly one plain path component.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerNameError {
    #[error("must not be blank")]
    Blank,

    #[error("must not contain ','")]
    Comma,

    #[error("must be a single plain path component")]
    NotPlain,
}

/// Failure inside a job's own `perform`.
#[derive(Error, Debug)]
pub enum PerformError {
    #[error("job has no stages to run")]
    NoStages,

    #[error("cannot prepare {}: {source}", path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("trigger '{trigger}' cannot name a working directory: {reason}")]
    UnsafeTrigger {
        trigger: String,
        reason: TriggerNameError,
    },

    #[error("stage '{stage}' failed: {reason}")]
    Stage { stage: String, reason: String },

    #[error("cannot record run in {}: {reason}", path.display())]
    Record { path: PathBuf, reason: String },
}

/// Everything that can go wrong while processing a single trigger.
#[derive(Error, Debug)]
pub enum TriggerError {
    #[error("cannot create trigger data directory {}: {source}", path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Perform(#[from] PerformError),
}
