//! Job definition file types.
//!
//! The config source is a TOML file holding any number of `[[job]]` tables.
//! Each table describes one trigger: a label for the logs, optional
//! compression / encryption markers that decide the package extension, and
//! the ordered stages `perform` runs.
//!
//! # File format
//!
//! ```toml
//! [[job]]
//! trigger       = "nightly"
//! label         = "Nightly documents"
//! compress_with = "gzip"      # gzip | bzip2 | lzma
//! encrypt_with  = "openssl"   # openssl | gpg
//! sudo          = false       # prefix stage commands with doas
//!
//! [[job.stage]]
//! name    = "Package"
//! command = ["tar", "-czf", "{tmp_dir}/{package}", "/home/alice/docs"]
//!
//! [[job.stage]]
//! name    = "Store"
//! command = ["cp", "{tmp_dir}/{package}", "/mnt/nas/backups/"]
//! ```
//!
//! Stage arguments may use the placeholders listed in [`crate::runner`].

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigFault, ResolutionError, TriggerNameError};

// ─── Top-level ────────────────────────────────────────────────────────────────

/// Root of a config source.  An empty file is valid and defines no jobs.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default, rename = "job")]
    pub jobs: Vec<JobDefinition>,
}

// ─── [[job]] ──────────────────────────────────────────────────────────────────

/// One `[[job]]` table.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct JobDefinition {
    /// Name used on the command line (`--trigger nightly`).
    pub trigger: String,

    /// Human-readable label; falls back to the trigger name when omitted.
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compress_with: Option<Compressor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypt_with: Option<Encryptor>,

    /// Run every stage through `doas`.
    #[serde(default)]
    pub sudo: bool,

    #[serde(default, rename = "stage")]
    pub stages: Vec<StageConfig>,
}

impl JobDefinition {
    /// The label to log, or the trigger name if none was configured.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.trigger)
    }
}

/// One `[[job.stage]]` table: a named command line.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct StageConfig {
    pub name: String,
    pub command: Vec<String>,
}

// ─── Markers ──────────────────────────────────────────────────────────────────

/// Compression marker; only affects the package extension.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Compressor {
    Gzip,
    Bzip2,
    Lzma,
}

impl Compressor {
    /// Spelling used in config files and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Lzma => "lzma",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Gzip => "gz",
            Self::Bzip2 => "bz2",
            Self::Lzma => "lzma",
        }
    }
}

/// Encryption tool.  Closed set: unknown names are rejected by serde and
/// clap before anything runs.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Encryptor {
    #[serde(rename = "openssl")]
    #[value(name = "openssl")]
    OpenSsl,

    #[serde(rename = "gpg")]
    #[value(name = "gpg")]
    Gpg,
}

impl Encryptor {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::OpenSsl => "enc",
            Self::Gpg => "gpg",
        }
    }

    /// Name of the executable this encryptor shells out to; also its
    /// spelling in config files and on the command line.
    pub const fn program(self) -> &'static str {
        match self {
            Self::OpenSsl => "openssl",
            Self::Gpg => "gpg",
        }
    }
}

// ─── Loader ───────────────────────────────────────────────────────────────────

/// Check that `name` can be selected from `--trigger` and used as a
/// directory name under the data and tmp roots.
pub fn validate_trigger(name: &str) -> Result<(), TriggerNameError> {
    if name.trim().is_empty() {
        return Err(TriggerNameError::Blank);
    }
    if name.contains(',') {
        return Err(TriggerNameError::Comma);
    }
    let mut parts = Path::new(name).components();
    match (parts.next(), parts.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(TriggerNameError::NotPlain),
    }
}

/// Parse config text and check every trigger name.  `path` is only used in
/// the error.
pub fn parse_config(text: &str, path: &Path) -> Result<ConfigFile, ResolutionError> {
    let malformed = |source: ConfigFault| ResolutionError::Malformed {
        path: path.to_path_buf(),
        source,
    };

    let config: ConfigFile = toml::from_str(text).map_err(|e| malformed(e.into()))?;
    for job in &config.jobs {
        validate_trigger(&job.trigger).map_err(|reason| {
            malformed(ConfigFault::Trigger {
                trigger: job.trigger.clone(),
                reason,
            })
        })?;
    }
    Ok(config)
}

/// Read and parse the config source at `path`.
///
/// Unlike a missing `backup.toml` elsewhere, a missing config source is an
/// error: there is nothing a trigger could resolve to.
pub fn load_config(path: &Path) -> Result<ConfigFile, ResolutionError> {
    let text = std::fs::read_to_string(path).map_err(|source| ResolutionError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text, path)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
