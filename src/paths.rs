//! Path configuration applied once, before any trigger runs.
//!
//! Every run works against four well-known locations.  Each one has a
//! built-in default under `~/Backup` and can be overridden from the command
//! line:
//!
//! | Field           | Default               | Flag            |
//! |-----------------|-----------------------|-----------------|
//! | `config_source` | `~/Backup/config.toml`| `--config-file` |
//! | `data_root`     | `~/Backup/data`       | `--data-path`   |
//! | `log_root`      | `~/Backup/log`        | `--log-path`    |
//! | `tmp_root`      | `~/Backup/.tmp`       | `--tmp-path`    |

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::errors::ConfigurationError;

// ─── Types ────────────────────────────────────────────────────────────────────

/// Process-wide paths, resolved once per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunConfiguration {
    /// File holding the `[[job]]` definitions.
    pub config_source: PathBuf,
    /// Root under which each trigger gets its own data directory.
    pub data_root: PathBuf,
    /// Where `backup.log` is written.
    pub log_root: PathBuf,
    /// Scratch space; jobs work in `tmp_root/<trigger>`.
    pub tmp_root: PathBuf,
}

impl RunConfiguration {
    /// Defaults rooted at `root`.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            config_source: root.join("config.toml"),
            data_root: root.join("data"),
            log_root: root.join("log"),
            tmp_root: root.join(".tmp"),
        }
    }

    /// Per-trigger data directory: `data_root / trigger`.
    pub fn trigger_data_dir(&self, trigger: &str) -> PathBuf {
        self.data_root.join(trigger)
    }

    /// Per-trigger scratch directory: `tmp_root / trigger`.
    pub fn trigger_tmp_dir(&self, trigger: &str) -> PathBuf {
        self.tmp_root.join(trigger)
    }
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self::rooted_at(&default_root())
    }
}

/// Optional replacements for the built-in paths.
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub config_source: Option<PathBuf>,
    pub data_root: Option<PathBuf>,
    pub log_root: Option<PathBuf>,
    pub tmp_root: Option<PathBuf>,
}

/// `~/Backup`, or `./Backup` when no home directory can be determined.
pub fn default_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Backup")
}

// ─── Configurator ─────────────────────────────────────────────────────────────

/// Apply `overrides` on top of `defaults` without touching the filesystem.
///
/// Empty overrides are treated as absent.
pub fn apply_overrides(defaults: RunConfiguration, overrides: PathOverrides) -> RunConfiguration {
    fn pick(default: PathBuf, over: Option<PathBuf>) -> PathBuf {
        over.filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(default)
    }

    RunConfiguration {
        config_source: pick(defaults.config_source, overrides.config_source),
        data_root: pick(defaults.data_root, overrides.data_root),
        log_root: pick(defaults.log_root, overrides.log_root),
        tmp_root: pick(defaults.tmp_root, overrides.tmp_root),
    }
}

/// Resolve the run's paths and make sure the data, log and tmp roots exist.
///
/// Creation is `mkdir -p`: already-existing directories are fine.  Any other
/// filesystem error is fatal for the whole invocation.
pub fn configure(
    defaults: RunConfiguration,
    overrides: PathOverrides,
) -> Result<RunConfiguration, ConfigurationError> {
    let run = apply_overrides(defaults, overrides);

    for (kind, dir) in [
        ("data", &run.data_root),
        ("log", &run.log_root),
        ("tmp", &run.tmp_root),
    ] {
        std::fs::create_dir_all(dir).map_err(|source| ConfigurationError::CreateDir {
            kind,
            path: dir.clone(),
            source,
        })?;
    }

    tracing::debug!(?run, "paths configured");
    Ok(run)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides_all(root: &Path) -> PathOverrides {
        PathOverrides {
            config_source: Some(root.join("jobs.toml")),
            data_root: Some(root.join("d")),
            log_root: Some(root.join("l")),
            tmp_root: Some(root.join("t")),
        }
    }

    #[test]
    fn defaults_live_under_root() {
        let run = RunConfiguration::rooted_at(Path::new("/srv/Backup"));
        assert_eq!(run.config_source, Path::new("/srv/Backup/config.toml"));
        assert_eq!(run.data_root, Path::new("/srv/Backup/data"));
        assert_eq!(run.log_root, Path::new("/srv/Backup/log"));
        assert_eq!(run.tmp_root, Path::new("/srv/Backup/.tmp"));
    }

    #[test]
    fn default_root_ends_with_backup() {
        assert!(default_root().ends_with("Backup"));
    }

    #[test]
    fn no_overrides_keeps_defaults() {
        let defaults = RunConfiguration::rooted_at(Path::new("/srv/Backup"));
        let run = apply_overrides(defaults.clone(), PathOverrides::default());
        assert_eq!(run, defaults);
    }

    #[test]
    fn single_override_leaves_other_fields_alone() {
        let defaults = RunConfiguration::rooted_at(Path::new("/srv/Backup"));
        let run = apply_overrides(defaults.clone(), PathOverrides {
            data_root: Some("/tmp/x".into()),
            ..PathOverrides::default()
        });
        assert_eq!(run.data_root, Path::new("/tmp/x"));
        assert_eq!(run.config_source, defaults.config_source);
        assert_eq!(run.log_root, defaults.log_root);
        assert_eq!(run.tmp_root, defaults.tmp_root);
    }

    #[test]
    fn empty_override_is_ignored() {
        let defaults = RunConfiguration::rooted_at(Path::new("/srv/Backup"));
        let run = apply_overrides(defaults.clone(), PathOverrides {
            log_root: Some(PathBuf::new()),
            ..PathOverrides::default()
        });
        assert_eq!(run.log_root, defaults.log_root);
    }

    #[test]
    fn configure_creates_nested_roots() {
        let dir = tempfile::tempdir().unwrap();
        let defaults = RunConfiguration::rooted_at(&dir.path().join("deep").join("Backup"));
        let run = configure(defaults, PathOverrides::default()).unwrap();
        assert!(run.data_root.is_dir());
        assert!(run.log_root.is_dir());
        assert!(run.tmp_root.is_dir());
        // The config source is only read, never created.
        assert!(!run.config_source.exists());
    }

    #[test]
    fn configure_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let defaults = RunConfiguration::rooted_at(dir.path());
        let first = configure(defaults.clone(), overrides_all(dir.path())).unwrap();
        let second = configure(defaults, overrides_all(dir.path())).unwrap();
        assert_eq!(first, second);
        assert!(second.data_root.ends_with("d"));
    }

    #[test]
    fn configure_fails_when_root_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = configure(RunConfiguration::rooted_at(dir.path()), PathOverrides {
            data_root: Some(blocker.join("data")),
            ..PathOverrides::default()
        })
        .unwrap_err();

        let ConfigurationError::CreateDir { kind, path, .. } = err;
        assert_eq!(kind, "data");
        assert_eq!(path, blocker.join("data"));
    }

    #[test]
    fn trigger_dirs_follow_roots() {
        let run = RunConfiguration::rooted_at(Path::new("/b"));
        assert_eq!(run.trigger_data_dir("nightly"), Path::new("/b/data/nightly"));
        assert_eq!(run.trigger_tmp_dir("nightly"), Path::new("/b/.tmp/nightly"));
    }
}
