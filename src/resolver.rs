//! Resolves trigger names against a TOML config source.
//!
//! The whole file is read and evaluated for every trigger, so edits made
//! between two runs of the same invocation are picked up.  Evaluation
//! registers each `[[job]]` into the [`Registry`] handed in by the engine;
//! the matching job is then picked out of it.

use std::path::Path;

use tracing::debug;

use crate::{
    config::{ConfigFile, load_config},
    engine::{Job, JobResolver},
    errors::ResolutionError,
    job::StagedJob,
    model::Registry,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct TomlResolver;

/// Register every job in `config`, in file order, applying its markers.
pub fn evaluate(config: ConfigFile, registry: &mut Registry) {
    for definition in config.jobs {
        let compress = definition.compress_with;
        let encrypt = definition.encrypt_with;

        registry.register(definition);
        if let Some(c) = compress {
            registry.append_extension(c.extension());
        }
        if let Some(e) = encrypt {
            registry.append_extension(e.extension());
        }
    }
}

impl JobResolver for TomlResolver {
    fn resolve(
        &self,
        trigger: &str,
        config_source: &Path,
        registry: &mut Registry,
    ) -> Result<Box<dyn Job>, ResolutionError> {
        let config = load_config(config_source)?;
        evaluate(config, registry);
        debug!(
            trigger = %trigger,
            registered = registry.all().len(),
            last = ?registry.current().map(|m| m.trigger()),
            last_extension = registry.extension(),
            "config source evaluated"
        );

        let mut matches = registry.matching(trigger);
        let Some(model) = matches.next() else {
            return Err(ResolutionError::NotFound {
                trigger: trigger.to_string(),
                path: config_source.to_path_buf(),
            });
        };
        let extra = matches.count();
        if extra > 0 {
            return Err(ResolutionError::Ambiguous {
                trigger: trigger.to_string(),
                path: config_source.to_path_buf(),
                count: extra + 1,
            });
        }

        Ok(Box::new(StagedJob::new(model.clone())))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::errors::ConfigFault;

    const CONFIG: &str = r#"
[[job]]
trigger       = "nightly"
label         = "Nightly documents"
compress_with = "gzip"
encrypt_with  = "openssl"

[[job.stage]]
name    = "Package"
command = ["true"]

[[job]]
trigger = "plain"

[[job]]
trigger      = "dup"
encrypt_with = "gpg"

[[job]]
trigger = "dup"
"#;

    fn config_file(text: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{text}").unwrap();
        f
    }

    fn resolve_err(trigger: &str, source: &Path) -> ResolutionError {
        match TomlResolver.resolve(trigger, source, &mut Registry::default()) {
            Ok(job) => panic!("'{trigger}' unexpectedly resolved to {}", job.label()),
            Err(e) => e,
        }
    }

    #[test]
    fn resolves_matching_trigger() {
        let f = config_file(CONFIG);
        let mut registry = Registry::default();
        let job = TomlResolver
            .resolve("nightly", f.path(), &mut registry)
            .unwrap();
        assert_eq!(job.label(), "Nightly documents");
    }

    #[test]
    fn evaluation_accumulates_every_job() {
        let f = config_file(CONFIG);
        let mut registry = Registry::default();
        TomlResolver.resolve("plain", f.path(), &mut registry).unwrap();

        assert_eq!(registry.all().len(), 4);
        assert_eq!(registry.current().unwrap().trigger(), "dup");
        let exts: Vec<_> = registry.all().iter().map(|m| m.extension.as_str()).collect();
        assert_eq!(exts, ["tar.gz.enc", "tar", "tar.gpg", "tar"]);
    }

    #[test]
    fn unknown_trigger_is_not_found() {
        let f = config_file(CONFIG);
        let err = resolve_err("missing", f.path());
        assert!(matches!(err, ResolutionError::NotFound { ref trigger, .. } if trigger == "missing"));
    }

    #[test]
    fn blank_trigger_is_not_found() {
        let f = config_file(CONFIG);
        let err = resolve_err("", f.path());
        assert!(matches!(err, ResolutionError::NotFound { .. }));
    }

    #[test]
    fn duplicate_trigger_is_ambiguous() {
        let f = config_file(CONFIG);
        let err = resolve_err("dup", f.path());
        assert!(matches!(err, ResolutionError::Ambiguous { count: 2, .. }));
    }

    #[test]
    fn malformed_source_is_reported() {
        let f = config_file("[[job]]\ntrigger = 42\n");
        let err = resolve_err("nightly", f.path());
        assert!(matches!(err, ResolutionError::Malformed { .. }));
    }

    #[test]
    fn unusable_trigger_in_source_is_malformed() {
        for (bad, ask) in [("", ""), ("a,b", "a"), ("a,b", "a,b")] {
            let f = config_file(&format!("{CONFIG}\n[[job]]\ntrigger = \"{bad}\"\n"));
            let err = resolve_err(ask, f.path());
            assert!(
                matches!(
                    err,
                    ResolutionError::Malformed { source: ConfigFault::Trigger { ref trigger, .. }, .. }
                        if trigger == bad
                ),
                "{bad:?}: {err:?}"
            );
        }
        // Valid names in the same file are unusable too until it is fixed.
        let f = config_file(&format!("{CONFIG}\n[[job]]\ntrigger = \"\"\n"));
        assert!(matches!(resolve_err("nightly", f.path()), ResolutionError::Malformed { .. }));
    }

    #[test]
    fn missing_source_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_err("nightly", &dir.path().join("nope.toml"));
        assert!(matches!(err, ResolutionError::Unreadable { .. }));
    }
}
