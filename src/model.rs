//! Accumulation state written while a config source is evaluated.
//!
//! Evaluating the `[[job]]` tables registers each one here in turn: the job
//! is appended to [`Registry::all`], becomes [`Registry::current`], and the
//! working extension restarts at [`DEFAULT_EXTENSION`] before the job's
//! compression / encryption markers append to it.
//!
//! A `Registry` belongs to exactly one resolution.  The engine builds a fresh
//! one per trigger and drops it afterwards, so nothing registered for one
//! trigger can be observed by the next.

use crate::config::JobDefinition;

/// Extension every package starts with before markers are applied.
pub const DEFAULT_EXTENSION: &str = "tar";

/// A registered job together with its final package extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub definition: JobDefinition,
    pub extension: String,
}

impl Model {
    pub fn trigger(&self) -> &str {
        &self.definition.trigger
    }

    /// Package file name: `<timestamp>.<trigger>.<extension>`.
    pub fn package_name(&self, timestamp: &str) -> String {
        format!("{timestamp}.{}.{}", self.definition.trigger, self.extension)
    }
}

/// Per-resolution accumulation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    all: Vec<Model>,
    current: Option<usize>,
    extension: String,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            all: Vec::new(),
            current: None,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl Registry {
    /// Register `definition` and make it current.
    ///
    /// The previously current job keeps the extension it had accumulated.
    pub fn register(&mut self, definition: JobDefinition) {
        self.seal_current();
        self.extension = DEFAULT_EXTENSION.to_string();
        self.all.push(Model {
            definition,
            extension: self.extension.clone(),
        });
        self.current = Some(self.all.len() - 1);
    }

    /// Append `.suffix` to the working extension of the current job.
    pub fn append_extension(&mut self, suffix: &str) {
        self.extension.push('.');
        self.extension.push_str(suffix);
        self.seal_current();
    }

    fn seal_current(&mut self) {
        if let Some(model) = self.current.and_then(|i| self.all.get_mut(i)) {
            model.extension.clone_from(&self.extension);
        }
    }

    pub fn all(&self) -> &[Model] {
        &self.all
    }

    pub fn current(&self) -> Option<&Model> {
        self.current.and_then(|i| self.all.get(i))
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Every registered job whose trigger is exactly `trigger`.
    pub fn matching<'a>(&'a self, trigger: &'a str) -> impl Iterator<Item = &'a Model> + 'a {
        self.all.iter().filter(move |m| m.trigger() == trigger)
    }

    /// True when nothing has been registered since construction.
    #[cfg(test)]
    pub fn is_pristine(&self) -> bool {
        *self == Self::default()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn def(trigger: &str) -> JobDefinition {
        JobDefinition {
            trigger: trigger.into(),
            label: None,
            compress_with: None,
            encrypt_with: None,
            sudo: false,
            stages: vec![],
        }
    }

    #[test]
    fn default_is_empty_with_tar_extension() {
        let r = Registry::default();
        assert!(r.all().is_empty());
        assert!(r.current().is_none());
        assert_eq!(r.extension(), "tar");
        assert!(r.is_pristine());
    }

    #[test]
    fn register_sets_current() {
        let mut r = Registry::default();
        r.register(def("a"));
        r.register(def("b"));
        assert_eq!(r.all().len(), 2);
        assert_eq!(r.current().unwrap().trigger(), "b");
        assert!(!r.is_pristine());
    }

    #[test]
    fn extension_accumulates_on_current_only() {
        let mut r = Registry::default();
        r.register(def("a"));
        r.append_extension("gz");
        r.append_extension("enc");
        r.register(def("b"));

        assert_eq!(r.all()[0].extension, "tar.gz.enc");
        assert_eq!(r.all()[1].extension, "tar");
        assert_eq!(r.extension(), "tar");
    }

    #[test]
    fn matching_finds_duplicates() {
        let mut r = Registry::default();
        r.register(def("a"));
        r.register(def("b"));
        r.register(def("a"));
        assert_eq!(r.matching("a").count(), 2);
        assert_eq!(r.matching("b").count(), 1);
        assert_eq!(r.matching("c").count(), 0);
    }

    #[test]
    fn package_name_is_timestamp_trigger_extension() {
        let mut r = Registry::default();
        r.register(def("nightly"));
        r.append_extension("gpg");
        let m = r.current().unwrap();
        assert_eq!(
            m.package_name("2024.01.02.03.04.05"),
            "2024.01.02.03.04.05.nightly.tar.gpg"
        );
    }
}
