//! `backup generate`: add a job stanza for a new trigger.
//!
//! The stanza is a starting point: a label, the selected markers and a
//! single `Package` stage pointing at a placeholder source path.  An existing
//! config file is appended to, never rewritten, and is left untouched when it
//! is invalid or already defines the trigger.

use std::path::Path;

use anyhow::{Context, Result, bail};
use console::style;
use tracing::info;

use crate::{
    cli::GenerateArgs,
    config::{parse_config, validate_trigger},
    paths::RunConfiguration,
};

const HEADER: &str = "\
# Backup job definitions.
#
# Run a job with:   backup perform --trigger <name>
# Placeholders:     {trigger} {timestamp} {data_dir} {tmp_dir} {log_dir} {package}
";

pub fn run(args: &GenerateArgs) -> Result<()> {
    let path = args
        .config_file
        .clone()
        .unwrap_or_else(|| RunConfiguration::default().config_source);

    let trigger = generate(&path, args)?;

    info!(trigger = %trigger, config = %path.display(), "job stanza written");
    println!(
        "  {}  added trigger '{}' to {}",
        style("✓").green().bold(),
        trigger,
        path.display()
    );
    Ok(())
}

/// Append the stanza for `args.trigger` to `path`, creating it if needed.
///
/// Returns the trigger name as written, with surrounding whitespace removed.
pub fn generate<'a>(path: &Path, args: &'a GenerateArgs) -> Result<&'a str> {
    let trigger = args.trigger.trim();
    validate_trigger(trigger).with_context(|| format!("invalid trigger name '{trigger}'"))?;

    let mut content = if path.exists() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let existing = parse_config(&text, path)?;
        if existing.jobs.iter().any(|j| j.trigger == trigger) {
            bail!(
                "trigger '{trigger}' already exists in {}; refusing to add it again",
                path.display()
            );
        }
        text
    } else {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("mkdir -p {}", parent.display()))?;
        }
        HEADER.to_string()
    };

    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push('\n');
    content.push_str(&stanza(trigger, args));

    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(trigger)
}

fn quoted(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}

fn stanza(trigger: &str, args: &GenerateArgs) -> String {
    let label = args.label.as_deref().unwrap_or(trigger);

    let mut out = String::from("[[job]]\n");
    out.push_str(&format!("trigger = {}\n", quoted(trigger)));
    out.push_str(&format!("label   = {}\n", quoted(label)));
    if let Some(c) = args.compress_with {
        out.push_str(&format!("compress_with = {}\n", quoted(c.name())));
    }
    if let Some(e) = args.encrypt_with {
        out.push_str(&format!("encrypt_with  = {}\n", quoted(e.program())));
    }
    out.push_str("sudo    = false\n");
    out.push_str(
        "\n[[job.stage]]\n\
         name    = \"Package\"\n\
         command = [\"tar\", \"-cf\", \"{tmp_dir}/{package}\", \"/path/to/back/up\"]\n",
    );
    out
}

// ─── Tests ────────────────────────────────────────────────────────────────────
