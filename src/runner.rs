//! Command argument construction helpers.
//!
//! This module *builds* argument lists; it never executes anything.  Process
//! execution lives in [`crate::ui`] so the spinner can own the terminal while
//! commands run.  Every function here is pure and unit-testable without
//! spawning child processes.
//!
//! # Placeholders
//!
//! Stage command arguments may reference the current trigger:
//!
//! | Placeholder   | Value                                  |
//! |---------------|----------------------------------------|
//! | `{trigger}`   | trigger name                           |
//! | `{timestamp}` | `YYYY.MM.DD.HH.MM.SS` of this run      |
//! | `{data_dir}`  | `data_root/<trigger>`                  |
//! | `{tmp_dir}`   | `tmp_root/<trigger>`                   |
//! | `{log_dir}`   | `log_root`                             |
//! | `{package}`   | `<timestamp>.<trigger>.<extension>`    |

use crate::{
    cli::DecryptArgs,
    config::{Encryptor, StageConfig},
    engine::TriggerContext,
    paths::RunConfiguration,
};

// ─── Privilege prefix ─────────────────────────────────────────────────────────

/// Returns `["doas"]` when `sudo` is set, otherwise an empty `Vec`.
pub fn prefix(sudo: bool) -> Vec<String> {
    if sudo { vec!["doas".into()] } else { vec![] }
}

// ─── Placeholders ─────────────────────────────────────────────────────────────

/// Placeholder name/value pairs for one trigger run.
pub fn placeholders(
    ctx: &TriggerContext,
    run: &RunConfiguration,
    package: &str,
) -> Vec<(&'static str, String)> {
    vec![
        ("trigger", ctx.trigger_name.clone()),
        ("timestamp", ctx.timestamp.clone()),
        ("data_dir", ctx.data_dir.display().to_string()),
        (
            "tmp_dir",
            run.trigger_tmp_dir(&ctx.trigger_name).display().to_string(),
        ),
        ("log_dir", run.log_root.display().to_string()),
        ("package", package.to_string()),
    ]
}

/// Replace every `{name}` in `arg`.  Unknown names are left untouched.
pub fn expand(arg: &str, vars: &[(&str, String)]) -> String {
    vars.iter().fold(arg.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{name}}}"), value)
    })
}

// ─── Stage commands ───────────────────────────────────────────────────────────

/// Full argument vector for one stage: `[doas] <command…>` with
/// placeholders expanded.
pub fn stage_args(stage: &StageConfig, sudo: bool, vars: &[(&str, String)]) -> Vec<String> {
    let mut cmd = prefix(sudo);
    cmd.extend(stage.command.iter().map(|a| expand(a, vars)));
    cmd
}

// ─── Decrypt ──────────────────────────────────────────────────────────────────

/// Arguments for decrypting a package with the selected tool.
///
/// ```text
/// openssl aes-256-cbc -d [-base64] [-salt] [-pass file:<F>] -in <IN> -out <OUT>
/// gpg [--batch --pinentry-mode loopback --passphrase-file <F>] -o <OUT> -d <IN>
/// ```
pub fn decrypt_args(args: &DecryptArgs) -> Vec<String> {
    let input = args.input.display().to_string();
    let output = args.output.display().to_string();

    let mut cmd = vec![args.encryptor.program().to_string()];
    match args.encryptor {
        Encryptor::OpenSsl => {
            cmd.extend(["aes-256-cbc".into(), "-d".into()]);
            if args.base64 {
                cmd.push("-base64".into());
            }
            if args.salt {
                cmd.push("-salt".into());
            }
            if let Some(ref f) = args.pass_file {
                cmd.extend(["-pass".into(), format!("file:{}", f.display())]);
            }
            cmd.extend(["-in".into(), input, "-out".into(), output]);
        },
        Encryptor::Gpg => {
            if let Some(ref f) = args.pass_file {
                cmd.extend([
                    "--batch".into(),
                    "--pinentry-mode".into(),
                    "loopback".into(),
                    "--passphrase-file".into(),
                    f.display().to_string(),
                ]);
            }
            cmd.extend(["-o".into(), output, "-d".into(), input]);
        },
    }
    cmd
}

// ─── Tests ────────────────────────────────────────────────────────────────────
