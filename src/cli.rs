//! Command-line interface definition.
//!
//! All argument parsing lives here so the rest of the codebase can stay
//! agnostic to `clap`.  The `Cli` struct is parsed once in `main` and the
//! selected subcommand's arguments are handed to its handler by reference.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::{
    config::{Compressor, Encryptor},
    paths::PathOverrides,
};

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name    = "backup",
    about   = "Run named backup jobs, one trigger after another",
    version,
    // Show a compact two-column help layout.
    help_template = "\
{before-help}{name} {version}
{about}

{usage-heading} {usage}

{all-args}{after-help}"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Subcommand,
}

#[derive(clap::Subcommand, Debug, PartialEq)]
pub enum Subcommand {
    /// Perform one or more backup jobs, in the order given.
    ///
    /// Triggers run sequentially, never in parallel.  A trigger that fails to
    /// resolve or whose job fails is reported and the remaining triggers
    /// still run; the exit status is non-zero if any of them failed.
    Perform(PerformArgs),

    /// Add a job stanza for a new trigger to the config file.
    ///
    /// Creates the file (and its parent directories) when missing.  Refuses
    /// to touch a file that already defines the trigger.
    Generate(GenerateArgs),

    /// Decrypt a package produced by an encrypted job.
    Decrypt(DecryptArgs),
}

/// `backup perform`
#[derive(Args, Debug, PartialEq)]
pub struct PerformArgs {
    /// Comma-separated trigger names, e.g. `nightly,offsite`.
    #[arg(short, long, required_unless_present = "print_config")]
    pub trigger: Option<String>,

    /// File holding the `[[job]]` definitions.  Defaults to
    /// `~/Backup/config.toml`.
    #[arg(short, long)]
    pub config_file: Option<PathBuf>,

    /// Root for per-trigger data directories.  Defaults to `~/Backup/data`.
    #[arg(short, long)]
    pub data_path: Option<PathBuf>,

    /// Directory for `backup.log`.  Defaults to `~/Backup/log`.
    #[arg(short, long)]
    pub log_path: Option<PathBuf>,

    /// Scratch space for packaging.  Defaults to `~/Backup/.tmp`.
    #[arg(long)]
    pub tmp_path: Option<PathBuf>,

    /// Print the resolved paths and exit without running anything.
    #[arg(long)]
    pub print_config: bool,
}

impl PerformArgs {
    pub fn overrides(&self) -> PathOverrides {
        PathOverrides {
            config_source: self.config_file.clone(),
            data_root: self.data_path.clone(),
            log_root: self.log_path.clone(),
            tmp_root: self.tmp_path.clone(),
        }
    }
}

/// `backup generate`
#[derive(Args, Debug, PartialEq)]
pub struct GenerateArgs {
    /// Trigger name for the new job.
    #[arg(short, long)]
    pub trigger: String,

    /// Config file to write.  Defaults to `~/Backup/config.toml`.
    #[arg(short, long)]
    pub config_file: Option<PathBuf>,

    /// Label written into the stanza; defaults to the trigger name.
    #[arg(long)]
    pub label: Option<String>,

    #[arg(long, value_enum)]
    pub compress_with: Option<Compressor>,

    #[arg(long, value_enum)]
    pub encrypt_with: Option<Encryptor>,
}

/// `backup decrypt`
#[derive(Args, Debug, PartialEq)]
pub struct DecryptArgs {
    /// Tool the package was encrypted with.
    #[arg(long, value_enum)]
    pub encryptor: Encryptor,

    /// Encrypted input file.
    #[arg(long = "in", value_name = "FILE")]
    pub input: PathBuf,

    /// Decrypted output file.
    #[arg(long = "out", value_name = "FILE")]
    pub output: PathBuf,

    /// Input is base64 encoded (openssl only).
    #[arg(long)]
    pub base64: bool,

    /// Input was encrypted with a salt (openssl only).
    #[arg(long)]
    pub salt: bool,

    /// Read the passphrase from this file instead of prompting.
    #[arg(long, value_name = "FILE")]
    pub pass_file: Option<PathBuf>,
}

// ─── Tests ────────────────────────────────────────────────────────────────────
