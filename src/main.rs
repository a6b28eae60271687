//! `backup`: run named backup jobs, one trigger after another.
//!
//! # Overview
//!
//! Jobs are defined as `[[job]]` tables in a TOML config source.  `backup
//! perform --trigger a,b,c` resolves each trigger against that file and runs
//! the matching job's stages, strictly in the order given.  A failing trigger
//! is reported and the rest still run.
//!
//! # Usage
//!
//! ```text
//! backup perform -t nightly              # run one job
//! backup perform -t nightly,offsite      # run two, in that order
//! backup perform -t nightly -d /srv/data # override the data root
//! backup generate -t nightly             # add a job stanza to the config
//! backup decrypt --encryptor openssl --in pkg.tar.enc --out pkg.tar
//! ```
//!
//! # Module layout
//!
//! | Module                 | Responsibility                                |
//! |------------------------|-----------------------------------------------|
//! | [`cli`]                | Argument types parsed by clap                 |
//! | [`paths`]              | Run paths, overrides, root directory creation |
//! | [`engine`]             | Trigger loop, per-trigger context, outcomes   |
//! | [`config`]             | `[[job]]` file types + TOML loader            |
//! | [`model`]              | Registry accumulated while evaluating config  |
//! | [`resolver`]           | Trigger → job lookup against the config file  |
//! | [`job`]                | Staged job: runs stage commands               |
//! | [`runner`]             | Argument construction helpers                 |
//! | [`ui`]                 | Spinner, captured execution, summaries        |
//! | [`logging`]            | `tracing` subscriber setup                    |
//! | [`errors`]             | Error types per layer                         |
//! | [`commands`]           | One handler per subcommand                    |

mod cli;
mod commands;
mod config;
mod engine;
mod errors;
mod job;
mod logging;
mod model;
mod paths;
mod resolver;
mod runner;
mod ui;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Subcommand};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        // Logging needs the log root, so `perform` sets it up itself.
        Subcommand::Perform(args) => commands::perform::run(args)?,

        Subcommand::Generate(args) => {
            logging::init_logging(None)?;
            commands::generate::run(args)?;
        },

        Subcommand::Decrypt(args) => {
            logging::init_logging(None)?;
            commands::decrypt::run(args)?;
        },
    }

    Ok(())
}
