//! `backup decrypt`: decrypt a package with the tool it was encrypted with.
//!
//! The tool runs attached to the terminal so it can ask for the passphrase
//! unless `--pass-file` is given.

use anyhow::{Context, Result, bail};
use console::style;
use tracing::info;

use crate::{cli::DecryptArgs, runner::decrypt_args, ui::run_interactive};

pub fn run(args: &DecryptArgs) -> Result<()> {
    if !args.input.is_file() {
        bail!("input file {} does not exist", args.input.display());
    }

    let cmd = decrypt_args(args);
    info!(tool = args.encryptor.program(), input = %args.input.display(), "decrypting");
    run_interactive(&cmd).with_context(|| format!("decrypting {}", args.input.display()))?;

    println!(
        "  {}  decrypted {} → {}",
        style("✓").green().bold(),
        args.input.display(),
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Encryptor;

    #[test]
    fn missing_input_fails_before_spawning() {
        let dir = tempfile::tempdir().unwrap();
        let args = DecryptArgs {
            encryptor: Encryptor::OpenSsl,
            input: dir.path().join("nope.enc"),
            output: dir.path().join("nope"),
            base64: false,
            salt: false,
            pass_file: None,
        };
        let err = run(&args).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        assert!(!args.output.exists());
    }
}
