//! `kin completions`: shell completion scripts for the `kin` binary.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};

/// Arguments for `kin completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to complete `kin` subcommands, flags and relation names for.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `kin` to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be flushed.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let mut out = std::io::stdout().lock();
    write_completions(shell, command, &mut out);
    out.flush()?;
    Ok(())
}

pub fn write_completions(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) {
    generate(shell, command, "kin", out);
}
