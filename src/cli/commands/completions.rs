//! `larder completions` command - shell completion scripts

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::Result;
use std::io;

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Print the completion script for a shell to stdout
///
/// ```bash
/// larder completions bash > ~/.local/share/bash-completion/completions/larder
/// larder completions zsh > ~/.zfunc/_larder
/// ```
pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "larder", &mut io::stdout());
    Ok(())
}
