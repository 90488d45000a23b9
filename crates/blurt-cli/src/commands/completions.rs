use std::io::{self, Write};
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::{Cli, CompletionShell};
use crate::error::CliError;

pub fn run_completions(shell: CompletionShell, output: Option<PathBuf>) -> Result<(), CliError> {
    let script = generate_for_shell(shell);
    match output {
        Some(path) => {
            std::fs::write(&path, script)?;
            println!("Wrote {} completions to {}", shell_name(shell), path.display());
        }
        None => {
            io::stdout().write_all(script.as_bytes())?;
        }
    }
    Ok(())
}

pub fn generate_for_shell(shell: CompletionShell) -> String {
    let target: Shell = match shell {
        CompletionShell::Bash => Shell::Bash,
        CompletionShell::Zsh => Shell::Zsh,
        CompletionShell::Fish => Shell::Fish,
    };

    let mut command = Cli::command();
    let mut buffer = Vec::new();
    generate(target, &mut command, "blurt", &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

const fn shell_name(shell: CompletionShell) -> &'static str {
    match shell {
        CompletionShell::Bash => "bash",
        CompletionShell::Zsh => "zsh",
        CompletionShell::Fish => "fish",
    }
}
