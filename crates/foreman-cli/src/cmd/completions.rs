use std::io::Write;

use clap::Args;
use clap_complete::{Shell, generate};

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate for: bash, zsh, fish, elvish or powershell.
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run_completions(shell: Shell, command: &mut clap::Command) -> anyhow::Result<()> {
    write_completions(shell, command, &mut std::io::stdout().lock());
    Ok(())
}

/// Completion script for the `fm` binary, named after the command itself.
fn write_completions(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) {
    let bin = command.get_name().to_string();
    generate(shell, command, bin, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_registers_binary_name() {
        let mut command = clap::Command::new("fm").subcommand(clap::Command::new("dashboard"));
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut command, &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("complete -F _fm"));
        assert!(script.contains("dashboard"));
    }
}
