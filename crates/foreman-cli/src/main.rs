#![forbid(unsafe_code)]

mod cmd;
mod output;
mod tui;

use std::env;

use clap::{CommandFactory, Parser, Subcommand};
use foreman_core::Workspace;
use foreman_core::config::resolve_config;
use output::{CliError, OutputMode, render_error};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "fm",
    author,
    version,
    about = "foreman: construction CRM for projects and clients",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format; overrides --json, FORMAT and the user config.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Overview",
        about = "Show portfolio statistics",
        long_about = "Show project counts by status, budget totals, average progress, client totals and the most recently created projects.",
        after_help = "EXAMPLES:\n    # Landing page figures\n    fm dashboard\n\n    # Machine-readable\n    fm dashboard --json"
    )]
    Dashboard,

    #[command(
        next_help_heading = "Records",
        about = "List, inspect and edit clients",
        after_help = "EXAMPLES:\n    # Companies only\n    fm clients list --kind company\n\n    # A client with their projects\n    fm clients show 1"
    )]
    Clients {
        #[command(subcommand)]
        command: cmd::clients::ClientsCommand,
    },

    #[command(
        next_help_heading = "Records",
        about = "List, inspect and edit projects",
        after_help = "EXAMPLES:\n    # Projects in flight\n    fm projects list --status active\n\n    # Move a project to its next status\n    fm projects advance 2"
    )]
    Projects {
        #[command(subcommand)]
        command: cmd::projects::ProjectsCommand,
    },

    #[command(
        next_help_heading = "Account",
        about = "Sign in and show the session",
        long_about = "Check credentials against the seeded accounts and print the resulting session and profile.",
        after_help = "EXAMPLES:\n    # Demo administrator\n    fm login -e admin@construction-crm.ru -p admin123"
    )]
    Login(cmd::auth::LoginArgs),

    #[command(
        next_help_heading = "Account",
        about = "Show or edit the signed-in user's profile",
        after_help = "EXAMPLES:\n    # Show the profile card\n    fm profile -e manager@construction-crm.ru -p manager123\n\n    # Update phone and skills\n    fm profile -e manager@construction-crm.ru -p manager123 --phone '+7 (999) 000-00-00' --skills 'BIM, Сметы'"
    )]
    Profile(cmd::auth::ProfileArgs),

    #[command(
        next_help_heading = "Account",
        about = "Show which sections each role may open",
        after_help = "EXAMPLES:\n    # Every role\n    fm access\n\n    # One role\n    fm access foreman"
    )]
    Access(cmd::access::AccessArgs),

    #[command(
        next_help_heading = "Interactive",
        about = "Open the terminal interface",
        long_about = "Full-screen interface with sign-in, dashboard, client and project tables, modal forms and the profile page.",
        after_help = "EXAMPLES:\n    fm tui"
    )]
    Tui,

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Bash\n    fm completions bash > ~/.local/share/bash-completion/completions/fm"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FOREMAN_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "foreman=debug,info"
        } else {
            "foreman=info,warn"
        })
    });

    let format = env::var("FOREMAN_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Log lines would tear the alternate screen; only opt in explicitly.
    if !matches!(cli.command, Commands::Tui) || env::var("FOREMAN_LOG").is_ok() {
        init_tracing();
    }

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let fallback = if cli.json { OutputMode::Json } else { OutputMode::Pretty };
    let config = match resolve_config(&project_root, cli.format.map(OutputMode::as_str), cli.json) {
        Ok(config) => config,
        Err(err) => {
            render_error(fallback, &CliError::new(format!("{err:#}")))?;
            return Err(err);
        }
    };
    let output = OutputMode::from_resolved(&config.resolved_output)?;
    debug!(output = output.as_str(), "output mode");

    let mut ws = Workspace::from_config(&config.project);

    match cli.command {
        Commands::Dashboard => cmd::dashboard::run_dashboard(output, &ws),
        Commands::Clients { ref command } => cmd::clients::run_clients(command, output, &mut ws),
        Commands::Projects { ref command } => cmd::projects::run_projects(command, output, &mut ws),
        Commands::Login(ref args) => cmd::auth::run_login(args, output, &mut ws),
        Commands::Profile(ref args) => cmd::auth::run_profile(args, output, &mut ws),
        Commands::Access(ref args) => cmd::access::run_access(args, output),
        Commands::Tui => tui::run_tui(ws),
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["fm", "dashboard", "--json"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Dashboard));
    }

    #[test]
    fn format_flag_is_global() {
        let cli = Cli::parse_from(["fm", "projects", "list", "--format", "text"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
        assert!(matches!(cli.command, Commands::Projects { .. }));
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["fm", "--format", "yaml", "dashboard"]).is_err());
    }

    #[test]
    fn nested_client_subcommand_parses() {
        let cli = Cli::parse_from(["fm", "clients", "show", "1"]);
        let Commands::Clients { command } = cli.command else {
            panic!("expected clients command");
        };
        assert!(matches!(command, cmd::clients::ClientsCommand::Show(_)));
    }

    #[test]
    fn login_requires_credentials() {
        assert!(Cli::try_parse_from(["fm", "login", "-e", "a@b.ru"]).is_err());
        let cli = Cli::parse_from(["fm", "login", "-e", "a@b.ru", "-p", "secret"]);
        assert!(matches!(cli.command, Commands::Login(_)));
    }

    #[test]
    fn binary_name_is_fm() {
        assert_eq!(Cli::command().get_name(), "fm");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
