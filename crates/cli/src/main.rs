//! git-id command-line tool.
//!
//! Manages named git identities stored in the current repository's config
//! and activates them in the calling shell. Runs in one of three ways:
//!
//! - as a plain command (`git-id add ...`, `git-id list`, ...);
//! - through the shell function printed by `git-id shell-init`, which routes
//!   `use` and `reset` to the hidden `hook` subcommand and evaluates its output;
//! - as `GIT_SSH`, when git passes it an ssh endpoint (see
//!   [`gitid_core::transport`]).

mod hook;
mod style;

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{ExitCode, ExitStatus};

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use gitid_core::config::GitIdConfig;
use gitid_core::repo::require_current_repository;
use gitid_core::session::{ExecutionMode, Session, SessionActivator, Shell};
use gitid_core::transport::{is_transport_invocation, Transport};
use gitid_core::{GitConfigStore, IdentityStore};

/// Environment variable overriding the log filter.
const LOG_ENV: &str = "GIT_ID_LOG";

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Switch between git identities per shell session.
#[derive(Parser, Debug)]
#[command(
    name = "git-id",
    version,
    about = "Manage per-repository git identities and switch between them per shell",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an identity, or update it if the name already exists.
    Add {
        /// Identity name, e.g. `work`.
        name: String,
        /// Author / committer name.
        full_name: String,
        /// Author / committer email.
        email: String,
        /// Path to the private SSH key.
        ssh_key_path: PathBuf,
    },

    /// Delete an identity.
    #[command(visible_alias = "remove")]
    Delete {
        /// Identity name.
        name: String,
    },

    /// List stored identities.
    List {
        /// Show every field in a table.
        #[arg(short, long)]
        long: bool,

        /// Print the names as a JSON array.
        #[arg(long, conflicts_with = "long")]
        json: bool,
    },

    /// Show the fields of an identity.
    Show {
        /// Identity name.
        name: String,

        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the identity active in this shell.
    Current,

    /// Activate an identity in this shell (requires shell integration).
    Use {
        /// Identity name.
        name: String,
    },

    /// Deactivate the current identity (requires shell integration).
    Reset,

    /// Print the shell function that enables `use` and `reset`.
    ShellInit {
        /// bash, zsh or fish.
        shell: Shell,
    },

    /// Run ssh with the active identity's key.
    Ssh {
        /// Arguments passed to ssh after `-i <key>`.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<OsString>,
    },

    /// In-process entry point used by the shell function.
    #[command(hide = true)]
    Hook {
        /// Shell whose syntax the emitted script uses.
        #[arg(long, default_value = "bash")]
        shell: Shell,

        #[command(subcommand)]
        action: hook::HookAction,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = GitIdConfig::load_and_validate();
    init_tracing(
        config
            .as_ref()
            .map(|c| c.general.log_level.as_str())
            .unwrap_or("warn"),
    );
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // git runs us as GIT_SSH with raw ssh arguments; bypass clap entirely.
    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    let lossy: Vec<String> = args
        .iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    if is_transport_invocation(&lossy) {
        return run_transport(&config, args).await;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return usage_error(e),
    };

    match run(cli, &config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr: stdout carries hook scripts and the ssh stream.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Print clap's message. Help and every parse error exit 1.
fn usage_error(e: clap::Error) -> ExitCode {
    let _ = e.print();
    match e.kind() {
        ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

async fn run(cli: Cli, config: &GitIdConfig) -> Result<ExitCode> {
    match cli.command {
        Commands::ShellInit { shell } => cmd_shell_init(shell),
        Commands::Ssh { args } => Ok(run_transport(config, args).await),
        Commands::Hook { shell, action } => Ok(hook::run(action, shell, config)),
        _ => {
            // Everything else works on the current repository's identities.
            let identities = open_identities(config)?;

            match cli.command {
                Commands::Add {
                    name,
                    full_name,
                    email,
                    ssh_key_path,
                } => cmd_add(&identities, &name, &full_name, &email, &ssh_key_path),
                Commands::Delete { name } => cmd_delete(&identities, &name),
                Commands::List { long, json } => cmd_list(&identities, long, json),
                Commands::Show { name, json } => cmd_show(&identities, &name, json),
                Commands::Current => cmd_current(&identities),
                Commands::Use { name } => cmd_use(&identities, &name),
                Commands::Reset => cmd_reset(&identities),
                _ => unreachable!(),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_identities(config: &GitIdConfig) -> Result<IdentityStore<GitConfigStore>> {
    let store = require_current_repository()?;
    Ok(IdentityStore::new(store).with_strict(config.general.strict))
}

/// Path exported as `GIT_SSH` and embedded in the shell function.
fn self_exe() -> PathBuf {
    std::env::current_exe().unwrap_or_else(|_| PathBuf::from("git-id"))
}

async fn run_transport(config: &GitIdConfig, args: Vec<OsString>) -> ExitCode {
    let transport = Transport::new(config.transport.ssh_program.as_str());
    match transport.connect(&Session::from_env(), args).await {
        Ok(status) => exit_code_from_status(status),
        Err(e) => {
            eprintln!("git-id: {}", e);
            ExitCode::from(255)
        }
    }
}

/// Mirror the child's exit code; 255 (ssh's own error code) when it has none.
fn exit_code_from_status(status: ExitStatus) -> ExitCode {
    status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .map(ExitCode::from)
        .unwrap_or(ExitCode::from(255))
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_add(
    identities: &IdentityStore<GitConfigStore>,
    name: &str,
    full_name: &str,
    email: &str,
    ssh_key_path: &std::path::Path,
) -> Result<ExitCode> {
    let outcome = identities
        .add_or_update(name, full_name, email, ssh_key_path)
        .with_context(|| format!("failed to add identity '{}'", name))?;
    println!("{}", style::success(&format!("Identity '{}' {}", name, outcome)));
    Ok(ExitCode::SUCCESS)
}

fn cmd_delete(identities: &IdentityStore<GitConfigStore>, name: &str) -> Result<ExitCode> {
    identities
        .delete(name)
        .with_context(|| format!("failed to delete identity '{}'", name))?;
    println!("{}", style::success(&format!("Identity '{}' deleted", name)));
    Ok(ExitCode::SUCCESS)
}

fn cmd_list(identities: &IdentityStore<GitConfigStore>, long: bool, json: bool) -> Result<ExitCode> {
    let names = identities.list().context("failed to list identities")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(ExitCode::SUCCESS);
    }

    if !long {
        for name in &names {
            println!("{}", name);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if names.is_empty() {
        println!("No identities stored in this repository.");
        return Ok(ExitCode::SUCCESS);
    }

    let session = Session::from_env();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "Name", "Full name", "Email", "SSH key"]);

    for name in &names {
        let identity = identities
            .show(name)
            .with_context(|| format!("failed to read identity '{}'", name))?;
        let marker = if session.active_identity() == Some(name.as_str()) {
            Cell::new("●").fg(Color::Green)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            marker,
            Cell::new(&identity.name),
            Cell::new(&identity.full_name),
            Cell::new(&identity.email),
            Cell::new(identity.ssh_key_path.display()),
        ]);
    }

    println!("{table}");
    Ok(ExitCode::SUCCESS)
}

fn cmd_show(identities: &IdentityStore<GitConfigStore>, name: &str, json: bool) -> Result<ExitCode> {
    let identity = identities
        .show(name)
        .with_context(|| format!("failed to read identity '{}'", name))?;

    if identity.is_empty() {
        eprintln!("{}", style::warn(&format!("identity '{}' is not stored in this repository", name)));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&identity)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", style::header(&format!("Identity: {}", identity.name)));
    println!("  Name    : {}", identity.full_name);
    println!("  Email   : {}", identity.email);
    println!("  SSH key : {}", identity.ssh_key_path.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_current(identities: &IdentityStore<GitConfigStore>) -> Result<ExitCode> {
    let activator = SessionActivator::new(identities, ExecutionMode::Subprocess, self_exe());
    let session = Session::from_env();
    let name = activator.current(&session)?;
    println!("{}", name);
    Ok(ExitCode::SUCCESS)
}

/// `use` outside the shell function. The activator rejects it because this
/// process's environment dies with it.
fn cmd_use(identities: &IdentityStore<GitConfigStore>, name: &str) -> Result<ExitCode> {
    let activator = SessionActivator::new(identities, ExecutionMode::Subprocess, self_exe());
    let mut session = Session::from_env();
    let activation = activator.use_identity(&mut session, name)?;
    println!("{}", activation);
    Ok(ExitCode::SUCCESS)
}

fn cmd_reset(identities: &IdentityStore<GitConfigStore>) -> Result<ExitCode> {
    let activator = SessionActivator::new(identities, ExecutionMode::Subprocess, self_exe());
    let mut session = Session::from_env();
    activator.reset(&mut session)?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_shell_init(shell: Shell) -> Result<ExitCode> {
    let exe = self_exe();
    debug!(%shell, exe = %exe.display(), "printing shell integration");
    print!("{}", shell.init_script(&exe.to_string_lossy()));
    println!(
        "{}",
        style::dim(&format!("# Add to your shell rc: eval \"$(git-id shell-init {})\"", shell))
    );
    Ok(ExitCode::SUCCESS)
}
