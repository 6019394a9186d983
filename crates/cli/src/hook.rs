//! In-process entry point for `use` and `reset`.
//!
//! The shell function from `git-id shell-init` runs `git-id hook --shell <sh>
//! <verb>` and evaluates its stdout in the user's shell. The session script is
//! the only thing written to stdout; messages go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Subcommand;

use gitid_core::config::GitIdConfig;
use gitid_core::errors::CoreError;
use gitid_core::repo::require_current_repository;
use gitid_core::session::{ExecutionMode, Session, SessionActivator, Shell};
use gitid_core::{ConfigStore, IdentityStore};

use crate::style;

/// Session-mutating verbs accepted by `git-id hook`.
#[derive(Subcommand, Debug)]
pub enum HookAction {
    /// Activate an identity.
    Use {
        /// Identity name.
        name: String,
    },
    /// Deactivate the current identity.
    Reset,
}

/// What the hook writes: `script` to stdout, `messages` to stderr.
#[derive(Debug)]
struct HookOutput {
    script: String,
    messages: Vec<String>,
    exit_code: ExitCode,
}

impl HookOutput {
    /// Nothing on stdout: the shell keeps its current session.
    fn failed(error: &CoreError) -> Self {
        Self {
            script: String::new(),
            messages: vec![format!("Error: {}", error)],
            exit_code: ExitCode::FAILURE,
        }
    }
}

/// Run `action` and print the resulting session script for `shell`.
pub fn run(action: HookAction, shell: Shell, config: &GitIdConfig) -> ExitCode {
    let output = match require_current_repository() {
        Ok(store) => {
            let identities = IdentityStore::new(store).with_strict(config.general.strict);
            respond(
                &identities,
                action,
                shell,
                Session::from_env(),
                config,
                crate::self_exe(),
            )
        }
        Err(e) => HookOutput::failed(&e.into()),
    };

    print!("{}", output.script);
    for message in &output.messages {
        eprintln!("{}", message);
    }
    output.exit_code
}

fn respond<S: ConfigStore>(
    identities: &IdentityStore<S>,
    action: HookAction,
    shell: Shell,
    session: Session,
    config: &GitIdConfig,
    exe: PathBuf,
) -> HookOutput {
    match execute(identities, action, session, config, exe) {
        Ok((session, messages, exit_code)) => HookOutput {
            script: shell.render(&session),
            messages,
            exit_code,
        },
        Err(e) => HookOutput::failed(&e),
    }
}

fn execute<S: ConfigStore>(
    identities: &IdentityStore<S>,
    action: HookAction,
    mut session: Session,
    config: &GitIdConfig,
    exe: PathBuf,
) -> Result<(Session, Vec<String>, ExitCode), CoreError> {
    let activator = SessionActivator::new(identities, ExecutionMode::Interactive, exe);

    match action {
        HookAction::Use { name } => {
            let mut messages = Vec::new();
            if !identities.exists(&name)? {
                messages.push(style::warn(&format!(
                    "identity '{}' is not stored in this repository",
                    name
                )));
            }
            let activation = activator.use_identity(&mut session, &name)?;
            messages.push(style::success(&activation.to_string()));
            Ok((session, messages, ExitCode::SUCCESS))
        }
        HookAction::Reset => {
            let message = match session.active_identity() {
                Some(previous) => format!("Identity '{}' deactivated", previous),
                None => "No identity was active".to_string(),
            };
            activator.reset(&mut session)?;
            let exit_code = if config.session.reset_reports_failure {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            Ok((session, vec![style::success(&message)], exit_code))
        }
    }
}
