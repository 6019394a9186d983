//! Shell-scoped activation of an identity.
//!
//! The active identity is carried by environment variables of the user's
//! interactive shell. A process cannot change its parent's environment, so the
//! core works on an explicit [`Session`] value: the binary builds one from its
//! environment, the [`SessionActivator`] mutates it, and [`Shell::render`]
//! turns the result into a script the shell evaluates.
//!
//! Whether a caller can propagate changes at all is stated explicitly with
//! [`ExecutionMode`]; `use` and `reset` refuse to run in
//! [`ExecutionMode::Subprocess`].

pub mod activator;
pub mod shell;

use std::collections::BTreeMap;
use std::fmt;

pub use activator::{Activation, SessionActivator};
pub use shell::Shell;

/// Environment variables that make up a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SessionVar {
    /// Name of the active identity.
    Id,
    /// Private key used by the transport shim.
    SshKey,
    AuthorName,
    AuthorEmail,
    CommitterName,
    CommitterEmail,
    /// Command git runs instead of `ssh`; points back at git-id.
    Ssh,
    /// Tells git the `GIT_SSH` command accepts OpenSSH options.
    SshVariant,
}

impl SessionVar {
    pub const ALL: [SessionVar; 8] = [
        SessionVar::Id,
        SessionVar::SshKey,
        SessionVar::AuthorName,
        SessionVar::AuthorEmail,
        SessionVar::CommitterName,
        SessionVar::CommitterEmail,
        SessionVar::Ssh,
        SessionVar::SshVariant,
    ];

    pub fn env_name(self) -> &'static str {
        match self {
            SessionVar::Id => "GIT_ID",
            SessionVar::SshKey => "GIT_SSH_KEY",
            SessionVar::AuthorName => "GIT_AUTHOR_NAME",
            SessionVar::AuthorEmail => "GIT_AUTHOR_EMAIL",
            SessionVar::CommitterName => "GIT_COMMITTER_NAME",
            SessionVar::CommitterEmail => "GIT_COMMITTER_EMAIL",
            SessionVar::Ssh => "GIT_SSH",
            SessionVar::SshVariant => "GIT_SSH_VARIANT",
        }
    }

    fn from_env_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|var| var.env_name() == name)
    }
}

impl fmt::Display for SessionVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_name())
    }
}

/// Whether the running code can change state its caller will observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Running on behalf of the user's shell, which applies the rendered
    /// session afterwards.
    Interactive,
    /// Running as a plain child process; environment changes are lost on exit.
    Subprocess,
}

impl ExecutionMode {
    pub fn can_mutate_environment(self) -> bool {
        matches!(self, ExecutionMode::Interactive)
    }
}

/// Snapshot of the session variables.
///
/// Empty values are treated as unset when reading an environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    vars: BTreeMap<SessionVar, String>,
}

impl Session {
    /// Capture the session from this process's environment.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    /// Build a session from `(name, value)` pairs; unrelated names are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut session = Self::default();
        for (key, value) in vars {
            let Some(var) = SessionVar::from_env_name(key.as_ref()) else {
                continue;
            };
            let value = value.into();
            if !value.is_empty() {
                session.vars.insert(var, value);
            }
        }
        session
    }

    pub fn get(&self, var: SessionVar) -> Option<&str> {
        self.vars.get(&var).map(String::as_str)
    }

    /// Name of the active identity, if any.
    pub fn active_identity(&self) -> Option<&str> {
        self.get(SessionVar::Id)
    }

    /// Key path the transport shim should use, if any.
    pub fn ssh_key(&self) -> Option<&str> {
        self.get(SessionVar::SshKey)
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Every session variable in a fixed order, with its value if set.
    pub fn entries(&self) -> impl Iterator<Item = (SessionVar, Option<&str>)> + '_ {
        SessionVar::ALL.into_iter().map(move |var| (var, self.get(var)))
    }

    pub(crate) fn set(&mut self, var: SessionVar, value: impl Into<String>) {
        self.vars.insert(var, value.into());
    }

    pub(crate) fn clear(&mut self) {
        self.vars.clear();
    }
}
