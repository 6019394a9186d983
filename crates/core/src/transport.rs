//! ssh transport shim.
//!
//! While an identity is active git runs this tool as `GIT_SSH`. The shim
//! prepends `-i <key>` to the arguments git passed and hands everything to the
//! real ssh client, inheriting stdin/stdout/stderr so the git protocol stream
//! flows through untouched. Nothing is printed on the way.

use std::ffi::OsString;
use std::process::ExitStatus;

use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::errors::TransportError;
use crate::session::Session;

/// `true` when `arg` looks like a remote endpoint (`user@host`, `host.tld`).
fn looks_like_endpoint(arg: &str) -> bool {
    arg.contains('@') || arg.contains('.')
}

/// Decide whether an invocation came from git asking for an ssh connection.
///
/// git calls `GIT_SSH` as `[options...] [user@]host command`. The first
/// argument is either the endpoint itself or an ssh option followed later by
/// the endpoint.
pub fn is_transport_invocation<S: AsRef<str>>(args: &[S]) -> bool {
    let Some(first) = args.first().map(AsRef::as_ref) else {
        return false;
    };
    if first.starts_with('-') {
        return args[1..].iter().any(|arg| looks_like_endpoint(arg.as_ref()));
    }
    looks_like_endpoint(first)
}

/// Runs the system ssh client with the session's key.
#[derive(Debug, Clone)]
pub struct Transport {
    ssh_program: String,
}

impl Transport {
    pub fn new(ssh_program: impl Into<String>) -> Self {
        Self {
            ssh_program: ssh_program.into(),
        }
    }

    pub fn ssh_program(&self) -> &str {
        &self.ssh_program
    }

    /// Arguments passed to ssh: `-i <key>` followed by `args` unchanged.
    pub fn build_args<I, A>(key: &str, args: I) -> Vec<OsString>
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        let mut out = vec![OsString::from("-i"), OsString::from(key)];
        out.extend(args.into_iter().map(Into::into));
        out
    }

    /// Run ssh and wait for it. The caller exits with the returned status.
    #[instrument(skip(self, session, args), fields(ssh = %self.ssh_program))]
    pub async fn connect<I, A>(&self, session: &Session, args: I) -> Result<ExitStatus, TransportError>
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        let key = session.ssh_key().ok_or(TransportError::KeyNotSet)?;
        let ssh_args = Self::build_args(key, args);
        debug!(args = ?ssh_args, "forwarding to ssh");

        let status = Command::new(&self.ssh_program)
            .args(&ssh_args)
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TransportError::BinaryNotFound(self.ssh_program.clone())
                } else {
                    TransportError::Spawn(e)
                }
            })?;

        if !status.success() {
            warn!(code = ?status.code(), "ssh exited with failure");
        }
        Ok(status)
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new("ssh")
    }
}
