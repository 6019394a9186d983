//! Error types for the git-id core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Precondition errors
// ---------------------------------------------------------------------------

/// The environment git-id runs in is not usable.
#[derive(Debug, Error)]
pub enum PreconditionError {
    /// The `git` binary was not found on `$PATH`.
    #[error("git binary not found on PATH")]
    GitNotFound,

    /// The working directory is not inside a git repository.
    #[error("not a git repository: '{}'", .0.display())]
    NotARepository(PathBuf),
}

// ---------------------------------------------------------------------------
// Config store errors
// ---------------------------------------------------------------------------

/// Errors from the repository-scoped config store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The repository backing the store could not be opened.
    #[error("git repository not found at '{}'", .0.display())]
    RepositoryNotFound(PathBuf),

    /// `remove_all` was asked to remove an identity with no stored fields.
    #[error("identity '{0}' does not exist")]
    IdentityNotFound(String),

    /// A `git2` config error.
    #[error("git config error: {0}")]
    Git2(#[from] git2::Error),
}

// ---------------------------------------------------------------------------
// Identity errors
// ---------------------------------------------------------------------------

/// Errors from identity store operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The SSH key file could not be read.
    #[error("cannot read ssh key '{}': {source}", .path.display())]
    InvalidKeyPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The SSH key file does not start with a private-key header.
    #[error("'{}' does not look like a private key", .0.display())]
    InvalidKeyFormat(PathBuf),

    /// No identity with this name is stored.
    #[error("identity '{0}' not found")]
    NotFound(String),

    /// Writing a field to the store failed.
    #[error("failed to store identity '{name}': {source}")]
    StoreWrite {
        name: String,
        #[source]
        source: StoreError,
    },

    /// Any other store failure (open, read, remove).
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// Session errors
// ---------------------------------------------------------------------------

/// Errors from session activation.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No identity is active in this session.
    #[error("no identity is active in this session")]
    NotSet,

    /// The caller cannot see environment changes made by this process.
    #[error("'{verb}' must run inside your shell; add `eval \"$(git-id shell-init <bash|zsh|fish>)\"` to your shell rc")]
    EnvironmentNotMutable { verb: &'static str },

    /// Reading the identity to activate failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Errors from the ssh transport shim.
#[derive(Debug, Error)]
pub enum TransportError {
    /// `GIT_SSH_KEY` is not set, so there is no key to inject.
    #[error("GIT_SSH_KEY is not set; activate an identity with 'git-id use <name>'")]
    KeyNotSet,

    /// The ssh client binary was not found.
    #[error("ssh binary not found: {0}")]
    BinaryNotFound(String),

    /// Spawning or waiting on the ssh client failed.
    #[error("failed to run ssh: {0}")]
    Spawn(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from loading the git-id configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
