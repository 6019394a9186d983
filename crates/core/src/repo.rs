//! Precondition checks run before any identity or session verb.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::PreconditionError;
use crate::store::GitConfigStore;

/// Locate the `git` binary on `$PATH`.
pub fn find_git() -> Result<PathBuf, PreconditionError> {
    let git = which::which("git").map_err(|_| PreconditionError::GitNotFound)?;
    debug!(git = %git.display(), "found git");
    Ok(git)
}

/// Check that git is installed and `cwd` is inside a repository, returning
/// the store for that repository.
pub fn require_repository(cwd: &Path) -> Result<GitConfigStore, PreconditionError> {
    find_git()?;
    GitConfigStore::discover(cwd).map_err(|_| PreconditionError::NotARepository(cwd.to_path_buf()))
}

/// [`require_repository`] for the process's working directory.
pub fn require_current_repository() -> Result<GitConfigStore, PreconditionError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    require_repository(&cwd)
}
