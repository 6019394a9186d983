//! Named author identities stored per repository.
//!
//! An identity bundles the author name, email and private SSH key that git
//! should use while it is active. [`IdentityStore`] implements the add,
//! delete, list and show operations on top of a [`crate::store::ConfigStore`].

pub mod key;
pub mod store;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

pub use store::IdentityStore;

/// A stored identity. Missing fields are empty strings / an empty path.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Identity {
    /// Unique identity name, e.g. `work`.
    pub name: String,
    /// Author / committer display name.
    pub full_name: String,
    /// Author / committer email.
    pub email: String,
    /// Path to the private SSH key.
    pub ssh_key_path: PathBuf,
}

impl Identity {
    /// `true` when none of the stored fields are present.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_empty() && self.email.is_empty() && self.ssh_key_path.as_os_str().is_empty()
    }
}

/// Whether `add` created a new identity or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Created,
    Updated,
}

impl fmt::Display for AddOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddOutcome::Created => f.write_str("created"),
            AddOutcome::Updated => f.write_str("updated"),
        }
    }
}
