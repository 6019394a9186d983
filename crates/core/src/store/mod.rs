//! Repository-scoped key/value access for stored identities.
//!
//! Identities live in the repository's local git config under
//! `identity.<name>.{name,email,sshkey}`. The store holds no state apart from
//! the repository location; every call re-reads the config file.

pub mod git_config;

use std::collections::BTreeSet;
use std::fmt;

use crate::errors::StoreError;

pub use git_config::GitConfigStore;

/// Config section that holds every identity.
pub const NAMESPACE: &str = "identity";

/// One of the three fields stored per identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Author / committer display name.
    Name,
    /// Author / committer email.
    Email,
    /// Path to the private SSH key.
    SshKey,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::SshKey];

    /// The config variable name for this field.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::SshKey => "sshkey",
        }
    }

    /// Full config key for `identity`'s copy of this field.
    pub fn key_for(self, identity: &str) -> String {
        format!("{}.{}.{}", NAMESPACE, identity, self.as_str())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value backend for identity fields.
pub trait ConfigStore {
    /// Read one field; `Ok(None)` when it is not set.
    fn get(&self, identity: &str, field: Field) -> Result<Option<String>, StoreError>;

    /// Write one field, replacing any previous value.
    fn set(&self, identity: &str, field: Field, value: &str) -> Result<(), StoreError>;

    /// Remove every field of `identity`. Fails with
    /// [`StoreError::IdentityNotFound`] when nothing was stored.
    fn remove_all(&self, identity: &str) -> Result<(), StoreError>;

    /// Names of all stored identities, deduplicated and sorted.
    fn list_identity_names(&self) -> Result<BTreeSet<String>, StoreError>;
}

/// Extract the identity name from a full config key such as
/// `identity.work.email`. Returns `None` for keys outside the namespace.
pub(crate) fn identity_from_key(key: &str) -> Option<&str> {
    let rest = key.strip_prefix(NAMESPACE)?.strip_prefix('.')?;
    let (identity, field) = rest.rsplit_once('.')?;
    let known = Field::ALL
        .iter()
        .any(|f| f.as_str().eq_ignore_ascii_case(field));
    if identity.is_empty() || !known {
        return None;
    }
    Some(identity)
}
