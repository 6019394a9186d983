//! Identity CRUD on top of a [`ConfigStore`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use super::key::validate_private_key;
use super::{AddOutcome, Identity};
use crate::errors::{IdentityError, StoreError};
use crate::store::{ConfigStore, Field};

/// Add, delete, list and show identities.
///
/// In lenient mode (the default) `show` on an unknown identity returns an
/// identity with empty fields. With [`IdentityStore::with_strict`] it fails
/// with [`IdentityError::NotFound`] instead.
#[derive(Debug, Clone)]
pub struct IdentityStore<S> {
    store: S,
    strict: bool,
}

impl<S: ConfigStore> IdentityStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            strict: false,
        }
    }

    /// Fail lookups of unknown identities instead of returning empty fields.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// `true` when `name` has a stored `name` field.
    pub fn exists(&self, name: &str) -> Result<bool, IdentityError> {
        Ok(self.store.get(name, Field::Name)?.is_some())
    }

    /// Create `name`, or overwrite its fields if it already exists.
    ///
    /// The key file is validated before anything is written.
    #[instrument(skip(self, full_name, email))]
    pub fn add_or_update(
        &self,
        name: &str,
        full_name: &str,
        email: &str,
        ssh_key_path: &Path,
    ) -> Result<AddOutcome, IdentityError> {
        validate_private_key(ssh_key_path)?;

        let outcome = if self.exists(name)? {
            AddOutcome::Updated
        } else {
            AddOutcome::Created
        };

        let key = ssh_key_path.to_string_lossy();
        let writes = [
            (Field::Name, full_name),
            (Field::Email, email),
            (Field::SshKey, key.as_ref()),
        ];
        for (field, value) in writes {
            self.store
                .set(name, field, value)
                .map_err(|source| IdentityError::StoreWrite {
                    name: name.to_string(),
                    source,
                })?;
        }

        info!(%outcome, "stored identity");
        Ok(outcome)
    }

    /// Remove every field of `name`.
    #[instrument(skip(self))]
    pub fn delete(&self, name: &str) -> Result<(), IdentityError> {
        if !self.exists(name)? {
            return Err(IdentityError::NotFound(name.to_string()));
        }
        self.store.remove_all(name).map_err(|e| match e {
            StoreError::IdentityNotFound(name) => IdentityError::NotFound(name),
            other => IdentityError::Store(other),
        })?;
        info!("deleted identity");
        Ok(())
    }

    /// All stored identity names, sorted.
    pub fn list(&self) -> Result<BTreeSet<String>, IdentityError> {
        Ok(self.store.list_identity_names()?)
    }

    /// Read all fields of `name`. Absent fields are empty.
    pub fn show(&self, name: &str) -> Result<Identity, IdentityError> {
        let full_name = self.store.get(name, Field::Name)?;
        if self.strict && full_name.is_none() {
            return Err(IdentityError::NotFound(name.to_string()));
        }
        let identity = Identity {
            name: name.to_string(),
            full_name: full_name.unwrap_or_default(),
            email: self.store.get(name, Field::Email)?.unwrap_or_default(),
            ssh_key_path: PathBuf::from(self.store.get(name, Field::SshKey)?.unwrap_or_default()),
        };
        debug!(name, empty = identity.is_empty(), "read identity");
        Ok(identity)
    }
}
