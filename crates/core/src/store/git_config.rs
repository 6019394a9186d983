//! [`ConfigStore`] backed by the repository-local git config via `git2`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use git2::{Config, ConfigLevel, ErrorCode, Repository};
use tracing::{debug, info, instrument};

use super::{identity_from_key, ConfigStore, Field, NAMESPACE};
use crate::errors::StoreError;

/// Identity storage in `<repo>/.git/config`.
#[derive(Debug, Clone)]
pub struct GitConfigStore {
    repo_path: PathBuf,
}

impl GitConfigStore {
    /// Create a store for the repository at (or above) `path`.
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let repo = Repository::discover(path)
            .map_err(|_| StoreError::RepositoryNotFound(path.to_path_buf()))?;
        let repo_path = repo.path().to_path_buf();
        debug!(repo = %repo_path.display(), "using repository config store");
        Ok(Self { repo_path })
    }

    /// Path of the repository's git directory.
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    fn local_config(&self) -> Result<Config, StoreError> {
        let repo = Repository::open(&self.repo_path)
            .map_err(|_| StoreError::RepositoryNotFound(self.repo_path.clone()))?;
        let config = repo.config()?.open_level(ConfigLevel::Local)?;
        Ok(config)
    }
}

impl ConfigStore for GitConfigStore {
    #[instrument(skip(self), fields(repo = %self.repo_path.display()))]
    fn get(&self, identity: &str, field: Field) -> Result<Option<String>, StoreError> {
        let config = self.local_config()?;
        match config.get_string(&field.key_for(identity)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, value), fields(repo = %self.repo_path.display()))]
    fn set(&self, identity: &str, field: Field, value: &str) -> Result<(), StoreError> {
        let mut config = self.local_config()?;
        config.set_str(&field.key_for(identity), value)?;
        debug!("wrote identity field");
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %self.repo_path.display()))]
    fn remove_all(&self, identity: &str) -> Result<(), StoreError> {
        let mut config = self.local_config()?;
        let mut removed = 0;
        for field in Field::ALL {
            match config.remove(&field.key_for(identity)) {
                Ok(()) => removed += 1,
                Err(e) if e.code() == ErrorCode::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        if removed == 0 {
            return Err(StoreError::IdentityNotFound(identity.to_string()));
        }
        info!(removed, "removed identity fields");
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %self.repo_path.display()))]
    fn list_identity_names(&self) -> Result<BTreeSet<String>, StoreError> {
        let config = self.local_config()?;
        let pattern = format!(r"^{}\.", NAMESPACE);
        let mut entries = config.entries(Some(pattern.as_str()))?;
        let mut names = BTreeSet::new();
        while let Some(entry) = entries.next() {
            let entry = entry?;
            if let Some(identity) = entry.name().and_then(identity_from_key) {
                names.insert(identity.to_string());
            }
        }
        debug!(count = names.len(), "listed identities");
        Ok(names)
    }
}
