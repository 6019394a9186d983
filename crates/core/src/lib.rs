//! git-id core library.
//!
//! Named git identities (author name, email and SSH key) stored in a
//! repository's local config, activated per shell session, and supplied to
//! ssh through a `GIT_SSH` transport shim.

pub mod config;
pub mod errors;
pub mod identity;
pub mod repo;
pub mod session;
pub mod store;
pub mod transport;

// Re-exports for convenience.
pub use config::GitIdConfig;
pub use identity::{AddOutcome, Identity, IdentityStore};
pub use session::{Activation, ExecutionMode, Session, SessionActivator, Shell};
pub use store::{ConfigStore, GitConfigStore};
pub use transport::Transport;
