//! Scoped configuration register.
//!
//! [`ConfigStore`] is populated by the bootstrap phases (single writer) and
//! then frozen into an immutable [`ConfigSnapshot`] that workers and modules
//! share without locking.

mod snapshot;
mod store;

pub use snapshot::ConfigSnapshot;
pub use store::{ConfigStore, Scope};

pub(crate) use store::NO_DATABASE_KEY;
