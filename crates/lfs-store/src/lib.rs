//! Transactional metadata store for an LFS object transfer service.
//!
//! The store tracks which large objects exist (oid and declared size) and
//! which users may authenticate. It holds no object payloads.
//!
//! # Partitions
//!
//! One redb file holds two tables:
//!
//! - `objects` — oid → bincode-encoded `{oid, size}` record
//! - `users` — user name → salted credential hash
//!
//! Both are created when the store is opened. A missing table later on is
//! reported as [`MetaError::BucketNotFound`], never silently recreated.
//!
//! # Design Rules
//!
//! 1. Object records are immutable: `put` on an existing oid returns the
//!    stored record flagged `existing` and writes nothing.
//! 2. `get` and `put` consult the injected [`Authenticator`] before any
//!    storage access.
//! 3. Readers see a consistent snapshot; writers are serialized by redb.
//! 4. Listings are all-or-nothing.
//! 5. All errors are propagated, never silently ignored.

pub mod auth;
pub mod codec;
pub mod config;
pub mod error;
pub mod store;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use auth::{AllowAll, Authenticator, DenyAll};
pub use config::StoreConfig;
pub use error::{MetaError, MetaResult};
pub use store::MetaStore;
pub use traits::MetadataStore;
