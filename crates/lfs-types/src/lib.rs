//! Foundation types for the LFS metadata store.
//!
//! Every other `lfs-*` crate depends on `lfs-types`.
//!
//! # Key Types
//!
//! - [`MetaObject`] — Tracked large object: oid plus declared size
//! - [`MetaUser`] — Registered credential holder
//! - [`RequestVars`] — Request descriptor handed to the store by handlers

pub mod object;
pub mod request;
pub mod user;

pub use object::MetaObject;
pub use request::RequestVars;
pub use user::MetaUser;
