use lfs_types::{MetaObject, MetaUser, RequestVars};

use crate::error::MetaResult;

/// Metadata store for object records and user credentials.
///
/// All implementations must satisfy these invariants:
/// - `get` and `put` authenticate `vars.authorization` before touching storage.
/// - An object record, once written, is never modified: `put` on an existing
///   oid returns the stored record with `existing = true`.
/// - Listings are all-or-nothing: one undecodable record fails the call.
/// - All errors are propagated, never silently ignored.
pub trait MetadataStore: Send + Sync {
    /// Look up the object named by `vars.oid`.
    fn get(&self, vars: &RequestVars) -> MetaResult<MetaObject>;

    /// Register `vars.oid` with `vars.size` unless it already exists.
    fn put(&self, vars: &RequestVars) -> MetaResult<MetaObject>;

    /// Store (or replace) the credential for `name`.
    fn add_user(&self, name: &str, password: &str) -> MetaResult<()>;

    /// Remove `name`. Removing an unknown user succeeds.
    fn delete_user(&self, name: &str) -> MetaResult<()>;

    /// Check `password` against the credential stored for `name`.
    fn verify_user(&self, name: &str, password: &str) -> MetaResult<bool>;

    /// All registered users, in store order.
    fn users(&self) -> MetaResult<Vec<MetaUser>>;

    /// All object records, in store order.
    fn objects(&self) -> MetaResult<Vec<MetaObject>>;
}
