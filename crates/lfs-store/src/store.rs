//! [`MetaStore`] implementation on top of redb.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use lfs_crypto::{PasswordHash, PasswordHasher};
use lfs_types::{MetaObject, MetaUser, RequestVars};
use redb::{
    Database, DatabaseError, ReadableTable, TableDefinition, TableHandle, WriteTransaction,
};
use tracing::{debug, error, info};

use crate::auth::Authenticator;
use crate::codec;
use crate::config::StoreConfig;
use crate::error::{MetaError, MetaResult};
use crate::traits::MetadataStore;

type Partition = TableDefinition<'static, &'static str, &'static [u8]>;

/// user name → salted credential hash.
const USERS: Partition = TableDefinition::new("users");
/// oid → encoded object record.
const OBJECTS: Partition = TableDefinition::new("objects");

/// Poll interval while another handle holds the file lock.
const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Metadata store backed by a single redb file.
///
/// redb serializes write transactions and gives every read transaction a
/// consistent snapshot, so the store is shared across threads (behind an
/// `Arc`) without any locking of its own. The file is exclusively locked
/// for the lifetime of the handle; [`close`](Self::close) releases it.
pub struct MetaStore {
    db: Database,
    path: PathBuf,
    authenticator: Box<dyn Authenticator>,
}

impl MetaStore {
    /// Open (or create) the store described by `config`.
    ///
    /// Waits up to `config.open_timeout` for a competing holder to release
    /// the file, then creates the `users` and `objects` partitions if they
    /// are missing.
    pub fn open(
        config: &StoreConfig,
        authenticator: impl Authenticator + 'static,
    ) -> MetaResult<Self> {
        let db = open_database(&config.path, config.open_timeout)?;
        let store = Self {
            db,
            path: config.path.clone(),
            authenticator: Box::new(authenticator),
        };
        store.init_partitions()?;
        info!(path = %store.path.display(), "opened metadata store");
        Ok(store)
    }

    /// Open the store file at `path` with default settings.
    pub fn open_path(
        path: impl Into<PathBuf>,
        authenticator: impl Authenticator + 'static,
    ) -> MetaResult<Self> {
        Self::open(&StoreConfig::at(path), authenticator)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the file handle and its lock.
    pub fn close(self) {
        let Self { db, path, .. } = self;
        drop(db);
        info!(path = %path.display(), "closed metadata store");
    }

    fn init_partitions(&self) -> MetaResult<()> {
        let txn = self.db.begin_write()?;
        // open_table creates the table inside a write transaction.
        txn.open_table(USERS)?;
        txn.open_table(OBJECTS)?;
        txn.commit()?;
        Ok(())
    }

    fn authorize(&self, vars: &RequestVars) -> MetaResult<()> {
        if self.authenticator.authenticate(&vars.authorization) {
            Ok(())
        } else {
            Err(MetaError::Auth)
        }
    }

    fn lookup(&self, oid: &str) -> MetaResult<MetaObject> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(OBJECTS)?;
        let value = table.get(oid)?;
        match value {
            Some(guard) if !guard.value().is_empty() => codec::decode_object(guard.value()),
            _ => Err(MetaError::ObjectNotFound(oid.to_string())),
        }
    }

    /// Insert `object` unless a record for its oid appeared since the
    /// caller's lookup. Returns the record that won.
    fn insert_if_absent(&self, object: MetaObject) -> MetaResult<MetaObject> {
        let value = codec::encode_object(&object)?;
        let txn = self.db.begin_write()?;
        let found = {
            require_partition(&txn, OBJECTS)?;
            let mut table = txn.open_table(OBJECTS)?;
            let current = match table.get(object.oid.as_str())? {
                Some(guard) if !guard.value().is_empty() => {
                    Some(codec::decode_object(guard.value())?)
                }
                _ => None,
            };
            if current.is_none() {
                table.insert(object.oid.as_str(), value.as_slice())?;
            }
            current
        };
        match found {
            Some(existing) => {
                txn.abort()?;
                Ok(existing.into_existing())
            }
            None => {
                txn.commit()?;
                debug!(oid = %object.oid, size = object.size, "stored object");
                Ok(object)
            }
        }
    }
}

impl MetadataStore for MetaStore {
    fn get(&self, vars: &RequestVars) -> MetaResult<MetaObject> {
        let result = self.authorize(vars).and_then(|()| self.lookup(&vars.oid));
        log_lookup_failure(&vars.oid, result)
    }

    fn put(&self, vars: &RequestVars) -> MetaResult<MetaObject> {
        self.authorize(vars)?;

        match log_lookup_failure(&vars.oid, self.lookup(&vars.oid)) {
            Ok(meta) => return Ok(meta.into_existing()),
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }

        self.insert_if_absent(MetaObject::new(vars.oid.clone(), vars.size))
    }

    fn add_user(&self, name: &str, password: &str) -> MetaResult<()> {
        let hash = PasswordHasher::USER.hash(password.as_bytes());
        let txn = self.db.begin_write()?;
        {
            require_partition(&txn, USERS)?;
            let mut table = txn.open_table(USERS)?;
            table.insert(name, hash.to_bytes().as_slice())?;
        }
        txn.commit()?;
        debug!(user = name, "stored user credential");
        Ok(())
    }

    fn delete_user(&self, name: &str) -> MetaResult<()> {
        let txn = self.db.begin_write()?;
        {
            require_partition(&txn, USERS)?;
            let mut table = txn.open_table(USERS)?;
            table.remove(name)?;
        }
        txn.commit()?;
        debug!(user = name, "deleted user");
        Ok(())
    }

    fn verify_user(&self, name: &str, password: &str) -> MetaResult<bool> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(USERS)?;
        let value = table.get(name)?;
        let Some(guard) = value else {
            return Ok(false);
        };
        let stored =
            PasswordHash::from_bytes(guard.value()).map_err(|e| MetaError::Decode(e.to_string()))?;
        Ok(PasswordHasher::USER.verify(&stored, password.as_bytes()))
    }

    fn users(&self) -> MetaResult<Vec<MetaUser>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(USERS)?;
        let mut users = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            users.push(MetaUser::new(key.value()));
        }
        Ok(users)
    }

    fn objects(&self) -> MetaResult<Vec<MetaObject>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(OBJECTS)?;
        let mut objects = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            objects.push(codec::decode_object(value.value())?);
        }
        Ok(objects)
    }
}

impl std::fmt::Debug for MetaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Report a failed object lookup before handing the result back.
fn log_lookup_failure(oid: &str, result: MetaResult<MetaObject>) -> MetaResult<MetaObject> {
    if let Err(err) = &result {
        error!(operation = "meta_store", oid, "{err}");
    }
    result
}

/// Open the database, polling while another handle holds the lock.
fn open_database(path: &Path, timeout: Duration) -> MetaResult<Database> {
    let deadline = Instant::now() + timeout;
    loop {
        match Database::create(path) {
            Ok(db) => return Ok(db),
            Err(DatabaseError::DatabaseAlreadyOpen) if Instant::now() < deadline => {
                thread::sleep(LOCK_RETRY_INTERVAL);
            }
            Err(DatabaseError::DatabaseAlreadyOpen) => {
                return Err(MetaError::Unavailable {
                    path: path.to_path_buf(),
                    reason: format!("timed out after {timeout:?} waiting for file lock"),
                });
            }
            Err(err) => {
                return Err(MetaError::Unavailable {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                });
            }
        }
    }
}

/// A write transaction's `open_table` silently creates missing tables, so
/// writers check for the partition first.
fn require_partition(txn: &WriteTransaction, partition: Partition) -> MetaResult<()> {
    let present = txn
        .list_tables()?
        .any(|handle| handle.name() == partition.name());
    if present {
        Ok(())
    } else {
        Err(MetaError::BucketNotFound(partition.name().to_string()))
    }
}
