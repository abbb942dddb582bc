use std::sync::Mutex;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::registry::TransactionRegistry;
use crate::store::Store;
use crate::transaction::{IsolationLevel, Status, TxId};
use crate::version::Version;

struct Inner {
    config: Config,
    store: Store,
    registry: TransactionRegistry,
}

/// The whole engine: store, transaction registry and configuration behind
/// one lock.
///
/// Every mutation site named in `spec.md` §5 — id allocation, registry
/// updates, version `finish` writes, chain prepends — happens while this
/// lock is held, which is what gives the "atomic commit w.r.t. visibility"
/// guarantee without any extra synchronization. Modeled on the teacher's
/// `MVCC<E> { engine: Arc<Mutex<E>> }`.
pub struct Database {
    inner: Mutex<Inner>,
}

impl Database {
    pub fn new(config: Config) -> Self {
        Database {
            inner: Mutex::new(Inner {
                config,
                store: Store::new(),
                registry: TransactionRegistry::new(),
            }),
        }
    }

    /// Replaces the isolation level applied to every subsequent `begin()`.
    /// Transactions already in progress keep the level they began with.
    pub fn set_default_isolation(&self, isolation: IsolationLevel) {
        self.inner.lock().unwrap().config.default_isolation = isolation;
    }

    pub fn begin(&self) -> TxId {
        let mut inner = self.inner.lock().unwrap();
        let isolation = inner.config.default_isolation;
        inner.registry.begin(isolation)
    }

    pub fn begin_with_isolation(&self, isolation: IsolationLevel) -> TxId {
        self.inner.lock().unwrap().registry.begin(isolation)
    }

    pub fn get(&self, tx_id: TxId, key: &str) -> Result<Option<String>> {
        let mut inner = self.inner.lock().unwrap();
        inner.registry.record_read(tx_id, key)?;
        let Inner { store, registry, .. } = &*inner;
        for v in store.chain(key) {
            if registry.is_visible(tx_id, v)? {
                return Ok(Some(v.value.clone()));
            }
        }
        Ok(None)
    }

    pub fn set(&self, tx_id: TxId, key: &str, value: String) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        invalidate(&mut inner, tx_id, key)?;
        inner.registry.record_write(tx_id, key)?;
        inner.store.append(key, Version::new(value, tx_id));
        Ok(())
    }

    pub fn delete(&self, tx_id: TxId, key: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if invalidate(&mut inner, tx_id, key)? {
            inner.registry.record_write(tx_id, key)?;
        }
        Ok(())
    }

    pub fn commit(&self, tx_id: TxId) -> Result<()> {
        self.inner.lock().unwrap().registry.finish(tx_id, Status::Committed)
    }

    pub fn abort(&self, tx_id: TxId) -> Result<()> {
        self.inner.lock().unwrap().registry.finish(tx_id, Status::Aborted)
    }

    pub fn status(&self, tx_id: TxId) -> Result<Status> {
        self.inner.lock().unwrap().registry.status(tx_id).ok_or(Error::UnknownTransaction(tx_id))
    }
}

/// Walks the chain for `key`, invalidating every version currently visible
/// to `tx_id` (`spec.md` §4.3). Returns whether any version was found, so
/// `Delete` can decide whether it actually touched the key.
fn invalidate(inner: &mut Inner, tx_id: TxId, key: &str) -> Result<bool> {
    let Inner { store, registry, .. } = inner;
    let mut found = false;
    for v in store.chain_mut(key) {
        if registry.is_visible(tx_id, v)? {
            v.finish = tx_id;
            found = true;
        }
    }
    Ok(found)
}
