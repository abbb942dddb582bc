use std::sync::Arc;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::transaction::TxId;

/// A client session: binds a database to at most one in-flight transaction
/// at a time, and dispatches the eight command kinds from `spec.md` §4.6 /
/// §6. No command *parsing* happens here — callers invoke these methods
/// directly; a text or wire-protocol front-end is an explicit Non-goal.
pub struct Connection {
    db: Arc<Database>,
    current: Option<TxId>,
}

impl Connection {
    pub fn new(db: Arc<Database>) -> Self {
        Connection { db, current: None }
    }

    /// `true` if a transaction is currently in progress on this connection.
    pub fn has_active_transaction(&self) -> bool {
        self.current.is_some()
    }

    pub fn begin(&mut self) -> Result<()> {
        if self.current.is_some() {
            return Err(Error::TransactionAlreadyActive);
        }
        self.current = Some(self.db.begin());
        Ok(())
    }

    /// Commits the current transaction and clears it, even if the commit
    /// fails with a conflict -- the transaction was aborted by the time the
    /// error surfaced, so there is nothing left in progress either way
    /// (`spec.md` §4.6).
    pub fn commit(&mut self) -> Result<()> {
        let id = self.current.take().ok_or(Error::NoActiveTransaction)?;
        self.db.commit(id)
    }

    pub fn abort(&mut self) -> Result<()> {
        let id = self.current.take().ok_or(Error::NoActiveTransaction)?;
        self.db.abort(id)
    }

    pub fn get(&mut self, key: &str) -> Result<Option<String>> {
        let id = self.current.ok_or(Error::NoActiveTransaction)?;
        self.db.get(id, key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let id = self.current.ok_or(Error::NoActiveTransaction)?;
        self.db.set(id, key, value.into())
    }

    pub fn delete(&mut self, key: &str) -> Result<()> {
        let id = self.current.ok_or(Error::NoActiveTransaction)?;
        self.db.delete(id, key)
    }
}
