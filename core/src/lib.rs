//! An in-memory key/value store with multi-version concurrency control.
//!
//! Keys and values are opaque strings. Every `Set` appends a new version to
//! a per-key chain rather than overwriting in place; every `Delete` writes
//! a tombstone by invalidating the version(s) currently visible to the
//! deleting transaction. Nothing is ever removed from a chain.
//!
//! ISOLATION LEVELS
//! =================
//! Five levels, chosen per transaction at `Begin` and fixed for its
//! lifetime:
//!
//! * `ReadUncommitted` -- sees every live version, including uncommitted
//!   and even aborted writers' versions, until they're overwritten.
//! * `ReadCommitted` -- sees only versions created by committed
//!   transactions (or itself), re-evaluated on every read.
//! * `RepeatableRead`, `Snapshot`, `Serializable` -- all three read from a
//!   consistent snapshot fixed at `Begin`: the set of transactions that
//!   were in progress when this transaction started is recorded once and
//!   never consulted again for "is this concurrent", only for visibility.
//!
//! Only `Snapshot` and `Serializable` additionally check for conflicts at
//! commit time:
//!
//! * `Snapshot` aborts on commit if its write set intersects the write set
//!   of any transaction that committed while it was running.
//! * `Serializable` aborts if either its read or write set intersects the
//!   other set of any transaction that committed while it was running.
//!
//! Example, with two concurrent transactions T2 and T5 (T5's own
//! uncommitted writes in parentheses):
//!
//! ```text
//! Time
//! 5 (a5)
//! 4  a4
//! 3      b3      x
//! 2         (x)     (e2)
//! 1  a1      c1  d1
//!    a   b   c   d   e   Keys
//! ```
//!
//! T5 does not see the tombstone at `c@2` nor `e=e2`: version 2 is in its
//! snapshot of in-progress transactions. T2 sees its own writes (`e=e2`,
//! `c` deleted) but nothing written after it began. Once T2 commits, a
//! fresh transaction T6 will see `c` deleted and `e=e2` -- T5 still won't,
//! because its snapshot was fixed before T2 committed.
//!
//! CONCURRENCY
//! ===========
//! There is no reader/writer blocking and no deadlock avoidance: conflicts
//! are only ever discovered at commit time, never by waiting. A
//! [`Database`] may be shared across threads (it is `Send + Sync`); each
//! [`Connection`] runs at most one transaction and never blocks on another
//! connection's.
//!
//! ## Getting started
//!
//! ```
//! use std::sync::Arc;
//! use mvcc_store::{Config, Connection, Database};
//!
//! let db = Arc::new(Database::new(Config::default()));
//!
//! let mut c1 = Connection::new(db.clone());
//! c1.begin().unwrap();
//! c1.set("x", "hey").unwrap();
//! assert_eq!(c1.get("x").unwrap(), Some("hey".to_string()));
//! c1.commit().unwrap();
//! ```

mod conflict;
mod config;
mod connection;
mod database;
mod error;
mod registry;
mod store;
mod transaction;
mod version;
mod visibility;

pub use config::Config;
pub use connection::Connection;
pub use database::Database;
pub use error::{Error, Result};
pub use transaction::{IsolationLevel, Status, TxId};
pub use version::Version;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn conn(db: &Arc<Database>) -> Connection {
        Connection::new(db.clone())
    }

    #[test]
    fn set_then_get_same_txn() {
        let db = Arc::new(Database::new(Config::default()));
        let mut c = conn(&db);
        c.begin().unwrap();
        c.set("x", "hey").unwrap();
        assert_eq!(c.get("x").unwrap(), Some("hey".to_string()));
        c.commit().unwrap();
    }

    #[test]
    fn set_delete_get_same_txn_is_empty() {
        let db = Arc::new(Database::new(Config::default()));
        let mut c = conn(&db);
        c.begin().unwrap();
        c.set("x", "hey").unwrap();
        c.delete("x").unwrap();
        assert_eq!(c.get("x").unwrap(), None);
        c.commit().unwrap();
    }

    #[test]
    fn aborted_write_never_visible() {
        let db = Arc::new(Database::new(Config::default()));

        let mut writer = conn(&db);
        writer.begin().unwrap();
        writer.set("x", "hey").unwrap();
        writer.abort().unwrap();

        for level in [
            IsolationLevel::ReadUncommitted,
            IsolationLevel::ReadCommitted,
            IsolationLevel::RepeatableRead,
            IsolationLevel::Snapshot,
            IsolationLevel::Serializable,
        ] {
            db.set_default_isolation(level);
            let mut reader = conn(&db);
            reader.begin().unwrap();
            assert_eq!(reader.get("x").unwrap(), None, "level {level:?} saw an aborted write");
            reader.commit().unwrap();
        }
    }

    #[test]
    fn commands_without_a_transaction_are_usage_errors() {
        let db = Arc::new(Database::new(Config::default()));
        let mut c = conn(&db);
        assert_eq!(c.get("x").unwrap_err(), Error::NoActiveTransaction);
        assert_eq!(c.set("x", "y").unwrap_err(), Error::NoActiveTransaction);
        assert_eq!(c.delete("x").unwrap_err(), Error::NoActiveTransaction);
        assert_eq!(c.commit().unwrap_err(), Error::NoActiveTransaction);
        assert_eq!(c.abort().unwrap_err(), Error::NoActiveTransaction);
    }

    #[test]
    fn begin_twice_is_a_usage_error() {
        let db = Arc::new(Database::new(Config::default()));
        let mut c = conn(&db);
        c.begin().unwrap();
        assert_eq!(c.begin().unwrap_err(), Error::TransactionAlreadyActive);
    }

    #[test]
    fn delete_of_missing_key_is_a_noop() {
        let db = Arc::new(Database::new(Config::default()));
        let mut c = conn(&db);
        c.begin().unwrap();
        c.delete("missing").unwrap();
        assert_eq!(c.get("missing").unwrap(), None);
        c.commit().unwrap();
    }
}
