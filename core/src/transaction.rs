use std::collections::HashSet;

use serde_derive::{Deserialize, Serialize};

/// A transaction id. Monotonically increasing, starting at 1; `0` is
/// reserved to mean "no transaction".
pub type TxId = u64;

/// The isolation level a transaction runs under, fixed for its whole
/// lifetime once chosen at `Begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Snapshot,
    Serializable,
}

impl IsolationLevel {
    /// Repeatable Read, Snapshot and Serializable all share the same base
    /// visibility predicate (`spec.md` §4.4); only the commit-time conflict
    /// check differs between them.
    pub(crate) fn uses_snapshot_predicate(self) -> bool {
        matches!(
            self,
            IsolationLevel::RepeatableRead | IsolationLevel::Snapshot | IsolationLevel::Serializable
        )
    }

    /// Whether commits under this level run the commit-time conflict
    /// detector (`spec.md` §4.5). Repeatable Read shares Snapshot's read
    /// predicate but, unlike Snapshot and Serializable, never aborts a
    /// commit on conflict.
    pub(crate) fn conflict_checked(self) -> bool {
        matches!(self, IsolationLevel::Snapshot | IsolationLevel::Serializable)
    }
}

impl Default for IsolationLevel {
    fn default() -> Self {
        IsolationLevel::Serializable
    }
}

/// A transaction's lifecycle state. Transitions are terminal: once
/// `Committed` or `Aborted`, a transaction never changes status again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    InProgress,
    Committed,
    Aborted,
}

/// A single transaction's bookkeeping.
///
/// `in_progress`, once populated at `Begin`, is logically immutable: later
/// code must only read it. `read_set`/`write_set` only grow while `status ==
/// InProgress`; they are frozen by `Commit`/`Abort`.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: TxId,
    pub isolation: IsolationLevel,
    pub status: Status,
    pub in_progress: HashSet<TxId>,
    pub read_set: HashSet<String>,
    pub write_set: HashSet<String>,
}

impl Transaction {
    pub(crate) fn new(id: TxId, isolation: IsolationLevel, in_progress: HashSet<TxId>) -> Self {
        debug_assert!(!in_progress.contains(&id));
        Transaction {
            id,
            isolation,
            status: Status::InProgress,
            in_progress,
            read_set: HashSet::new(),
            write_set: HashSet::new(),
        }
    }
}
