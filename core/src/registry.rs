use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::transaction::{IsolationLevel, Status, Transaction, TxId};
use crate::{conflict, visibility};

/// Mapping from transaction id to transaction state, plus the monotonic id
/// allocator (`spec.md` §4.1).
///
/// Backed by a dense, push-only `Vec`: ids are handed out strictly in
/// order starting at 1, and every allocated id is immediately inserted, so
/// `transactions[id - 1]` is always the record for `id`. This is the
/// "compact ... dense vector mapping" `spec.md` §4.5 asks for.
#[derive(Debug, Default)]
pub struct TransactionRegistry {
    transactions: Vec<Transaction>,
}

impl TransactionRegistry {
    pub fn new() -> Self {
        TransactionRegistry { transactions: Vec::new() }
    }

    /// The id that will be handed to the next `begin()` call. Used as the
    /// inclusive upper bound of the conflict scan in `spec.md` §4.5; an id
    /// equal to this value has not been allocated yet and [`Self::get`]
    /// correctly reports it as absent.
    pub fn next_id(&self) -> TxId {
        self.transactions.len() as TxId + 1
    }

    /// Allocates a new transaction id and records an `InProgress`
    /// transaction whose snapshot of in-progress ids is taken *after*
    /// allocation, so it never contains the new id itself.
    pub fn begin(&mut self, isolation: IsolationLevel) -> TxId {
        let id = self.next_id();
        let in_progress: HashSet<TxId> = self
            .transactions
            .iter()
            .filter(|tx| tx.status == Status::InProgress)
            .map(|tx| tx.id)
            .collect();
        log::debug!("begin txn {id} isolation={isolation:?} in_progress={in_progress:?}");
        self.transactions.push(Transaction::new(id, isolation, in_progress));
        id
    }

    pub fn get(&self, id: TxId) -> Option<&Transaction> {
        id.checked_sub(1).and_then(|i| self.transactions.get(i as usize))
    }

    pub fn get_mut(&mut self, id: TxId) -> Option<&mut Transaction> {
        id.checked_sub(1).and_then(|i| self.transactions.get_mut(i as usize))
    }

    /// Total over every id ever allocated; ids that were never allocated
    /// (a gap, or an id at/past `next_id()`) have no status and should be
    /// treated by callers as "not committed" — see `spec.md` §4.5.
    pub fn status(&self, id: TxId) -> Option<Status> {
        self.get(id).map(|tx| tx.status)
    }

    /// Records `key` as read by `id`'s transaction.
    pub fn record_read(&mut self, id: TxId, key: &str) -> Result<()> {
        let tx = self.get_mut(id).ok_or(Error::UnknownTransaction(id))?;
        tx.read_set.insert(key.to_string());
        Ok(())
    }

    /// Records `key` as written by `id`'s transaction.
    pub fn record_write(&mut self, id: TxId, key: &str) -> Result<()> {
        let tx = self.get_mut(id).ok_or(Error::UnknownTransaction(id))?;
        tx.write_set.insert(key.to_string());
        Ok(())
    }

    /// Runs the visibility predicate for `id`'s transaction against `v`.
    pub fn is_visible(&self, id: TxId, v: &crate::version::Version) -> Result<bool> {
        let tx = self.get(id).ok_or(Error::UnknownTransaction(id))?;
        Ok(visibility::is_visible(tx, v, self))
    }

    /// Sets `id`'s status, running the commit-time conflict detector first
    /// when transitioning to `Committed` under Snapshot or Serializable. On
    /// conflict the transaction is instead finished as `Aborted` — so the
    /// registry observes an abort, not a commit — and the corresponding
    /// error is returned to the caller (`spec.md` §4.1, §9).
    pub fn finish(&mut self, id: TxId, status: Status) -> Result<()> {
        let tx = self.get(id).ok_or(Error::UnknownTransaction(id))?.clone();
        debug_assert_eq!(tx.status, Status::InProgress, "Finish called on a terminal transaction");

        if status == Status::Committed && tx.isolation.conflict_checked() {
            if let Some(err) = conflict::detect(self, &tx) {
                log::warn!("txn {id} aborted on commit: {err}");
                // Re-entrant: finish as Aborted first so the abort is
                // observable to any subsequent visibility check before the
                // conflict error is surfaced to the caller (`spec.md` §9).
                self.finish(id, Status::Aborted)?;
                return Err(err);
            }
        }

        log::debug!("txn {id} -> {status:?}");
        self.set_status(id, status);
        Ok(())
    }

    fn set_status(&mut self, id: TxId, status: Status) {
        if let Some(tx) = self.get_mut(id) {
            tx.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_allocated_strictly_increasing() {
        let mut reg = TransactionRegistry::new();
        let a = reg.begin(IsolationLevel::Serializable);
        let b = reg.begin(IsolationLevel::Serializable);
        let c = reg.begin(IsolationLevel::Serializable);
        assert_eq!((a, b, c), (1, 2, 3));
    }

    #[test]
    fn snapshot_never_contains_its_own_id() {
        let mut reg = TransactionRegistry::new();
        let a = reg.begin(IsolationLevel::Snapshot);
        assert!(!reg.get(a).unwrap().in_progress.contains(&a));
    }

    #[test]
    fn snapshot_contains_concurrent_in_progress_ids() {
        let mut reg = TransactionRegistry::new();
        let a = reg.begin(IsolationLevel::Snapshot);
        let b = reg.begin(IsolationLevel::Snapshot);
        assert!(reg.get(b).unwrap().in_progress.contains(&a));
    }

    #[test]
    fn status_of_unallocated_id_is_none() {
        let reg = TransactionRegistry::new();
        assert_eq!(reg.status(1), None);
    }

    #[test]
    fn finish_transitions_status() {
        let mut reg = TransactionRegistry::new();
        let a = reg.begin(IsolationLevel::ReadCommitted);
        reg.finish(a, Status::Committed).unwrap();
        assert_eq!(reg.status(a), Some(Status::Committed));
    }

    #[test]
    fn disjoint_keys_do_not_conflict_under_snapshot() {
        let mut reg = TransactionRegistry::new();
        let a = reg.begin(IsolationLevel::Snapshot);
        let b = reg.begin(IsolationLevel::Snapshot);

        reg.record_write(a, "x").unwrap();
        reg.finish(a, Status::Committed).unwrap();

        reg.record_write(b, "y").unwrap();
        assert!(reg.finish(b, Status::Committed).is_ok());
    }

    #[test]
    fn overlapping_writes_conflict_under_snapshot_and_abort_the_committer() {
        let mut reg = TransactionRegistry::new();
        let a = reg.begin(IsolationLevel::Snapshot);
        let b = reg.begin(IsolationLevel::Snapshot);

        reg.record_write(a, "x").unwrap();
        reg.finish(a, Status::Committed).unwrap();

        reg.record_write(b, "x").unwrap();
        let err = reg.finish(b, Status::Committed).unwrap_err();
        assert_eq!(err, Error::WriteWriteConflict { key: "x".to_string(), other: a });
        assert_eq!(reg.status(b), Some(Status::Aborted));
    }
}
