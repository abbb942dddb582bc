//! Commit-time conflict detection for Snapshot and Serializable
//! (`spec.md` §4.5). Only needs the registry: conflicts are decided purely
//! from tracked read/write sets, never from the store.

use crate::registry::TransactionRegistry;
use crate::transaction::{IsolationLevel, Status, Transaction};
use crate::Error;

/// Checks whether `t1` (about to commit) conflicts with any other
/// committed transaction that could have run concurrently with it. Returns
/// the first conflict found, or `None` if `t1` may commit cleanly.
///
/// "Concurrent with `t1`" is the union of `t1.in_progress` (active at `t1`'s
/// `Begin`) and every id allocated after `t1` up to the registry's current
/// counter. `t1`'s own id falls in neither set by construction, but even if
/// it did the comparison would be harmless: `t1` is still `InProgress` at
/// this point, never `Committed`, so it can't match any isolation's
/// condition.
pub(crate) fn detect(registry: &TransactionRegistry, t1: &Transaction) -> Option<Error> {
    let candidates = t1.in_progress.iter().copied().chain((t1.id + 1)..=registry.next_id());

    for id in candidates {
        let Some(t2) = registry.get(id) else {
            continue; // never allocated -- treat as non-existent
        };
        if t2.status != Status::Committed {
            continue;
        }

        match t1.isolation {
            IsolationLevel::Snapshot => {
                if let Some(key) = t1.write_set.intersection(&t2.write_set).next() {
                    return Some(Error::WriteWriteConflict { key: key.clone(), other: t2.id });
                }
            }
            IsolationLevel::Serializable => {
                let conflict_key = t1
                    .read_set
                    .intersection(&t2.write_set)
                    .next()
                    .or_else(|| t1.write_set.intersection(&t2.read_set).next());
                if let Some(key) = conflict_key {
                    return Some(Error::ReadWriteConflict { key: key.clone(), other: t2.id });
                }
            }
            IsolationLevel::ReadUncommitted | IsolationLevel::ReadCommitted | IsolationLevel::RepeatableRead => {
                // Finish() never calls detect() for these levels; nothing to do.
            }
        }
    }

    None
}
