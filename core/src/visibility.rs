//! The per-isolation-level visibility predicate: a pure function of
//! `(transaction, version, registry)` deciding whether a reader running as
//! `transaction` may currently see `version` as live (`spec.md` §4.4).

use crate::registry::TransactionRegistry;
use crate::transaction::{IsolationLevel, Status, Transaction};
use crate::version::Version;

/// `S(id)` from the spec: the status of the transaction that created or
/// finished a version. Every `start`/`finish` field in the store refers to
/// a transaction that exists in the registry (invariant 2), so this only
/// returns `None` for the sentinel id `0`.
fn status_of(registry: &TransactionRegistry, id: u64) -> Option<Status> {
    if id == 0 {
        return None;
    }
    registry.status(id)
}

/// Returns whether `v` is visible to `tx`, per the rules for `tx`'s
/// isolation level.
pub fn is_visible(tx: &Transaction, v: &Version, registry: &TransactionRegistry) -> bool {
    match tx.isolation {
        IsolationLevel::ReadUncommitted => read_uncommitted(v),
        IsolationLevel::ReadCommitted => read_committed(tx, v, registry),
        _ if tx.isolation.uses_snapshot_predicate() => snapshot(tx, v, registry),
        _ => unreachable!(),
    }
}

/// Even an aborted writer's version is readable until overwritten.
fn read_uncommitted(v: &Version) -> bool {
    v.is_live()
}

fn read_committed(tx: &Transaction, v: &Version, registry: &TransactionRegistry) -> bool {
    let started_visibly = v.start == tx.id || status_of(registry, v.start) == Some(Status::Committed);
    if !started_visibly {
        return false;
    }
    if v.finish == tx.id {
        return false;
    }
    v.finish == 0 || status_of(registry, v.finish) != Some(Status::Committed)
}

/// Shared by Repeatable Read, Snapshot and Serializable: all three read
/// from the snapshot taken at `Begin`.
fn snapshot(tx: &Transaction, v: &Version, registry: &TransactionRegistry) -> bool {
    if v.start > tx.id {
        return false;
    }
    if tx.in_progress.contains(&v.start) {
        return false;
    }
    if v.start != tx.id && status_of(registry, v.start) != Some(Status::Committed) {
        return false;
    }
    if v.finish == tx.id {
        return false;
    }
    if v.finish != 0
        && v.finish < tx.id
        && status_of(registry, v.finish) == Some(Status::Committed)
        && !tx.in_progress.contains(&v.finish)
    {
        return false;
    }
    true
}
