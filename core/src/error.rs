use crate::transaction::TxId;

/// Errors produced by the engine.
///
/// Only [`Error::WriteWriteConflict`] and [`Error::ReadWriteConflict`] can
/// surface from a successful sequence of commands; the remaining variants
/// signal a usage error (a precondition in the command table was violated)
/// and are fatal to the calling session.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// Snapshot Isolation found an overlapping write set with a concurrent,
    /// already-committed transaction. The transaction has already been
    /// aborted by the time this error is returned.
    #[error("write-write conflict: key {key:?} was written by transaction {other}")]
    WriteWriteConflict { key: String, other: TxId },

    /// Serializable found an overlapping read/write set with a concurrent,
    /// already-committed transaction. The transaction has already been
    /// aborted by the time this error is returned.
    #[error("read-write conflict: key {key:?} conflicts with transaction {other}")]
    ReadWriteConflict { key: String, other: TxId },

    /// A data command (`Get`/`Set`/`Delete`) was issued with no transaction
    /// in progress on this connection.
    #[error("no transaction is in progress on this connection")]
    NoActiveTransaction,

    /// `Begin` was issued while a transaction was already in progress on
    /// this connection.
    #[error("a transaction is already in progress on this connection")]
    TransactionAlreadyActive,

    /// A transaction id was referenced that the registry never allocated.
    #[error("unknown transaction id {0}")]
    UnknownTransaction(TxId),
}

pub type Result<T> = std::result::Result<T, Error>;
