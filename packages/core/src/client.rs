//! The database client contract.
//!
//! A database client is callback-based: every operation takes a completion
//! callback and returns immediately. The callback is invoked at most once,
//! possibly before the operation call returns and possibly on another
//! thread. Higher layers turn these callbacks into futures.

use std::sync::Arc;

use crate::{ClientError, Mapping, Path, Snapshot, Value};

/// Completion callback for a one-time read.
pub type ReadCallback = Box<dyn FnOnce(Result<Snapshot, ClientError>) + Send>;

/// Completion callback for a multi-key update.
pub type WriteCallback = Box<dyn FnOnce(Result<(), ClientError>) + Send>;

/// Completion callback for an optimistic transaction.
pub type TransactionCallback = Box<dyn FnOnce(Result<TransactionResult, ClientError>) + Send>;

/// Computes the next value from the current one.
///
/// Returning `None` aborts the transaction. The client may call it several
/// times while it retries against concurrent writers.
pub type UpdateFunction = Box<dyn FnMut(Value) -> Option<Value> + Send>;

/// How an optimistic transaction finished.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionResult {
    /// False when the update function aborted.
    pub committed: bool,
    /// The value at the location once the transaction finished.
    pub snapshot: Snapshot,
}

/// A realtime hierarchical database client.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Arc<dyn DatabaseClient>`.
pub trait DatabaseClient: Send + Sync {
    /// Read the value at `path` once.
    fn once_value(&self, path: &Path, callback: ReadCallback);

    /// Apply a partial update below `path`.
    ///
    /// Each key of `data` is a child key or relative path; keys that are not
    /// mentioned keep their current value. A `Null` value deletes the child.
    fn update(&self, path: &Path, data: Mapping, callback: WriteCallback);

    /// Run an optimistic transaction at `path`.
    ///
    /// With `apply_locally` set, every value proposed by `update` is shown to
    /// local listeners before the commit succeeds.
    fn transaction(
        &self,
        path: &Path,
        update: UpdateFunction,
        callback: TransactionCallback,
        apply_locally: bool,
    );
}

impl<T: DatabaseClient + ?Sized> DatabaseClient for Arc<T> {
    fn once_value(&self, path: &Path, callback: ReadCallback) {
        self.as_ref().once_value(path, callback)
    }

    fn update(&self, path: &Path, data: Mapping, callback: WriteCallback) {
        self.as_ref().update(path, data, callback)
    }

    fn transaction(
        &self,
        path: &Path,
        update: UpdateFunction,
        callback: TransactionCallback,
        apply_locally: bool,
    ) {
        self.as_ref()
            .transaction(path, update, callback, apply_locally)
    }
}

impl<T: DatabaseClient + ?Sized> DatabaseClient for Box<T> {
    fn once_value(&self, path: &Path, callback: ReadCallback) {
        self.as_ref().once_value(path, callback)
    }

    fn update(&self, path: &Path, data: Mapping, callback: WriteCallback) {
        self.as_ref().update(path, data, callback)
    }

    fn transaction(
        &self,
        path: &Path,
        update: UpdateFunction,
        callback: TransactionCallback,
        apply_locally: bool,
    ) {
        self.as_ref()
            .transaction(path, update, callback, apply_locally)
    }
}
