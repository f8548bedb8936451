//! Future-returning helpers over a callback-based database client.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::oneshot;

use pathdb_core::{ClientError, DatabaseClient, Mapping, Path, PathSpec, Reference, Value};

use crate::error::{Error, Operation};

/// Loads, saves and transactions on paths, as futures.
///
/// Every helper accepts anything that converts into a [`PathSpec`]: a
/// slash-delimited string, a list of segments, `None` or `()` for the root.
///
/// The request is handed to the database client as soon as the helper is
/// called; the returned future only waits for the client's callback. The
/// futures own everything they need (`Send + 'static`), so they can be
/// spawned, joined, or raced against a timer.
///
/// # Example
///
/// ```rust,ignore
/// use pathdb_client::PathClient;
/// use pathdb_memory::MemoryDatabase;
///
/// let client = PathClient::new(MemoryDatabase::new());
/// client.save(["users", "alice"], btree! { "name".into() => "Alice".into() }).await?;
/// let name = client.load("users/alice/name").await?;
/// ```
#[derive(Clone)]
pub struct PathClient {
    client: Arc<dyn DatabaseClient>,
}

impl PathClient {
    /// Wrap a database client.
    pub fn new(client: impl DatabaseClient + 'static) -> Self {
        Self::from_arc(Arc::new(client))
    }

    /// Wrap an already shared database client.
    pub fn from_arc(client: Arc<dyn DatabaseClient>) -> Self {
        Self { client }
    }

    /// The wrapped database client.
    pub fn client(&self) -> &Arc<dyn DatabaseClient> {
        &self.client
    }

    /// Resolve a path spec to a reference.
    ///
    /// Non-empty segment lists are joined with `/`; empty strings, empty
    /// lists and `None` give the root reference. Never fails: invalid keys
    /// are reported by the operations that use the reference.
    pub fn expand_path(&self, path: impl Into<PathSpec>) -> Reference {
        Reference::new(Arc::clone(&self.client), path.into().to_path())
    }

    /// Read the value at `path` once.
    ///
    /// Resolves with `Value::Null` when nothing is stored there.
    pub fn load(
        &self,
        path: impl Into<PathSpec>,
    ) -> impl Future<Output = Result<Value, Error>> + Send + 'static {
        let reference = self.expand_path(path);
        tracing::debug!(path = %reference.path(), "load");

        let (tx, rx) = oneshot::channel();
        reference.once_value(move |result| {
            let _ = tx.send(result);
        });

        let path = reference.path().clone();
        async move {
            let snapshot = settle(rx, Operation::Load, &path).await?;
            Ok(snapshot.into_value())
        }
    }

    /// Apply a partial update below `path`.
    ///
    /// Keys in `data` that are not mentioned keep their current value; a
    /// `Null` value deletes that child.
    pub fn save(
        &self,
        path: impl Into<PathSpec>,
        data: Mapping,
    ) -> impl Future<Output = Result<(), Error>> + Send + 'static {
        let reference = self.expand_path(path);
        tracing::debug!(path = %reference.path(), keys = data.len(), "save");

        let (tx, rx) = oneshot::channel();
        reference.update(data, move |result| {
            let _ = tx.send(result);
        });

        let path = reference.path().clone();
        async move { settle(rx, Operation::Save, &path).await }
    }

    /// Run an optimistic transaction at `path`.
    ///
    /// `update` receives the current value (`Null` when empty) and returns
    /// the value to store, or `None` to abort. The database client may call
    /// it several times while it retries against concurrent writers. With
    /// `apply_locally`, local listeners see each proposed value before the
    /// commit.
    ///
    /// Resolves with the committed value. Fails with [`Error::Aborted`] when
    /// the update function aborted, or with the client's error.
    pub fn transaction<F>(
        &self,
        path: impl Into<PathSpec>,
        update: F,
        apply_locally: bool,
    ) -> impl Future<Output = Result<Value, Error>> + Send + 'static
    where
        F: FnMut(Value) -> Option<Value> + Send + 'static,
    {
        let reference = self.expand_path(path);
        tracing::debug!(path = %reference.path(), apply_locally, "transaction");

        let (tx, rx) = oneshot::channel();
        reference.transaction(
            update,
            move |result| {
                let _ = tx.send(result);
            },
            apply_locally,
        );

        let path = reference.path().clone();
        async move {
            let result = settle(rx, Operation::Transaction, &path).await?;
            if result.committed {
                Ok(result.snapshot.into_value())
            } else {
                tracing::debug!(path = %path, "transaction aborted");
                Err(Error::Aborted { path })
            }
        }
    }
}

/// Wait for a client callback and map its outcome.
async fn settle<T>(
    rx: oneshot::Receiver<Result<T, ClientError>>,
    operation: Operation,
    path: &Path,
) -> Result<T, Error> {
    match rx.await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => {
            tracing::debug!(%operation, path = %path, %error, "client reported failure");
            Err(Error::Client(error))
        }
        Err(_) => Err(Error::Cancelled {
            operation,
            path: path.clone(),
        }),
    }
}
