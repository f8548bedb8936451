//! References - a client bound to a location.

use std::fmt;
use std::sync::Arc;

use crate::{ClientError, DatabaseClient, Mapping, Path, Snapshot, TransactionResult, Value};

/// A handle on one location of a database.
///
/// References are cheap: they hold a shared client and a [`Path`]. Creating
/// one never touches the database and never fails; problems with the path
/// surface when an operation runs.
#[derive(Clone)]
pub struct Reference {
    client: Arc<dyn DatabaseClient>,
    path: Path,
}

impl Reference {
    /// The root reference of `client`.
    pub fn root(client: Arc<dyn DatabaseClient>) -> Self {
        Self::new(client, Path::root())
    }

    pub fn new(client: Arc<dyn DatabaseClient>, path: Path) -> Self {
        Self { client, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The last path component, or `None` at the root.
    pub fn key(&self) -> Option<&str> {
        self.path.key()
    }

    pub fn is_root(&self) -> bool {
        self.path.is_root()
    }

    pub fn client(&self) -> &Arc<dyn DatabaseClient> {
        &self.client
    }

    /// Descend to a relative, slash-delimited child location.
    #[must_use]
    pub fn child(&self, relative: &str) -> Reference {
        Reference {
            client: Arc::clone(&self.client),
            path: self.path.child(relative),
        }
    }

    /// The parent location, or `None` at the root.
    pub fn parent(&self) -> Option<Reference> {
        Some(Reference {
            client: Arc::clone(&self.client),
            path: self.path.parent()?,
        })
    }

    /// Read this location once.
    pub fn once_value(
        &self,
        callback: impl FnOnce(Result<Snapshot, ClientError>) + Send + 'static,
    ) {
        self.client.once_value(&self.path, Box::new(callback));
    }

    /// Apply a partial update below this location.
    pub fn update(
        &self,
        data: Mapping,
        callback: impl FnOnce(Result<(), ClientError>) + Send + 'static,
    ) {
        self.client.update(&self.path, data, Box::new(callback));
    }

    /// Run an optimistic transaction on this location.
    pub fn transaction(
        &self,
        update: impl FnMut(Value) -> Option<Value> + Send + 'static,
        callback: impl FnOnce(Result<TransactionResult, ClientError>) + Send + 'static,
        apply_locally: bool,
    ) {
        self.client.transaction(
            &self.path,
            Box::new(update),
            Box::new(callback),
            apply_locally,
        );
    }
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reference")
            .field("path", &self.path.to_string())
            .finish()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path)
    }
}
