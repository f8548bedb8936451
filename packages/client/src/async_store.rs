//! Async store traits.
//!
//! `AsyncPathStore` is the object-safe seam over [`PathClient`]: code that
//! takes `&dyn AsyncPathStore` can be handed a fake in tests.
//! `TypedPathStore` layers serde on top of any `AsyncPathStore`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use pathdb_core::{from_value, to_value, Mapping, PathSpec, UpdateFunction, Value};

use crate::client::PathClient;
use crate::error::Error;

/// Async load, save and transaction on paths.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn AsyncPathStore>`.
#[async_trait]
pub trait AsyncPathStore: Send + Sync {
    /// Read the value at a path once (`Value::Null` when absent).
    async fn load(&self, path: PathSpec) -> Result<Value, Error>;

    /// Apply a partial update below a path.
    async fn save(&self, path: PathSpec, data: Mapping) -> Result<(), Error>;

    /// Run an optimistic transaction and return the committed value.
    async fn transaction(
        &self,
        path: PathSpec,
        update: UpdateFunction,
        apply_locally: bool,
    ) -> Result<Value, Error>;
}

#[async_trait]
impl AsyncPathStore for PathClient {
    async fn load(&self, path: PathSpec) -> Result<Value, Error> {
        PathClient::load(self, path).await
    }

    async fn save(&self, path: PathSpec, data: Mapping) -> Result<(), Error> {
        PathClient::save(self, path, data).await
    }

    async fn transaction(
        &self,
        path: PathSpec,
        update: UpdateFunction,
        apply_locally: bool,
    ) -> Result<Value, Error> {
        PathClient::transaction(self, path, update, apply_locally).await
    }
}

/// Typed access to an [`AsyncPathStore`] via serde.
///
/// Automatically implemented for every `AsyncPathStore`.
///
/// # Example
///
/// ```rust,ignore
/// use pathdb_client::{PathClient, TypedPathStore};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Profile {
///     name: String,
/// }
///
/// let profile: Option<Profile> = client.load_as("users/alice".into()).await?;
/// ```
#[async_trait]
pub trait TypedPathStore: AsyncPathStore {
    /// Read a value and deserialize it; `None` when nothing is stored.
    async fn load_as<T: DeserializeOwned + Send>(&self, path: PathSpec) -> Result<Option<T>, Error> {
        let value = self.load(path).await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(from_value(value)?))
    }

    /// Serialize `data` and save its fields as a partial update.
    ///
    /// `data` must serialize to an object; its fields become the update keys.
    async fn save_as<T: Serialize + Sync + ?Sized>(
        &self,
        path: PathSpec,
        data: &T,
    ) -> Result<(), Error> {
        match to_value(data)? {
            Value::Map(map) => self.save(path, map).await,
            other => Err(pathdb_core::Error::encode(format!(
                "expected an object to save, got {:?}",
                other
            ))
            .into()),
        }
    }
}

#[async_trait]
impl<S: AsyncPathStore + ?Sized> TypedPathStore for S {}
