//! pathdb: futures over a realtime database.
//!
//! A realtime database client reports completion through callbacks. This
//! crate pulls together the pieces that turn those callbacks into futures:
//!
//! - [`types`]: paths, values, snapshots and the client contract
//! - [`memory`]: an in-process database implementing that contract
//! - [`client`]: `PathClient` with `expand_path`, `load`, `save` and
//!   `transaction`
//!
//! # Example
//!
//! ```rust,ignore
//! use collection_literals::btree;
//! use pathdb::{MemoryDatabase, PathClient, Value};
//!
//! let client = PathClient::new(MemoryDatabase::new());
//!
//! client.save("users/alice", btree! { "visits".into() => Value::from(0) }).await?;
//! let visits = client
//!     .transaction(
//!         ["users", "alice", "visits"],
//!         |current| Some(Value::from(current.as_i64().unwrap_or(0) + 1)),
//!         false,
//!     )
//!     .await?;
//! assert_eq!(visits, Value::from(1));
//! ```

pub use pathdb_client as client;
pub use pathdb_core as types;
pub use pathdb_memory as memory;

pub use pathdb_client::{AsyncPathStore, Error, Operation, PathClient, TypedPathStore};
pub use pathdb_core::{ClientError, DatabaseClient, Mapping, Path, PathSpec, Reference, Value};
pub use pathdb_memory::{MemoryConfig, MemoryDatabase};

#[cfg(test)]
mod tests {
    use super::*;
    use collection_literals::btree;

    #[tokio::test]
    async fn umbrella_exports_cover_the_whole_flow() {
        let db = MemoryDatabase::new();
        let client = PathClient::new(db.clone());

        client
            .save(
                "users/alice",
                btree! { "visits".to_string() => Value::from(0) },
            )
            .await
            .unwrap();
        let visits = client
            .transaction(
                ["users", "alice", "visits"],
                |current| Some(Value::from(current.as_i64().unwrap_or(0) + 1)),
                false,
            )
            .await
            .unwrap();

        assert_eq!(visits, Value::from(1));
        assert_eq!(client.load("users/alice/visits").await.unwrap(), Value::from(1));
        assert_eq!(db.get(&Path::parse("users/alice/visits")), Value::from(1));
    }
}
