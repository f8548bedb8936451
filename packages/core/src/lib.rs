//! pathdb core: the vocabulary shared by clients and databases.
//!
//! - `Path`: normalized location in the hierarchical store
//! - `PathSpec`: how callers name a location (string or segment list)
//! - `Value`: JSON-shaped tree stored at a location
//! - `Snapshot`: the value at a location at one moment
//! - `DatabaseClient`: the callback-based client contract
//! - `Reference`: a client bound to a location
//!
//! # Example
//!
//! ```rust
//! use pathdb_core::{Path, PathSpec, Value};
//!
//! let path = PathSpec::from(["users", "alice", "name"]).to_path();
//! assert_eq!(path, Path::parse("users/alice/name"));
//!
//! let mut tree = Value::map();
//! tree.set(&path, Value::from("Alice"));
//! assert_eq!(tree.get(&Path::parse("users/alice/name")), Some(&Value::from("Alice")));
//! ```

mod client;
pub mod convert;
mod error;
pub mod path;
mod path_spec;
mod reference;
mod snapshot;
mod value;

pub use client::{
    DatabaseClient, ReadCallback, TransactionCallback, TransactionResult, UpdateFunction,
    WriteCallback,
};
pub use convert::{from_value, json_to_value, to_value, value_to_json};
pub use error::{ClientError, Error};
pub use path::{Path, PathError};
pub use path_spec::PathSpec;
pub use reference::Reference;
pub use snapshot::Snapshot;
pub use value::{Mapping, Value};
