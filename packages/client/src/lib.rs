//! Futures over a callback-based realtime database client.
//!
//! [`PathClient`] wraps any [`DatabaseClient`](pathdb_core::DatabaseClient)
//! and exposes four helpers:
//!
//! - [`expand_path`](PathClient::expand_path) resolves a path spec (a
//!   slash-delimited string, a list of segments, or nothing for the root)
//!   to a [`Reference`](pathdb_core::Reference).
//! - [`load`](PathClient::load) reads a value once.
//! - [`save`](PathClient::save) applies a partial update.
//! - [`transaction`](PathClient::transaction) runs an optimistic
//!   read-modify-write and resolves with the committed value.
//!
//! Requests are sent to the client when a helper is called. The returned
//! futures are `Send + 'static` and settle when the client calls back.
//!
//! [`AsyncPathStore`] is the object-safe trait over the same operations and
//! [`TypedPathStore`] adds serde-typed `load_as`/`save_as` on top of it.

mod async_store;
mod client;
mod error;

pub use async_store::{AsyncPathStore, TypedPathStore};
pub use client::PathClient;
pub use error::{Error, Operation};
