use std::fmt;

use pathdb_core::{ClientError, Path};
use thiserror::Error;

/// The client operation an error belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Load,
    Save,
    Transaction,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Load => "load",
            Operation::Save => "save",
            Operation::Transaction => "transaction",
        })
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// The database client reported a failure.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The transaction finished without committing and without an error,
    /// which means the update function returned no value.
    #[error("update function returned no value; value not saved at '{path}'")]
    Aborted { path: Path },

    /// The database client dropped the completion callback without calling it.
    #[error("{operation} at '{path}' was dropped before it completed")]
    Cancelled { operation: Operation, path: Path },

    /// Converting between stored values and Rust types failed.
    #[error(transparent)]
    Convert(#[from] pathdb_core::Error),
}
