//! [`Storage`]-related definitions.

pub mod file;
pub mod memory;

use std::io;

use derive_more::{Debug, Display, Error as StdError, From};
use serde::{Deserialize, Serialize};
use tracerr::Traced;

pub use self::{file::File, memory::Memory};

/// Persistent storage of [`Persisted`] tokens, surviving restarts of the
/// application.
pub trait Storage: Debug {
    /// Loads the [`Persisted`] tokens, if any were saved.
    ///
    /// # Errors
    ///
    /// If the underlying storage can't be read.
    fn load(&self) -> Result<Option<Persisted>, Traced<Error>>;

    /// Saves the provided [`Persisted`] tokens, replacing the previous ones.
    ///
    /// # Errors
    ///
    /// If the underlying storage can't be written.
    fn save(&self, tokens: &Persisted) -> Result<(), Traced<Error>>;

    /// Removes any [`Persisted`] tokens.
    ///
    /// # Errors
    ///
    /// If the underlying storage can't be written.
    fn clear(&self) -> Result<(), Traced<Error>>;
}

/// Tokens as kept by a [`Storage`].
///
/// Either of them may be missing, if the [`Storage`] has been edited
/// externally.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Persisted {
    /// Access token.
    #[debug(skip)]
    pub access_token: Option<String>,

    /// Refresh token.
    #[debug(skip)]
    pub refresh_token: Option<String>,
}

/// [`Storage`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// I/O error.
    #[display("I/O operation failed: {_0}")]
    Io(io::Error),

    /// Tokens can't be (de)serialized.
    #[display("Malformed tokens: {_0}")]
    Json(serde_json::Error),
}
