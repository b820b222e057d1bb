//! [`Transport`]-related definitions.

pub mod reqwest;

use derive_more::{Display, Error as StdError, From};
use http::{Method, StatusCode};
use secrecy::SecretString;
use serde_json::Value;

use crate::Url;

pub use self::reqwest::Reqwest;

/// Transport operation, performing a single HTTP [`Request`].
pub use common::Handler as Transport;

/// HTTP request to be performed by a [`Transport`].
#[derive(Debug)]
pub struct Request {
    /// HTTP method of this [`Request`].
    pub method: Method,

    /// Absolute URL of this [`Request`], including its query string.
    pub url: Url,

    /// Bearer token to authorize this [`Request`] with, if any.
    pub bearer: Option<SecretString>,

    /// JSON body of this [`Request`], if any.
    pub body: Option<Value>,
}

/// HTTP response received by a [`Transport`].
#[derive(Clone, Debug)]
pub struct Response {
    /// HTTP status of this [`Response`].
    pub status: StatusCode,

    /// Raw body of this [`Response`].
    pub body: Vec<u8>,
}

/// [`Transport`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Request`] didn't complete in time.
    #[display("Request timed out")]
    #[from(ignore)]
    Timeout,

    /// [`Reqwest`] error.
    #[display("`reqwest` failed: {_0}")]
    Reqwest(::reqwest::Error),
}
