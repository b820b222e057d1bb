//! Client of the Nachos admin API.
//!
//! [`Client`] is the single choke point for outbound calls: it attaches the
//! [`Session`] bearer token to every request and transparently refreshes an
//! expired [`Session`] once before giving up.
//! [`paged::PagedResource`] builds paginated, filtered and debounced list
//! views on top of it.
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod error;
pub mod infra;
#[cfg(test)]
mod mock;
pub mod paged;
pub mod query;
pub mod read;
pub mod request;
pub mod session;

use std::time::Duration;

use smart_default::SmartDefault;

pub use reqwest::Url;

pub use self::{
    command::Command,
    error::{Error, ErrorKind},
    query::Query,
    request::Method,
    session::Session,
};

/// [`Client`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL every request path is resolved against.
    pub base_url: Url,

    /// Maximum duration of a single transport call.
    pub timeout: Duration,

    /// Paths of the authentication [`Endpoints`].
    pub endpoints: Endpoints,
}

impl Config {
    /// Default [`Config::timeout`].
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a new [`Config`] for the provided `base_url` with default
    /// timeout and [`Endpoints`].
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Self::DEFAULT_TIMEOUT,
            endpoints: Endpoints::default(),
        }
    }
}

/// Paths of the authentication endpoints, relative to [`Config::base_url`].
#[derive(Clone, Debug, SmartDefault)]
pub struct Endpoints {
    /// Endpoint exchanging credentials for a pair of tokens.
    #[default("/auth/login/".to_owned())]
    pub login: String,

    /// Endpoint revoking a refresh token.
    #[default("/auth/logout/".to_owned())]
    pub logout: String,

    /// Endpoint exchanging a refresh token for a new access token.
    #[default("/auth/token/refresh/".to_owned())]
    pub refresh: String,
}

/// Client of the Nachos admin API.
///
/// Clones share the same [`Session`].
#[derive(Clone, Debug)]
pub struct Client<Tr> {
    /// Configuration of this [`Client`].
    config: Config,

    /// [`Transport`] performing requests of this [`Client`].
    ///
    /// [`Transport`]: infra::Transport
    transport: Tr,

    /// [`Session`] whose credentials this [`Client`] uses.
    session: Session,
}

impl<Tr> Client<Tr> {
    /// Creates a new [`Client`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, transport: Tr, session: Session) -> Self {
        Self {
            config,
            transport,
            session,
        }
    }

    /// Returns [`Config`] of this [`Client`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Transport`] of this [`Client`].
    ///
    /// [`Transport`]: infra::Transport
    #[must_use]
    pub fn transport(&self) -> &Tr {
        &self.transport
    }

    /// Returns [`Session`] of this [`Client`].
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }
}
