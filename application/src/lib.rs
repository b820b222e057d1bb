//! Application provides a command line console of the Nachos admin API.

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

pub mod action;
pub mod args;
pub mod config;

// Used in binary.
use tokio as _;
use tracing_subscriber as _;

pub use self::{action::Error, args::Args, config::Config};

/// [`Client`] with filled infrastructure dependencies.
///
/// [`Client`]: client::Client
pub type Client = client::Client<client::infra::Reqwest>;
