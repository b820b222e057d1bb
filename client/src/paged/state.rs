//! [`FetchState`] definitions.

use common::pagination::Page;

use crate::{Error, ErrorKind};

/// Status of a [`PagedResource`] fetch.
///
/// [`PagedResource`]: super::PagedResource
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Status {
    /// Nothing has been fetched yet.
    #[default]
    Idle,

    /// Fetch is in flight.
    Loading,

    /// The latest fetch succeeded.
    Success,

    /// The latest fetch failed.
    Error,
}

/// Description of a failed fetch, suitable for rendering.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ErrorInfo {
    /// [`ErrorKind`] of the failure.
    pub kind: ErrorKind,

    /// Human-readable message of the failure.
    pub message: String,
}

impl From<&Error> for ErrorInfo {
    fn from(e: &Error) -> Self {
        Self {
            kind: e.kind(),
            message: e.user_message(),
        }
    }
}

/// State of a [`PagedResource`] exposed to views.
///
/// [`PagedResource`]: super::PagedResource
#[derive(Clone, Debug, PartialEq)]
pub struct FetchState<T> {
    /// [`Status`] of the latest fetch.
    pub status: Status,

    /// [`Page`] of the latest successful fetch.
    ///
    /// Kept while a newer fetch is loading or has failed, so the view keeps
    /// showing the previous items.
    pub result: Option<Page<T>>,

    /// [`ErrorInfo`] of the latest fetch, if it failed.
    pub error: Option<ErrorInfo>,
}

impl<T> FetchState<T> {
    /// Indicates whether a fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    /// Returns items of the latest successful fetch, if any.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.result
            .as_ref()
            .map(|p| p.items.as_slice())
            .unwrap_or_default()
    }

    /// Returns total count of items of the latest successful fetch.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.result.as_ref().map_or(0, |p| p.total_count)
    }
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            result: None,
            error: None,
        }
    }
}
