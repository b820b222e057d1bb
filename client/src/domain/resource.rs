//! [`Resource`] definition.

use std::fmt;

use serde::de::DeserializeOwned;

/// Item of a remote collection, served by a paginated REST endpoint.
pub trait Resource: DeserializeOwned + 'static {
    /// Type of the item identifier.
    type Id: fmt::Display;

    /// Path of the collection endpoint, relative to the API base URL.
    ///
    /// Ends with a slash, as the backend requires.
    const PATH: &'static str;

    /// Entity-specific filter keys the collection endpoint accepts, besides
    /// `page`, `page_size` and `search`.
    const FILTERS: &'static [&'static str];

    /// Returns the path of a single item with the provided `id`.
    #[must_use]
    fn item_path(id: &Self::Id) -> String {
        format!("{}{id}/", Self::PATH)
    }

    /// Indicates whether the collection endpoint accepts the provided
    /// filter `key`.
    #[must_use]
    fn accepts_filter(key: &str) -> bool {
        key == crate::read::query_spec::SEARCH || Self::FILTERS.contains(&key)
    }
}

/// Defines an `Id` newtype of a [`Resource`].
macro_rules! define_id {
    ($resource:ident) => {
        #[doc = concat!("ID of a [`", stringify!($resource), "`].")]
        #[derive(
            Clone,
            Copy,
            Debug,
            derive_more::Display,
            Eq,
            derive_more::From,
            Hash,
            derive_more::Into,
            Ord,
            PartialEq,
            PartialOrd,
            serde::Deserialize,
            serde::Serialize,
        )]
        #[serde(transparent)]
        pub struct Id(u64);
    };
}

pub(crate) use define_id;
