//! [`QuerySpec`] definitions.

use std::collections::{btree_map, BTreeMap};

use common::pagination;

/// Key of the free-text search filter.
pub const SEARCH: &str = "search";

/// Value of a filter meaning "don't filter by this key", unless configured
/// otherwise.
pub const NO_FILTER: &str = "all";

/// Snapshot of the intent a list request is built from.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QuerySpec {
    /// Requested [`pagination::Number`].
    pub page: pagination::Number,

    /// Requested [`pagination::Size`].
    pub page_size: pagination::Size,

    /// Entity-specific [`Filters`].
    pub filters: Filters,

    /// Free-text search term.
    pub search: String,
}

impl QuerySpec {
    /// Returns query parameters of this [`QuerySpec`] in the order they're
    /// sent: `page`, `page_size`, `search`, and then [`Filters`] by key.
    ///
    /// Values are trimmed. Blank ones are omitted, as are [`Filters`] equal
    /// to the provided `sentinel`.
    #[must_use]
    pub fn params(&self, sentinel: &str) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_owned(), self.page.to_string()),
            ("page_size".to_owned(), self.page_size.to_string()),
        ];
        let search = self.search.trim();
        if !search.is_empty() {
            params.push((SEARCH.to_owned(), search.to_owned()));
        }
        params.extend(self.filters.iter().filter_map(|(key, value)| {
            let value = value.trim();
            (!value.is_empty() && value != sentinel)
                .then(|| (key.to_owned(), value.to_owned()))
        }));
        params
    }
}

/// Entity-specific filters of a [`QuerySpec`], ordered by key.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
    /// Sets the `value` of the filter with the provided `key`, returning the
    /// previous one.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the value of the filter with the provided `key`, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Removes all the filters.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Indicates whether no filters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the filters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Filters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for Filters {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
