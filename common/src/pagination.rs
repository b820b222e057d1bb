//! Abstractions for page-number pagination.

use std::{num::NonZeroU32, ops::RangeInclusive};

use derive_more::{Display, Into};

/// 1-based number of a [`Page`].
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(transparent)
)]
pub struct Number(NonZeroU32);

impl Number {
    /// The first [`Page`].
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Creates a new [`Number`], if the provided `n` is positive.
    #[must_use]
    pub fn new(n: u32) -> Option<Self> {
        NonZeroU32::new(n).map(Self)
    }

    /// Creates a new [`Number`] clamped into `[1, total_pages]`.
    ///
    /// A `total_pages` of zero (an empty collection) still has the first
    /// page.
    #[must_use]
    pub fn clamped(n: u32, total_pages: u64) -> Self {
        let last = u32::try_from(total_pages.max(1)).unwrap_or(u32::MAX);
        Self::new(n.clamp(1, last)).unwrap_or(Self::FIRST)
    }

    /// Returns the numeric value of this [`Number`].
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for Number {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Number of items requested per [`Page`].
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(transparent)
)]
pub struct Size(NonZeroU32);

impl Size {
    /// [`Size`] used when nothing else is requested.
    pub const DEFAULT: Self = match NonZeroU32::new(10) {
        Some(n) => Self(n),
        None => unreachable!(),
    };

    /// Creates a new [`Size`], if the provided `n` is positive.
    #[must_use]
    pub fn new(n: u32) -> Option<Self> {
        NonZeroU32::new(n).map(Self)
    }

    /// Returns the numeric value of this [`Size`].
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Returns the number of pages needed to hold `total_count` items.
    #[must_use]
    pub fn total_pages(self, total_count: u64) -> u64 {
        total_count.div_ceil(u64::from(self.get()))
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A page of items of a remote collection.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Page<T> {
    /// Items on this [`Page`], in the order the backend returned them.
    pub items: Vec<T>,

    /// Total number of items in the whole collection.
    pub total_count: u64,

    /// [`Number`] of this [`Page`].
    pub current_page: Number,

    /// Total number of pages in the collection.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Creates a [`Page`] of a paginated collection holding `total_count`
    /// items in total.
    #[must_use]
    pub fn paginated(
        items: Vec<T>,
        total_count: u64,
        current_page: Number,
        size: Size,
    ) -> Self {
        Self {
            items,
            total_count,
            current_page,
            total_pages: size.total_pages(total_count),
        }
    }

    /// Creates a [`Page`] of a collection the backend didn't paginate: all
    /// the `items` live on the first and only page.
    #[must_use]
    pub fn unpaginated(items: Vec<T>) -> Self {
        Self {
            total_count: items.len() as u64,
            items,
            current_page: Number::FIRST,
            total_pages: 1,
        }
    }

    /// Indicates whether a page follows this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        u64::from(self.current_page.get()) < self.total_pages
    }

    /// Indicates whether a page precedes this one.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.current_page > Number::FIRST
    }

    /// Returns the 1-based positions of the first and the last items of this
    /// [`Page`] within the whole collection, if there are any.
    #[must_use]
    pub fn shown_range(&self, size: Size) -> Option<RangeInclusive<u64>> {
        let size = u64::from(size.get());
        let page = u64::from(self.current_page.get());
        let from = (page - 1) * size + 1;
        let to = (page * size).min(self.total_count);
        (from <= to).then_some(from..=to)
    }

    /// Returns at most `width` page numbers around the current one, as
    /// rendered by numbered pagination controls.
    #[must_use]
    pub fn window(&self, width: u32) -> RangeInclusive<u64> {
        if width == 0 || self.total_pages == 0 {
            return RangeInclusive::new(1, 0);
        }
        let width = u64::from(width);
        let current = u64::from(self.current_page.get());

        let mut start = current.saturating_sub(width / 2).max(1);
        let end = (start + width - 1).min(self.total_pages);
        if end - start + 1 < width {
            start = (end + 1).saturating_sub(width).max(1);
        }
        start..=end
    }

    /// Maps items of this [`Page`] with the provided function.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        let Self {
            items,
            total_count,
            current_page,
            total_pages,
        } = self;
        Page {
            items: items.into_iter().map(f).collect(),
            total_count,
            current_page,
            total_pages,
        }
    }
}
