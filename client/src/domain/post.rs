//! [`Post`] definitions.

use serde::{Deserialize, Serialize};

use super::{resource::define_id, Resource};

/// Post published by a user, possibly in a group.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Post {
    /// ID of this [`Post`].
    pub id: Id,

    /// Text of this [`Post`].
    pub content: String,

    /// Date this [`Post`] was published, as formatted by the backend.
    #[serde(default)]
    pub add_date: String,

    /// Number of reactions to this [`Post`].
    #[serde(default)]
    pub reaction_no: u64,

    /// Number of comments to this [`Post`].
    #[serde(default)]
    pub comment_no: u64,

    /// Author of this [`Post`].
    pub author: Option<String>,

    /// Group this [`Post`] was published in.
    pub group: Option<String>,

    /// URL of the image attached to this [`Post`].
    pub image: Option<String>,
}

define_id!(Post);

/// Filter keys of the [`Post`] collection.
pub mod filter {
    /// Substring of [`Post::content`](super::Post::content).
    pub const CONTENT: &str = "content";

    /// Lower bound of [`Post::add_date`](super::Post::add_date).
    pub const ADD_DATE_AFTER: &str = "add_date_after";

    /// Upper bound of [`Post::add_date`](super::Post::add_date).
    pub const ADD_DATE_BEFORE: &str = "add_date_before";

    /// Lower bound of [`Post::reaction_no`](super::Post::reaction_no).
    pub const REACTION_NO_MIN: &str = "reaction_no_min";

    /// Upper bound of [`Post::reaction_no`](super::Post::reaction_no).
    pub const REACTION_NO_MAX: &str = "reaction_no_max";

    /// Lower bound of [`Post::comment_no`](super::Post::comment_no).
    pub const COMMENT_NO_MIN: &str = "comment_no_min";

    /// Upper bound of [`Post::comment_no`](super::Post::comment_no).
    pub const COMMENT_NO_MAX: &str = "comment_no_max";
}

impl Resource for Post {
    type Id = Id;

    const PATH: &'static str = "/admin/posts/";

    const FILTERS: &'static [&'static str] = &[
        filter::CONTENT,
        filter::ADD_DATE_AFTER,
        filter::ADD_DATE_BEFORE,
        filter::REACTION_NO_MIN,
        filter::REACTION_NO_MAX,
        filter::COMMENT_NO_MIN,
        filter::COMMENT_NO_MAX,
    ];
}
