//! [`Feedback`] definitions.

use serde::{Deserialize, Serialize};

use super::{resource::define_id, Resource};

/// Feedback message left by a user.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Feedback {
    /// ID of this [`Feedback`].
    pub id: Id,

    /// Author of this [`Feedback`].
    pub user: String,

    /// Text of this [`Feedback`].
    pub message: String,

    /// Date this [`Feedback`] was left, as formatted by the backend.
    #[serde(default)]
    pub date: String,
}

define_id!(Feedback);

impl Resource for Feedback {
    type Id = Id;

    const PATH: &'static str = "/admin/feedback/";

    const FILTERS: &'static [&'static str] = &["user"];
}
