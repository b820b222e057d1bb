//! [`Movie`] definitions.

use serde::{Deserialize, Serialize};

use super::{resource::define_id, Resource};

/// Movie of the catalog.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Movie {
    /// ID of this [`Movie`].
    pub id: Id,

    /// Title of this [`Movie`].
    pub title: String,

    /// Synopsis of this [`Movie`].
    #[serde(default)]
    pub description: String,

    /// Average rating of this [`Movie`], if anybody rated it.
    pub rating: Option<f64>,
}

define_id!(Movie);

impl Resource for Movie {
    type Id = Id;

    const PATH: &'static str = "/movies/";

    const FILTERS: &'static [&'static str] = &["title", "rating"];
}
