//! [`Group`] definitions.

use serde::{Deserialize, Serialize};

use super::{resource::define_id, Resource};

/// Permission group of users.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Group {
    /// ID of this [`Group`].
    pub id: Id,

    /// Name of this [`Group`].
    pub name: String,

    /// Permissions granted to members of this [`Group`].
    #[serde(default)]
    pub permissions: Vec<String>,
}

define_id!(Group);

impl Group {
    /// Path of the collection of [`Group`]s the signed-in user belongs to.
    pub const MEMBERSHIPS_PATH: &'static str = "/user/groups/";
}

impl Resource for Group {
    type Id = Id;

    const PATH: &'static str = "/groups/";

    const FILTERS: &'static [&'static str] = &["name"];
}
