//! [`User`] definitions.

use serde::{Deserialize, Serialize};

use super::{resource::define_id, Resource};

/// Registered user of the platform.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// Unique handle of this [`User`].
    pub username: String,

    /// Email of this [`User`].
    pub email: String,

    /// First name of this [`User`].
    #[serde(default)]
    pub first_name: String,

    /// Last name of this [`User`].
    #[serde(default)]
    pub last_name: String,

    /// Birth date of this [`User`], as formatted by the backend.
    pub birth_date: Option<String>,

    /// Indicator whether this [`User`] may sign in.
    #[serde(default)]
    pub is_active: bool,

    /// Indicator whether this [`User`] is a staff member.
    #[serde(default)]
    pub is_staff: bool,

    /// Indicator whether this [`User`] has all permissions.
    #[serde(default)]
    pub is_superuser: bool,

    /// Indicator whether this [`User`] confirmed the email.
    #[serde(default)]
    pub is_email_verified: bool,

    /// Number of movies this [`User`] watched.
    pub watched_no: Option<u64>,

    /// Date this [`User`] joined the platform, as formatted by the backend.
    pub join_date: Option<String>,

    /// URL of the profile picture of this [`User`].
    pub profile_picture: Option<String>,
}

define_id!(User);

/// Filter keys of the [`User`] collection.
pub mod filter {
    /// `true`/`false` filter by [`User::is_active`](super::User::is_active).
    pub const IS_ACTIVE: &str = "is_active";

    /// `true`/`false` filter by [`User::is_staff`](super::User::is_staff).
    pub const IS_STAFF: &str = "is_staff";

    /// `true`/`false` filter by
    /// [`User::is_superuser`](super::User::is_superuser).
    pub const IS_SUPERUSER: &str = "is_superuser";

    /// `true`/`false` filter by
    /// [`User::is_email_verified`](super::User::is_email_verified).
    pub const IS_EMAIL_VERIFIED: &str = "is_email_verified";

    /// Lower bound of [`User::birth_date`](super::User::birth_date).
    pub const BIRTH_DATE_AFTER: &str = "birth_date_after";

    /// Upper bound of [`User::birth_date`](super::User::birth_date).
    pub const BIRTH_DATE_BEFORE: &str = "birth_date_before";

    /// Lower bound of [`User::watched_no`](super::User::watched_no).
    pub const WATCHED_NO_MIN: &str = "watched_no_min";

    /// Upper bound of [`User::watched_no`](super::User::watched_no).
    pub const WATCHED_NO_MAX: &str = "watched_no_max";
}

impl Resource for User {
    type Id = Id;

    const PATH: &'static str = "/admin/users/";

    const FILTERS: &'static [&'static str] = &[
        filter::IS_ACTIVE,
        filter::IS_STAFF,
        filter::IS_SUPERUSER,
        filter::IS_EMAIL_VERIFIED,
        "email",
        "username",
        "first_name",
        "last_name",
        "birth_date",
        filter::BIRTH_DATE_AFTER,
        filter::BIRTH_DATE_BEFORE,
        filter::WATCHED_NO_MIN,
        filter::WATCHED_NO_MAX,
    ];
}
