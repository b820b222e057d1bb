//! [`Command`] for creating a [`User`].

use common::operations::{Insert, Perform};
use secrecy::{ExposeSecret as _, SecretString};
use serde_json::json;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    infra::{transport, Transport},
    Client, Error, Method,
};

use super::Command;

/// Role a new [`User`] is created with.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// Regular [`User`] of the platform.
    #[default]
    Regular,

    /// Staff member, allowed into the admin dashboard.
    Staff,

    /// [`User`] having all permissions.
    Superuser,
}

impl Role {
    /// Returns path of the endpoint creating [`User`]s with this [`Role`].
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Regular => "/admin/users/create/",
            Self::Staff => "/admin/users/create-staff/",
            Self::Superuser => "/admin/users/create-superuser/",
        }
    }
}

/// Form of a new [`User`].
#[derive(Debug)]
pub struct NewUser {
    /// [`Role`] of the new [`User`].
    pub role: Role,

    /// Email of the new [`User`].
    pub email: String,

    /// Unique handle of the new [`User`].
    pub username: String,

    /// Initial password of the new [`User`].
    pub password: SecretString,

    /// First name of the new [`User`].
    pub first_name: String,

    /// Last name of the new [`User`].
    pub last_name: String,

    /// Birth date of the new [`User`], in `YYYY-MM-DD` format.
    pub birth_date: Option<String>,
}

/// [`Command`] for creating a [`User`] from a [`NewUser`] form.
pub type CreateUser = Insert<NewUser>;

impl<Tr> Command<CreateUser> for Client<Tr>
where
    Tr: Transport<
        Perform<transport::Request>,
        Ok = transport::Response,
        Err = Traced<transport::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(user): CreateUser,
    ) -> Result<Self::Ok, Self::Err> {
        let NewUser {
            role,
            email,
            username,
            password,
            first_name,
            last_name,
            birth_date,
        } = user;

        let mut body = json!({
            "email": email,
            "username": username,
            "password": password.expose_secret(),
            "first_name": first_name,
            "last_name": last_name,
        });
        if let Some(date) = birth_date {
            body["birth_date"] = date.into();
        }

        _ = self
            .request(Method::POST, role.path(), Some(&body), &[])
            .await
            .map_err(tracerr::wrap!())?;
        log::info!("created {role} user `{username}`");

        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use common::operations::Insert;
    use serde_json::json;

    use crate::{
        mock::{self, Scripted},
        Command as _, ErrorKind,
    };

    use super::{NewUser, Role};

    fn new_user(role: Role) -> NewUser {
        NewUser {
            role,
            email: "morpheus@nachos.dev".into(),
            username: "morpheus".into(),
            password: "red-pill".to_owned().into(),
            first_name: "Morpheus".into(),
            last_name: String::new(),
            birth_date: Some("1961-07-30".into()),
        }
    }

    #[tokio::test]
    async fn posts_to_role_endpoint() {
        for (role, path) in [
            (Role::Regular, "/admin/users/create/"),
            (Role::Staff, "/admin/users/create-staff/"),
            (Role::Superuser, "/admin/users/create-superuser/"),
        ] {
            let transport = Scripted::default();
            transport.reply(201, json!({"id": 1}));
            let (client, _) = mock::client(&transport, Some(("a", "r")));

            client.execute(Insert(new_user(role))).await.unwrap();

            let request = &transport.requests()[0];
            assert_eq!(request.url, format!("https://api.test/v1{path}"));
            assert_eq!(
                request.body,
                Some(json!({
                    "email": "morpheus@nachos.dev",
                    "username": "morpheus",
                    "password": "red-pill",
                    "first_name": "Morpheus",
                    "last_name": "",
                    "birth_date": "1961-07-30",
                })),
            );
        }
    }

    #[tokio::test]
    async fn reports_validation_errors() {
        let transport = Scripted::default();
        transport.reply(400, json!({"email": ["already exists"]}));
        let (client, _) = mock::client(&transport, Some(("a", "r")));

        let err = client
            .execute(Insert(new_user(Role::Staff)))
            .await
            .unwrap_err();

        assert_eq!(err.as_ref().kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn parses_role() {
        assert_eq!("staff".parse::<Role>().unwrap(), Role::Staff);
        assert_eq!(Role::Superuser.to_string(), "superuser");
    }
}
