//! [`Command`] for signing in.

use common::operations::Perform;
use derive_more::{Display, Error, From};
use http::StatusCode;
use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::Session;
use crate::{
    infra::{transport, Transport},
    session::{AccessToken, RefreshToken, Tokens},
    Client, Method,
};

use super::Command;

/// [`Command`] for signing in with user credentials, establishing the
/// [`Session`].
#[derive(Debug)]
pub struct Login {
    /// Email of the user.
    pub email: String,

    /// Password of the user.
    pub password: SecretString,
}

/// Tokens issued by the login endpoint.
#[derive(Deserialize)]
struct Issued {
    access: Option<String>,
    refresh: Option<String>,
}

impl<Tr> Command<Login> for Client<Tr>
where
    Tr: Transport<
        Perform<transport::Request>,
        Ok = transport::Response,
        Err = Traced<transport::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: Login) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Login { email, password } = cmd;

        let url = self.url(&self.config().endpoints.login, &[]);
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let response = self
            .send(Method::POST, url, Some(&body), None)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        match response.status {
            s if s.is_success() => {}
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                return Err(tracerr::new!(E::WrongCredentials));
            }
            s => {
                return Err(tracerr::new!(E::Request(
                    crate::Error::from_status(s, &response.body)
                )));
            }
        }

        let Issued { access, refresh } = serde_json::from_slice(&response.body)
            .map_err(|e| {
                tracerr::new!(E::Request(crate::Error::UnexpectedShape(
                    e.to_string()
                )))
            })?;
        let (Some(access), Some(refresh)) = (access, refresh) else {
            return Err(tracerr::new!(E::MissingTokens));
        };

        self.session().establish(Tokens {
            access: AccessToken::new(access),
            refresh: RefreshToken::new(refresh),
        });
        log::info!("signed in as `{email}`");

        Ok(())
    }
}

/// Error of [`Login`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Request to the backend failed.
    #[display("Request failed: {_0}")]
    Request(crate::Error),

    /// Backend rejected the provided credentials.
    #[display("Wrong user credentials")]
    #[from(ignore)]
    WrongCredentials,

    /// Backend accepted the credentials, but didn't issue both tokens.
    #[display("Login response misses `access` or `refresh` token")]
    #[from(ignore)]
    MissingTokens,
}
