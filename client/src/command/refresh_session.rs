//! [`Command`] for refreshing a [`Session`].

use common::operations::Perform;
use derive_more::{Display, Error, From};
use http::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::Session;
use crate::{
    infra::{transport, Transport},
    session::{AccessToken, RefreshToken},
    Client, Method,
};

use super::Command;

/// [`Command`] for exchanging the [`RefreshToken`] of the [`Session`] for a
/// new [`AccessToken`].
///
/// Rotates the [`RefreshToken`] too, if the backend issues a new one.
#[derive(Clone, Copy, Debug, Default)]
pub struct RefreshSession;

/// Tokens issued by the refresh endpoint.
#[derive(Deserialize)]
struct Refreshed {
    access: Option<String>,
    refresh: Option<String>,
}

impl<Tr> Command<RefreshSession> for Client<Tr>
where
    Tr: Transport<
        Perform<transport::Request>,
        Ok = transport::Response,
        Err = Traced<transport::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: RefreshSession) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let refresh = self
            .session()
            .refresh_token()
            .ok_or_else(|| tracerr::new!(E::NoRefreshToken))?;

        let url = self.url(&self.config().endpoints.refresh, &[]);
        let body = json!({ "refresh": refresh.expose() });
        let response = self
            .send(Method::POST, url, Some(&body), None)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !response.status.is_success() {
            return Err(tracerr::new!(E::Rejected(response.status)));
        }

        let Some((access, refresh)) =
            serde_json::from_slice::<Refreshed>(&response.body)
                .ok()
                .and_then(|r| Some((r.access?, r.refresh)))
        else {
            return Err(tracerr::new!(E::MissingAccessToken));
        };

        log::debug!("session refreshed");
        self.session().rotate(
            AccessToken::new(access),
            refresh.map(RefreshToken::new),
        );

        Ok(())
    }
}

/// Error of [`RefreshSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Session`] holds no [`RefreshToken`].
    #[display("No refresh token to refresh the session with")]
    #[from(ignore)]
    NoRefreshToken,

    /// Backend rejected the [`RefreshToken`].
    #[display("Refresh token rejected with `{_0}` status")]
    #[from(ignore)]
    Rejected(#[error(not(source))] StatusCode),

    /// Request to the backend failed.
    #[display("Request failed: {_0}")]
    Request(crate::Error),

    /// Backend didn't issue a new [`AccessToken`].
    #[display("Refresh response misses `access` token")]
    #[from(ignore)]
    MissingAccessToken,
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use crate::{
        mock::{self, Scripted},
        Command as _,
    };

    use super::{ExecutionError, RefreshSession};

    #[tokio::test]
    async fn requires_refresh_token() {
        let transport = Scripted::default();
        let (client, _) = mock::client(&transport, None);

        let err = client.execute(RefreshSession).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NoRefreshToken));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn requires_access_token_in_response() {
        let transport = Scripted::default();
        transport.reply(200, json!({"refresh": "r2"}));
        let (client, _) = mock::client(&transport, Some(("a", "r")));

        let err = client.execute(RefreshSession).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::MissingAccessToken));
        assert_eq!(client.session().access_token().unwrap().expose(), "a");
    }

    #[tokio::test]
    async fn reports_rejection() {
        let transport = Scripted::default();
        transport.reply(400, json!({"refresh": ["This field is required."]}));
        let (client, _) = mock::client(&transport, Some(("a", "r")));

        let err = client.execute(RefreshSession).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Rejected(s) if s.as_u16() == 400));
    }
}
