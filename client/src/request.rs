//! Authorized requests of a [`Client`].

use common::operations::Perform;
use serde_json::Value;
use tracerr::Traced;
use tracing as log;

pub use http::Method;
use http::StatusCode;

use crate::{
    command::RefreshSession,
    infra::{transport, Transport},
    session::{self, AccessToken},
    Client, Error, Url,
};

impl<Tr> Client<Tr>
where
    Tr: Transport<
        Perform<transport::Request>,
        Ok = transport::Response,
        Err = Traced<transport::Error>,
    >,
{
    /// Performs an authorized request to the provided `path`, returning its
    /// parsed JSON body.
    ///
    /// If the backend rejects the current [`AccessToken`], the [`Session`]
    /// is refreshed once and the request is retried. Should the refresh fail
    /// (or the retried request be rejected again), the [`Session`] is cleared
    /// as [`Status::Expired`].
    ///
    /// Empty success bodies are returned as [`Value::Null`].
    ///
    /// # Errors
    ///
    /// See [`Error`] for the possible failures.
    ///
    /// [`Session`]: crate::Session
    /// [`Status::Expired`]: session::Status::Expired
    #[tracing::instrument(skip_all, fields(method = %method, path = path))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &[(String, String)],
    ) -> Result<Value, Traced<Error>> {
        let url = self.url(path, query);

        let token = self.session().access_token();
        let response = self
            .send(method.clone(), url.clone(), body, token.clone())
            .await
            .map_err(tracerr::wrap!())?;
        if response.status != StatusCode::UNAUTHORIZED {
            return parse(response).map_err(tracerr::wrap!());
        }

        let current = self.session().access_token();
        if current.is_some() && current != token {
            log::debug!("access token has been refreshed meanwhile, retrying");
        } else {
            log::debug!("access token rejected, refreshing session");
            if let Err(e) = self.execute(RefreshSession).await {
                log::warn!("failed to refresh session: {e}");
                return Err(self.expire());
            }
        }

        let response = self
            .send(method, url, body, self.session().access_token())
            .await
            .map_err(tracerr::wrap!())?;
        if response.status == StatusCode::UNAUTHORIZED {
            log::warn!("request rejected even after session refresh");
            return Err(self.expire());
        }
        parse(response).map_err(tracerr::wrap!())
    }

    /// Performs a single request with the provided `bearer` token, bounded
    /// by the configured timeout.
    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
        bearer: Option<AccessToken>,
    ) -> Result<transport::Response, Traced<Error>> {
        log::trace!("{method} {url}");

        let request = transport::Request {
            method,
            url,
            bearer: bearer.map(AccessToken::into_secret),
            body: body.cloned(),
        };
        tokio::time::timeout(
            self.config().timeout,
            self.transport().execute(Perform(request)),
        )
        .await
        .map_err(|_| tracerr::new!(Error::Network(transport::Error::Timeout)))?
        .map_err(tracerr::map_from_and_wrap!(=> Error))
    }

    /// Clears the [`Session`] as [`Status::Expired`].
    ///
    /// [`Session`]: crate::Session
    /// [`Status::Expired`]: session::Status::Expired
    fn expire(&self) -> Traced<Error> {
        self.session().clear(session::Status::Expired);
        tracerr::new!(Error::SessionExpired)
    }
}

impl<Tr> Client<Tr> {
    /// Resolves the provided `path` against the configured base URL,
    /// appending the `query` parameters in their order.
    #[must_use]
    pub fn url(&self, path: &str, query: &[(String, String)]) -> Url {
        let mut url = self.config().base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/'),
        );
        url.set_path(&joined);
        if !query.is_empty() {
            _ = url.query_pairs_mut().extend_pairs(query);
        }
        url
    }
}

/// Parses the body of the provided [`transport::Response`].
fn parse(response: transport::Response) -> Result<Value, Traced<Error>> {
    let transport::Response { status, body } = response;
    if !status.is_success() {
        return Err(tracerr::new!(Error::from_status(status, &body)));
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&body).map_err(|e| {
        tracerr::new!(Error::UnexpectedShape(format!(
            "response body is not JSON: {e}",
        )))
    })
}
