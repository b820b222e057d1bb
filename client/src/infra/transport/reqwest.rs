//! [`reqwest`]-backed [`Transport`] implementation.

use std::time::Duration;

use common::operations::Perform;
use secrecy::ExposeSecret as _;
use tracerr::Traced;

use super::{Error, Request, Response, Transport};

/// [`Transport`] performing requests with a [`reqwest::Client`].
#[derive(Clone, Debug, Default)]
pub struct Reqwest(::reqwest::Client);

impl Reqwest {
    /// Creates a new [`Reqwest`] [`Transport`] aborting any request that
    /// takes longer than the provided `timeout`.
    ///
    /// # Errors
    ///
    /// If the underlying [`reqwest::Client`] fails to initialize its TLS
    /// backend.
    pub fn new(timeout: Duration) -> Result<Self, Traced<Error>> {
        ::reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map(Self)
            .map_err(tracerr::from_and_wrap!(=> Error))
    }
}

impl Transport<Perform<Request>> for Reqwest {
    type Ok = Response;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Perform(request): Perform<Request>,
    ) -> Result<Self::Ok, Self::Err> {
        let Request {
            method,
            url,
            bearer,
            body,
        } = request;

        let mut builder = self.0.request(method, url);
        if let Some(token) = &bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        Ok(Response {
            status,
            body: body.to_vec(),
        })
    }
}
