//! [`Command`] for signing out.

use common::operations::Perform;
use serde_json::json;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::Session;
use crate::{
    infra::{transport, Transport},
    session::Status,
    Client, Error, Method,
};

use super::Command;

/// [`Command`] for signing out, revoking the refresh token of the
/// [`Session`] on the backend.
///
/// The [`Session`] is cleared even if the backend fails to revoke the token.
#[derive(Clone, Copy, Debug, Default)]
pub struct Logout;

impl<Tr> Command<Logout> for Client<Tr>
where
    Tr: Transport<
        Perform<transport::Request>,
        Ok = transport::Response,
        Err = Traced<transport::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(&self, _: Logout) -> Result<Self::Ok, Self::Err> {
        let Some(refresh) = self.session().refresh_token() else {
            self.session().clear(Status::SignedOut);
            return Ok(());
        };

        let url = self.url(&self.config().endpoints.logout, &[]);
        let body = json!({ "refresh": refresh.expose() });
        let result = self
            .send(Method::POST, url, Some(&body), self.session().access_token())
            .await
            .and_then(|response| {
                if response.status.is_success() {
                    Ok(())
                } else {
                    Err(tracerr::new!(Error::from_status(
                        response.status,
                        &response.body,
                    )))
                }
            });

        self.session().clear(Status::SignedOut);
        if let Err(e) = &result {
            log::warn!("backend failed to revoke the session: {e}");
        }
        result
    }
}
