//! [`Command`] for deleting a [`Resource`] item.

use common::operations::{By, Delete, Perform};
use tracerr::Traced;

use crate::{
    domain::Resource,
    infra::{transport, Transport},
    Client, Error, Method,
};

use super::Command;

/// [`Command`] for deleting the [`Resource`] item with the provided ID.
pub type DeleteEntity<E> = Delete<By<E, <E as Resource>::Id>>;

impl<Tr, E> Command<DeleteEntity<E>> for Client<Tr>
where
    Tr: Transport<
        Perform<transport::Request>,
        Ok = transport::Response,
        Err = Traced<transport::Error>,
    >,
    E: Resource,
{
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): DeleteEntity<E>,
    ) -> Result<Self::Ok, Self::Err> {
        self.request(Method::DELETE, &E::item_path(by.inner()), None, &[])
            .await
            .map(drop)
            .map_err(tracerr::wrap!())
    }
}
