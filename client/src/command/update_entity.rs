//! [`Command`] for updating a [`Resource`] item.

use common::operations::{By, Perform, Update};
use serde_json::{Map, Value};
use tracerr::Traced;

use crate::{
    domain::Resource,
    infra::{transport, Transport},
    Client, Error, Method,
};

use super::Command;

/// Changed fields of a [`Resource`] item, by their names.
pub type Changes = Map<String, Value>;

/// [`Command`] for partially updating the [`Resource`] item with the
/// provided ID.
pub type UpdateEntity<E> = Update<By<E, (<E as Resource>::Id, Changes)>>;

impl<Tr, E> Command<UpdateEntity<E>> for Client<Tr>
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
        Update(by): UpdateEntity<E>,
    ) -> Result<Self::Ok, Self::Err> {
        let (id, changes) = by.into_inner();
        self.request(
            Method::PATCH,
            &E::item_path(&id),
            Some(&Value::Object(changes)),
            &[],
        )
        .await
        .map(drop)
        .map_err(tracerr::wrap!())
    }
}
