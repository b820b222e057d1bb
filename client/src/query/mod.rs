//! [`Query`] definition.

pub mod list;

use common::operations::{By, Perform, Select};
use tracerr::Traced;

use crate::{
    domain::Resource,
    infra::{transport, Transport},
    Client, Error, Method,
};

pub use self::list::List;

/// [`Query`] of the [`Client`].
pub use common::Handler as Query;

/// [`Query`] [`Select`]ing a single [`Resource`] item by its ID.
pub type ById<E> = Select<By<E, <E as Resource>::Id>>;

impl<Tr, E> Query<ById<E>> for Client<Tr>
where
    Tr: Transport<
        Perform<transport::Request>,
        Ok = transport::Response,
        Err = Traced<transport::Error>,
    >,
    E: Resource,
{
    type Ok = E;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): ById<E>,
    ) -> Result<Self::Ok, Self::Err> {
        let path = E::item_path(by.inner());
        let item = self
            .request(Method::GET, &path, None, &[])
            .await
            .map_err(tracerr::wrap!())?;
        serde_json::from_value(item).map_err(|e| {
            tracerr::new!(Error::UnexpectedShape(format!(
                "malformed `{path}` item: {e}",
            )))
        })
    }
}
