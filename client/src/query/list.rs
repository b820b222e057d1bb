//! [`List`] [`Query`] definition.

use std::{borrow::Cow, marker::PhantomData};

use common::{operations::Perform, pagination::Page};
use derive_more::Debug;
use tracerr::Traced;

use crate::{
    domain::Resource,
    infra::{transport, Transport},
    read::{envelope, query_spec, QuerySpec},
    Client, Error, Method,
};

use super::Query;

/// [`Query`] fetching a [`Page`] of [`Resource`] items matching a
/// [`QuerySpec`].
#[derive(Debug)]
pub struct List<E> {
    /// Path of the collection endpoint.
    path: Cow<'static, str>,

    /// [`QuerySpec`] to build the request from.
    spec: QuerySpec,

    /// Filter value meaning "don't filter".
    sentinel: Cow<'static, str>,

    /// Type of the listed items.
    #[debug(skip)]
    _item: PhantomData<fn() -> E>,
}

impl<E: Resource> List<E> {
    /// Creates a new [`List`] [`Query`] of the [`Resource::PATH`]
    /// collection.
    #[must_use]
    pub fn new(spec: QuerySpec) -> Self {
        Self::at(E::PATH, spec)
    }
}

impl<E> List<E> {
    /// Creates a new [`List`] [`Query`] of the collection at the provided
    /// `path`, serving `E` items.
    #[must_use]
    pub fn at(path: impl Into<Cow<'static, str>>, spec: QuerySpec) -> Self {
        Self {
            path: path.into(),
            spec,
            sentinel: Cow::Borrowed(query_spec::NO_FILTER),
            _item: PhantomData,
        }
    }

    /// Sets the filter value meaning "don't filter", replacing the default
    /// [`query_spec::NO_FILTER`].
    #[must_use]
    pub fn with_sentinel(
        mut self,
        sentinel: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    /// Returns [`QuerySpec`] of this [`List`] [`Query`].
    #[must_use]
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }
}

impl<Tr, E> Query<List<E>> for Client<Tr>
where
    Tr: Transport<
        Perform<transport::Request>,
        Ok = transport::Response,
        Err = Traced<transport::Error>,
    >,
    E: Resource,
{
    type Ok = Page<E>;
    type Err = Traced<Error>;

    async fn execute(&self, list: List<E>) -> Result<Self::Ok, Self::Err> {
        let List {
            path,
            spec,
            sentinel,
            ..
        } = list;

        let payload = self
            .request(Method::GET, &path, None, &spec.params(&sentinel))
            .await
            .map_err(tracerr::wrap!())?;
        envelope::normalize(payload, spec.page, spec.page_size)
            .map_err(tracerr::wrap!())
    }
}
