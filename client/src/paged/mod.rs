//! [`PagedResource`] definitions.

pub mod debounce;
pub mod state;

use std::{
    borrow::Cow,
    cell::{Cell, RefCell},
    fmt, mem,
    rc::Rc,
    time::Duration,
};

use common::{
    operations::Perform,
    pagination::{self, Page},
};
use smart_default::SmartDefault;
use tokio::{sync::watch, task};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::Resource,
    infra::{transport, Transport},
    query::List,
    read::{query_spec, QuerySpec},
    Client, Error, ErrorKind,
};

pub use self::{
    debounce::Debounce,
    state::{ErrorInfo, FetchState, Status},
};

/// [`PagedResource`] configuration.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Initial [`pagination::Size`].
    pub page_size: pagination::Size,

    /// Quiet period after the last search input before it's applied.
    #[default(Duration::from_millis(500))]
    pub search_debounce: Duration,

    /// Filter value meaning "don't filter by this key".
    #[default(query_spec::NO_FILTER.to_owned())]
    pub no_filter: String,

    /// Indicator whether to fetch the first page right on creation.
    #[default(true)]
    pub auto_fetch: bool,
}

/// Controller of a paginated, filtered and searchable remote collection.
///
/// Turns page, filter and search intent into fetches of [`Page`]s, owning
/// exactly one current fetch at a time: a response arriving after a newer
/// fetch has been issued is discarded. Search input is debounced, while any
/// other change is fetched immediately.
///
/// Must be used inside a [`task::LocalSet`]. Clones control the same
/// collection.
pub struct PagedResource<E, Tr>(Rc<Inner<E, Tr>>);

/// Shared state of a [`PagedResource`].
struct Inner<E, Tr> {
    /// [`Client`] performing fetches.
    client: Client<Tr>,

    /// Path of the collection endpoint.
    path: Cow<'static, str>,

    /// [`Config`] of this [`PagedResource`].
    config: Config,

    /// Current [`Intent`] of the view.
    intent: RefCell<Intent>,

    /// Sequence number of the latest issued fetch.
    sequence: Cell<u64>,

    /// [`Debounce`] of search input.
    debounce: Debounce,

    /// Publisher of [`FetchState`] changes.
    state: watch::Sender<FetchState<E>>,
}

/// Query intent of a view.
#[derive(Debug, Default)]
struct Intent {
    /// [`QuerySpec`] reflecting every change made by the view.
    pending: QuerySpec,

    /// [`QuerySpec`] the latest fetch has been issued with.
    applied: QuerySpec,
}

impl Intent {
    /// Applies the [`Intent::pending`] [`QuerySpec`], except its search term,
    /// which is still settling.
    fn apply_settled(&mut self) {
        let search = mem::take(&mut self.applied.search);
        self.applied = QuerySpec {
            search,
            ..self.pending.clone()
        };
    }

    /// Applies the whole [`Intent::pending`] [`QuerySpec`].
    fn apply_all(&mut self) {
        self.applied = self.pending.clone();
    }
}

impl<E, Tr> PagedResource<E, Tr>
where
    E: Resource + Clone,
    Tr: Transport<
            Perform<transport::Request>,
            Ok = transport::Response,
            Err = Traced<transport::Error>,
        > + 'static,
{
    /// Creates a new [`PagedResource`] of the [`Resource::PATH`] collection.
    ///
    /// Starts fetching the first page right away, if [`Config::auto_fetch`]
    /// is enabled.
    #[must_use]
    pub fn new(client: Client<Tr>, config: Config) -> Self {
        Self::at(client, E::PATH, config)
    }

    /// Creates a new [`PagedResource`] of the collection at the provided
    /// `path`.
    ///
    /// Starts fetching the first page right away, if [`Config::auto_fetch`]
    /// is enabled.
    #[must_use]
    pub fn at(
        client: Client<Tr>,
        path: impl Into<Cow<'static, str>>,
        config: Config,
    ) -> Self {
        let spec = QuerySpec {
            page_size: config.page_size,
            ..QuerySpec::default()
        };
        Self::with_query(client, path, config, spec)
    }

    /// Creates a new [`PagedResource`] of the collection at the provided
    /// `path`, starting from the provided [`QuerySpec`] rather than the
    /// first unfiltered page.
    ///
    /// Starts fetching right away, if [`Config::auto_fetch`] is enabled.
    #[must_use]
    pub fn with_query(
        client: Client<Tr>,
        path: impl Into<Cow<'static, str>>,
        config: Config,
        spec: QuerySpec,
    ) -> Self {
        let (state, _) = watch::channel(FetchState::default());
        let this = Self(Rc::new(Inner {
            client,
            path: path.into(),
            debounce: Debounce::new(config.search_debounce),
            config,
            intent: RefCell::new(Intent {
                pending: spec.clone(),
                applied: spec,
            }),
            sequence: Cell::new(0),
            state,
        }));
        if this.0.config.auto_fetch {
            this.fetch();
        }
        this
    }

    /// Sets the `value` of the filter with the provided `key`, resetting the
    /// page to the first one.
    ///
    /// The [`query_spec::SEARCH`] key is debounced, while any other one is
    /// fetched immediately.
    pub fn set_filter(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if key == query_spec::SEARCH {
            self.set_search(value);
            return;
        }
        if !E::accepts_filter(&key) {
            log::debug!("`{}` doesn't declare `{key}` filter", self.0.path);
        }

        {
            let mut intent = self.0.intent.borrow_mut();
            intent.pending.page = pagination::Number::FIRST;
            _ = intent.pending.filters.set(key, value);
            intent.apply_settled();
        }
        self.fetch();
    }

    /// Sets the search term, resetting the page to the first one.
    ///
    /// The term is applied and fetched only once no other one has been set
    /// for the [`Config::search_debounce`] period.
    pub fn set_search(&self, value: impl Into<String>) {
        {
            let mut intent = self.0.intent.borrow_mut();
            intent.pending.page = pagination::Number::FIRST;
            intent.pending.search = value.into();
        }

        let this = self.clone();
        self.0.debounce.schedule(async move {
            this.0.intent.borrow_mut().apply_all();
            this.fetch();
        });
    }

    /// Moves to the page with the provided number `n`.
    ///
    /// The number is clamped into the pages of the latest fetched [`Page`].
    /// Other filters stay untouched.
    pub fn set_page(&self, n: u32) {
        let total_pages =
            self.0.state.borrow().result.as_ref().map(|p| p.total_pages);
        let page = match total_pages {
            Some(total) => pagination::Number::clamped(n, total),
            None => pagination::Number::new(n)
                .unwrap_or(pagination::Number::FIRST),
        };

        {
            let mut intent = self.0.intent.borrow_mut();
            intent.pending.page = page;
            intent.apply_settled();
        }
        self.fetch();
    }

    /// Sets the provided [`pagination::Size`], resetting the page to the
    /// first one.
    pub fn set_page_size(&self, size: pagination::Size) {
        {
            let mut intent = self.0.intent.borrow_mut();
            intent.pending.page_size = size;
            intent.pending.page = pagination::Number::FIRST;
            intent.apply_settled();
        }
        self.fetch();
    }

    /// Removes all filters and the search term, discarding any search input
    /// still settling, and fetches the first page.
    pub fn clear_filters(&self) {
        _ = self.0.debounce.cancel();
        {
            let mut intent = self.0.intent.borrow_mut();
            intent.pending.filters.clear();
            intent.pending.search.clear();
            intent.pending.page = pagination::Number::FIRST;
            intent.apply_all();
        }
        self.fetch();
    }

    /// Re-fetches with the currently applied [`QuerySpec`].
    ///
    /// Used after mutating items of the collection elsewhere.
    pub fn refresh(&self) {
        self.fetch();
    }

    /// Returns a snapshot of the current [`FetchState`].
    #[must_use]
    pub fn current_state(&self) -> FetchState<E> {
        self.0.state.borrow().clone()
    }

    /// Subscribes to [`FetchState`] changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FetchState<E>> {
        self.0.state.subscribe()
    }

    /// Returns the [`QuerySpec`] reflecting every change made so far,
    /// including search input still settling.
    #[must_use]
    pub fn query(&self) -> QuerySpec {
        self.0.intent.borrow().pending.clone()
    }

    /// Indicates whether search input is still settling.
    #[must_use]
    pub fn is_search_pending(&self) -> bool {
        self.0.debounce.is_pending()
    }

    /// Returns [`Client`] of this [`PagedResource`].
    #[must_use]
    pub fn client(&self) -> &Client<Tr> {
        &self.0.client
    }

    /// Issues a new fetch with the applied [`QuerySpec`], superseding any
    /// fetch in flight.
    fn fetch(&self) {
        let sequence = self.0.sequence.get() + 1;
        self.0.sequence.set(sequence);

        let spec = self.0.intent.borrow().applied.clone();
        log::debug!(sequence, page = %spec.page, "fetching `{}`", self.0.path);
        self.0.state.send_modify(|s| s.status = Status::Loading);

        let list = List::<E>::at(self.0.path.clone(), spec)
            .with_sentinel(self.0.config.no_filter.clone());
        let this = self.clone();
        drop(task::spawn_local(async move {
            let result = this.0.client.execute(list).await;
            this.apply(sequence, result);
        }));
    }

    /// Applies the `result` of the fetch with the provided `sequence`
    /// number, unless a newer fetch has been issued meanwhile.
    fn apply(&self, sequence: u64, result: Result<Page<E>, Traced<Error>>) {
        let latest = self.0.sequence.get();
        if sequence != latest {
            log::debug!(sequence, latest, "discarding superseded response");
            return;
        }

        match result {
            Ok(page) => self.0.state.send_modify(|s| {
                s.status = Status::Success;
                s.result = Some(page);
                s.error = None;
            }),
            Err(e) => {
                if e.as_ref().kind() == ErrorKind::SessionExpired {
                    log::warn!("session expired fetching `{}`", self.0.path);
                } else {
                    log::error!("failed to fetch `{}`: {e}", self.0.path);
                }
                let info = ErrorInfo::from(e.as_ref());
                self.0.state.send_modify(|s| {
                    s.status = Status::Error;
                    s.error = Some(info);
                });
            }
        }
    }
}

impl<E, Tr> Clone for PagedResource<E, Tr> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<E, Tr> fmt::Debug for PagedResource<E, Tr> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedResource")
            .field("path", &self.0.path)
            .field("intent", &self.0.intent)
            .field("sequence", &self.0.sequence.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod spec {
    use std::{future::Future, time::Duration};

    use common::pagination::{Number, Size};
    use serde_json::{json, Value};
    use tokio::{task::LocalSet, time};

    use crate::{
        domain::Movie,
        mock::{self, Scripted},
        read::QuerySpec,
        session, ErrorKind,
    };

    use super::{Config, PagedResource, Status};

    fn movies(ids: impl IntoIterator<Item = u64>) -> Value {
        ids.into_iter()
            .map(|id| json!({"id": id, "title": format!("Movie {id}")}))
            .collect()
    }

    fn ids(resource: &PagedResource<Movie, Scripted>) -> Vec<u64> {
        resource
            .current_state()
            .items()
            .iter()
            .map(|m| m.id.into())
            .collect()
    }

    fn manual() -> Config {
        Config {
            auto_fetch: false,
            ..Config::default()
        }
    }

    fn resource(
        transport: &Scripted,
        config: Config,
    ) -> PagedResource<Movie, Scripted> {
        let (client, _) = mock::client(transport, Some(("a", "r")));
        PagedResource::new(client, config)
    }

    /// Lets spawned fetches complete.
    async fn settle() {
        time::sleep(Duration::from_millis(1)).await;
    }

    async fn local(test: impl Future<Output = ()>) {
        LocalSet::new().run_until(test).await;
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_first_page_on_creation() {
        local(async {
            let transport = Scripted::default();
            transport.reply(200, json!({"results": movies(1..=3), "count": 3}));

            let resource = resource(&transport, Config::default());
            assert_eq!(resource.current_state().status, Status::Loading);

            settle().await;
            let state = resource.current_state();
            assert_eq!(state.status, Status::Success);
            assert_eq!(state.error, None);
            assert_eq!(ids(&resource), [1, 2, 3]);
            assert_eq!(state.result.unwrap().total_pages, 1);
            assert_eq!(
                transport.requests()[0].url,
                "https://api.test/v1/movies/?page=1&page_size=10",
            );
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn starts_from_query() {
        local(async {
            let transport = Scripted::default();
            transport.reply(200, json!({"results": movies([11]), "count": 11}));
            let (client, _) = mock::client(&transport, Some(("a", "r")));
            let spec = QuerySpec {
                page: Number::new(2).unwrap(),
                search: "alien".into(),
                ..QuerySpec::default()
            };

            let resource = PagedResource::<Movie, _>::with_query(
                client,
                "/movie/list/",
                Config::default(),
                spec.clone(),
            );
            settle().await;

            assert_eq!(resource.query(), spec);
            assert_eq!(ids(&resource), [11]);
            assert_eq!(
                transport.requests()[0].url,
                "https://api.test/v1/movie/list/\
                 ?page=2&page_size=10&search=alien",
            );
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn stays_idle_without_auto_fetch() {
        local(async {
            let transport = Scripted::default();

            let resource = resource(&transport, manual());
            settle().await;

            assert_eq!(resource.current_state().status, Status::Idle);
            assert!(transport.requests().is_empty());
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn debounces_search() {
        local(async {
            let transport = Scripted::default();
            transport.reply(200, movies([7]));
            let resource = resource(&transport, manual());

            for term in ["a", "al", "ali", "alie", "alien"] {
                resource.set_filter("search", term);
                time::sleep(Duration::from_millis(100)).await;
            }
            assert!(transport.requests().is_empty());
            assert!(resource.is_search_pending());

            time::sleep(Duration::from_millis(500)).await;
            let requests = transport.requests();
            assert_eq!(requests.len(), 1);
            assert_eq!(
                requests[0].url,
                "https://api.test/v1/movies/?page=1&page_size=10&search=alien",
            );
            assert_eq!(ids(&resource), [7]);
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn search_resets_pending_page() {
        local(async {
            let transport = Scripted::default();
            transport.reply(200, json!({"results": movies(21..=30), "count": 50}));
            transport.reply(200, movies([1]));
            let resource = resource(&transport, manual());

            resource.set_page(3);
            settle().await;
            assert_eq!(resource.query().page.get(), 3);

            resource.set_filter("search", "x");
            assert_eq!(resource.query().page.get(), 1);
            assert_eq!(resource.query().search, "x");
            assert_eq!(transport.requests().len(), 1);

            time::sleep(Duration::from_millis(600)).await;
            assert_eq!(
                transport.requests()[1].url,
                "https://api.test/v1/movies/?page=1&page_size=10&search=x",
            );
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_filters_immediately() {
        local(async {
            let transport = Scripted::default();
            transport.reply(200, movies([1]));
            transport.reply(200, movies([2]));
            let resource = resource(&transport, manual());

            resource.set_filter("rating", "all");
            settle().await;
            resource.set_filter("rating", " 5 ");
            settle().await;

            let requests = transport.requests();
            assert_eq!(
                requests[0].url,
                "https://api.test/v1/movies/?page=1&page_size=10",
            );
            assert_eq!(
                requests[1].url,
                "https://api.test/v1/movies/?page=1&page_size=10&rating=5",
            );
            assert_eq!(ids(&resource), [2]);
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn filters_keep_unsettled_search_out() {
        local(async {
            let transport = Scripted::default();
            transport.reply(200, movies([1]));
            transport.reply(200, movies([2]));
            let resource = resource(&transport, manual());

            resource.set_search("ali");
            resource.set_filter("title", "Alien");
            settle().await;
            assert_eq!(
                transport.requests()[0].url,
                "https://api.test/v1/movies/?page=1&page_size=10&title=Alien",
            );

            time::sleep(Duration::from_millis(600)).await;
            assert_eq!(
                transport.requests()[1].url,
                "https://api.test/v1/movies/\
                 ?page=1&page_size=10&search=ali&title=Alien",
            );
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn last_request_wins() {
        local(async {
            let transport = Scripted::default();
            transport.reply_after(Duration::from_millis(300), 200, movies([1]));
            transport.reply_after(Duration::from_millis(50), 200, movies([2]));
            let resource = resource(&transport, manual());

            resource.refresh();
            resource.refresh();

            time::sleep(Duration::from_millis(100)).await;
            assert_eq!(resource.current_state().status, Status::Success);
            assert_eq!(ids(&resource), [2]);

            time::sleep(Duration::from_millis(300)).await;
            assert_eq!(ids(&resource), [2]);
            assert_eq!(transport.requests().len(), 2);
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_items_on_failure() {
        local(async {
            let transport = Scripted::default();
            transport.reply(200, movies([1, 2]));
            transport.reply(200, json!({"unexpected": true}));
            let resource = resource(&transport, manual());

            resource.refresh();
            settle().await;
            resource.refresh();
            assert!(resource.current_state().is_loading());
            assert_eq!(ids(&resource), [1, 2]);
            settle().await;

            let state = resource.current_state();
            assert_eq!(state.status, Status::Error);
            assert_eq!(state.error.unwrap().kind, ErrorKind::UnexpectedShape);
            assert_eq!(ids(&resource), [1, 2]);
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn reports_failure_without_items() {
        local(async {
            let transport = Scripted::default();
            transport.reply(500, json!({"detail": "boom"}));
            let resource = resource(&transport, Config::default());

            settle().await;

            let state = resource.current_state();
            assert_eq!(state.status, Status::Error);
            assert_eq!(state.result, None);
            let error = state.error.unwrap();
            assert_eq!(error.kind, ErrorKind::ServerError);
            assert_eq!(error.message, "Server error. Please try again later.");
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn clamps_page() {
        local(async {
            let transport = Scripted::default();
            transport.reply(200, json!({"results": movies(1..=10), "count": 25}));
            transport.reply(200, json!({"results": movies(21..=25), "count": 25}));
            transport.reply(200, json!({"results": movies(1..=10), "count": 25}));
            let resource = resource(&transport, Config::default());
            settle().await;

            resource.set_page(9);
            settle().await;
            resource.set_page(0);
            settle().await;

            let requests = transport.requests();
            assert_eq!(
                requests[1].url,
                "https://api.test/v1/movies/?page=3&page_size=10",
            );
            assert_eq!(
                requests[2].url,
                "https://api.test/v1/movies/?page=1&page_size=10",
            );
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn page_size_resets_page() {
        local(async {
            let transport = Scripted::default();
            transport.reply(200, movies([1]));
            transport.reply(200, movies([1]));
            let resource = resource(&transport, manual());

            resource.set_page(2);
            settle().await;
            resource.set_page_size(Size::new(25).unwrap());
            settle().await;

            assert_eq!(
                transport.requests()[1].url,
                "https://api.test/v1/movies/?page=1&page_size=25",
            );
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn clears_filters_and_pending_search() {
        local(async {
            let transport = Scripted::default();
            transport.reply(200, movies([1]));
            transport.reply(200, movies([2]));
            let resource = resource(&transport, manual());

            resource.set_filter("rating", "5");
            settle().await;
            resource.set_search("ali");
            resource.clear_filters();
            time::sleep(Duration::from_secs(1)).await;

            let requests = transport.requests();
            assert_eq!(requests.len(), 2);
            assert_eq!(
                requests[1].url,
                "https://api.test/v1/movies/?page=1&page_size=10",
            );
            assert_eq!(resource.query().search, "");
            assert!(!resource.is_search_pending());
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn expires_session() {
        local(async {
            let transport = Scripted::default();
            transport.reply(401, json!({}));
            transport.reply(401, json!({}));
            let resource = resource(&transport, Config::default());
            let mut status = resource.client().session().subscribe();

            settle().await;

            let state = resource.current_state();
            assert_eq!(state.error.unwrap().kind, ErrorKind::SessionExpired);
            assert_eq!(*status.borrow_and_update(), session::Status::Expired);
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_state_changes() {
        local(async {
            let transport = Scripted::default();
            transport.reply(200, movies([4]));
            let resource = resource(&transport, manual());
            let mut state = resource.subscribe();

            resource.refresh();
            assert_eq!(state.borrow_and_update().status, Status::Loading);

            state.changed().await.unwrap();
            assert_eq!(state.borrow_and_update().status, Status::Success);
        })
        .await;
    }
}
