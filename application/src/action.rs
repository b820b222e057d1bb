//! Actions run by the [`Command`]s of the console.
//!
//! [`Command`]: crate::args::Command

use client::{
    command::{login, Login, Logout},
    domain::{Feedback, Group, Movie, Post, Resource, User},
    paged::{self, ErrorInfo, PagedResource, Status},
    read::{Filters, QuerySpec},
    Command as _,
};
use common::pagination;
use derive_more::{Display, Error as StdError, From};
use secrecy::SecretString;
use serde::Serialize;
use tracerr::Traced;
use tracing as log;

use crate::{args::Entity, Client};

/// Error of an action.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Signing in failed.
    #[display("Failed to sign in: {_0}")]
    Login(Traced<login::ExecutionError>),

    /// Backend failed to revoke the session.
    #[display("Failed to sign out: {_0}")]
    Logout(Traced<client::Error>),

    /// Fetching a collection failed.
    #[display("Failed to fetch: {}", _0.message)]
    #[from(ignore)]
    Fetch(#[error(not(source))] ErrorInfo),

    /// Fetched item can't be printed.
    #[display("Failed to print item: {_0}")]
    Print(serde_json::Error),
}

/// Signs in with the provided credentials.
///
/// # Errors
///
/// If the backend rejects the credentials or can't be reached.
pub async fn login(
    client: &Client,
    email: String,
    password: String,
) -> Result<(), Error> {
    client
        .execute(Login {
            email,
            password: SecretString::from(password),
        })
        .await?;
    Ok(())
}

/// Signs out, forgetting the session tokens even if the backend fails to
/// revoke them.
///
/// # Errors
///
/// If the backend fails to revoke the session.
pub async fn logout(client: &Client) -> Result<(), Error> {
    client.execute(Logout).await?;
    Ok(())
}

/// Parameters of the [`list()`] action.
#[derive(Clone, Debug)]
pub struct Listing {
    /// Requested page number.
    pub page: u32,

    /// Requested number of items per page, if other than configured.
    pub page_size: Option<u32>,

    /// Free-text search term.
    pub search: Option<String>,

    /// Entity-specific filters.
    pub filters: Vec<(String, String)>,
}

/// Prints the requested page of the [`Entity`] collection as JSON lines.
///
/// # Errors
///
/// If the page can't be fetched or printed.
pub async fn list(
    client: Client,
    config: paged::Config,
    entity: Entity,
    listing: Listing,
) -> Result<(), Error> {
    match entity {
        Entity::Users => list_of::<User>(client, config, listing).await,
        Entity::Groups => list_of::<Group>(client, config, listing).await,
        Entity::Movies => list_of::<Movie>(client, config, listing).await,
        Entity::Posts => list_of::<Post>(client, config, listing).await,
        Entity::Feedback => list_of::<Feedback>(client, config, listing).await,
    }
}

/// Drives a [`PagedResource`] of `E` items until the requested page is
/// fetched, and prints it.
async fn list_of<E>(
    client: Client,
    mut config: paged::Config,
    listing: Listing,
) -> Result<(), Error>
where
    E: Resource + Clone + Serialize,
{
    let Listing {
        page,
        page_size,
        search,
        filters,
    } = listing;

    if let Some(size) = page_size.and_then(pagination::Size::new) {
        config.page_size = size;
    }
    config.auto_fetch = true;
    for (key, _) in &filters {
        if !E::accepts_filter(key) {
            log::warn!("`{}` doesn't declare `{key}` filter", E::PATH);
        }
    }
    let spec = QuerySpec {
        page: pagination::Number::new(page).unwrap_or_default(),
        page_size: config.page_size,
        filters: filters.into_iter().collect::<Filters>(),
        search: search.unwrap_or_default(),
    };

    let resource =
        PagedResource::<E, _>::with_query(client, E::PATH, config, spec);
    let mut state = resource.subscribe();
    let state = state
        .wait_for(|s| matches!(s.status, Status::Success | Status::Error))
        .await
        .map(|s| s.clone())
        .unwrap_or_else(|_| resource.current_state());

    if let Some(error) = state.error {
        return Err(Error::Fetch(error));
    }
    let Some(page) = state.result else {
        return Ok(());
    };

    for item in &page.items {
        println!("{}", serde_json::to_string(item)?);
    }
    match page.shown_range(resource.query().page_size) {
        Some(range) => log::info!(
            "shown {}-{} of {} items, page {} of {}",
            range.start(),
            range.end(),
            page.total_count,
            page.current_page,
            page.total_pages,
        ),
        None => log::info!("no items found"),
    }

    Ok(())
}
