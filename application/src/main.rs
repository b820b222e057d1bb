use std::{io, process::ExitCode, sync::OnceLock};

use application::{
    action::{self, Listing},
    args::Command,
    Args, Client, Config,
};
use client::{
    infra::{storage, Reqwest},
    session, Session,
};
use tokio::task::LocalSet;
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // `stdout` is reserved for the listed items.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO)
                            >= *meta.level()
                })),
        )
        .init();

    match LocalSet::new().run_until(start()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

async fn start() -> Result<(), ()> {
    let Args { config, command } = Args::parse().unwrap_or_else(|e| e.exit());

    let Config {
        api,
        session: session_config,
        list,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let timeout = api.timeout;
    let client_config = client::Config::try_from(api).map_err(|e| {
        log::error!("invalid API base URL: {e}");
    })?;
    let transport = Reqwest::new(timeout).map_err(|e| {
        log::error!("failed to initialize HTTP transport: {e}");
    })?;
    let session =
        Session::restore(storage::File::new(session_config.storage));
    let client = Client::new(client_config, transport, session);

    let result = match command {
        Command::Login { email, password } => {
            action::login(&client, email, password).await
        }
        Command::Logout => action::logout(&client).await,
        Command::List {
            entity,
            page,
            page_size,
            search,
            filters,
        } => {
            if !client.session().is_authenticated() {
                log::warn!("not signed in, the backend may reject the request");
            }
            action::list(
                client.clone(),
                list.into(),
                entity,
                Listing {
                    page,
                    page_size,
                    search,
                    filters,
                },
            )
            .await
        }
    };

    match client.session().status() {
        session::Status::Expired => {
            log::warn!("session expired, please `login` again");
        }
        status => log::debug!("session status: {status:?}"),
    }

    result.map_err(|e| {
        if let action::Error::Fetch(info) = &e {
            log::error!("{}", info.message);
        } else {
            log::error!("{e}");
        }
    })
}
