//! [`Session`] definitions.

use std::{cell::RefCell, rc::Rc};

use secrecy::{ExposeSecret as _, SecretString};
use tokio::sync::watch;
use tracing as log;

use crate::infra::{storage, Storage};

/// Short-lived token authorizing requests of a [`Session`].
#[derive(Debug)]
pub struct AccessToken(SecretString);

/// Long-lived token renewing an [`AccessToken`] of a [`Session`].
#[derive(Debug)]
pub struct RefreshToken(SecretString);

macro_rules! impl_token {
    ($token:ty) => {
        impl $token {
            /// Wraps the provided raw `token`.
            #[must_use]
            pub fn new(token: impl Into<String>) -> Self {
                Self(SecretString::from(token.into()))
            }

            /// Exposes the raw value of this token.
            #[must_use]
            pub fn expose(&self) -> &str {
                self.0.expose_secret()
            }

            /// Converts this token into its underlying [`SecretString`].
            #[must_use]
            pub fn into_secret(self) -> SecretString {
                self.0
            }
        }

        impl Clone for $token {
            fn clone(&self) -> Self {
                Self::new(self.expose())
            }
        }

        impl PartialEq for $token {
            fn eq(&self, other: &Self) -> bool {
                self.expose() == other.expose()
            }
        }

        impl Eq for $token {}
    };
}

impl_token!(AccessToken);
impl_token!(RefreshToken);

/// Pair of tokens of an authenticated [`Session`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tokens {
    /// [`AccessToken`] attached to requests.
    pub access: AccessToken,

    /// [`RefreshToken`] renewing the [`Tokens::access`].
    pub refresh: RefreshToken,
}

/// Authentication status of a [`Session`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    /// [`Session`] holds [`Tokens`].
    Authenticated,

    /// [`Session`] holds no [`Tokens`], because nobody signed in yet or the
    /// user signed out.
    SignedOut,

    /// [`Session`] has been dropped after the backend rejected its
    /// [`Tokens`], so the user must sign in again.
    Expired,
}

/// Authenticated session of a user, mirrored into a [`Storage`].
///
/// Clones share the same [`Tokens`], so a refresh performed by any of them
/// is observed by all.
#[derive(Clone, Debug)]
pub struct Session(Rc<Inner>);

/// Shared state of a [`Session`].
#[derive(Debug)]
struct Inner {
    /// Current [`Tokens`], if authenticated.
    tokens: RefCell<Option<Tokens>>,

    /// [`Storage`] the [`Tokens`] are persisted into.
    storage: Box<dyn Storage>,

    /// Publisher of [`Status`] changes.
    status: watch::Sender<Status>,
}

impl Session {
    /// Restores a [`Session`] from the provided [`Storage`].
    ///
    /// The [`Session`] is authenticated only if both tokens are present in
    /// the [`Storage`]. Unreadable [`Storage`] is treated as empty.
    #[must_use]
    pub fn restore(storage: impl Storage + 'static) -> Self {
        let tokens = match storage.load() {
            Ok(Some(storage::Persisted {
                access_token: Some(access),
                refresh_token: Some(refresh),
            })) => Some(Tokens {
                access: AccessToken::new(access),
                refresh: RefreshToken::new(refresh),
            }),
            Ok(_) => None,
            Err(e) => {
                log::warn!("failed to restore session tokens: {e}");
                None
            }
        };
        let status = if tokens.is_some() {
            Status::Authenticated
        } else {
            Status::SignedOut
        };
        let (status, _) = watch::channel(status);

        Self(Rc::new(Inner {
            tokens: RefCell::new(tokens),
            storage: Box::new(storage),
            status,
        }))
    }

    /// Indicates whether this [`Session`] holds [`Tokens`].
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.0.tokens.borrow().is_some()
    }

    /// Returns the current [`Status`] of this [`Session`].
    #[must_use]
    pub fn status(&self) -> Status {
        *self.0.status.borrow()
    }

    /// Subscribes to [`Status`] changes of this [`Session`].
    ///
    /// Views use it to redirect to the login screen once the [`Session`]
    /// becomes [`Status::Expired`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.0.status.subscribe()
    }

    /// Returns the current [`AccessToken`], if any.
    #[must_use]
    pub fn access_token(&self) -> Option<AccessToken> {
        self.0.tokens.borrow().as_ref().map(|t| t.access.clone())
    }

    /// Returns the current [`RefreshToken`], if any.
    #[must_use]
    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.0.tokens.borrow().as_ref().map(|t| t.refresh.clone())
    }

    /// Establishes this [`Session`] with the freshly issued [`Tokens`].
    pub(crate) fn establish(&self, tokens: Tokens) {
        drop(self.0.tokens.replace(Some(tokens)));
        self.persist();
        self.notify(Status::Authenticated);
    }

    /// Rotates [`Tokens`] of this [`Session`] after a refresh, keeping the
    /// current [`RefreshToken`] if the backend didn't issue a new one.
    ///
    /// Does nothing if this [`Session`] has been cleared meanwhile.
    pub(crate) fn rotate(
        &self,
        access: AccessToken,
        refresh: Option<RefreshToken>,
    ) {
        {
            let mut tokens = self.0.tokens.borrow_mut();
            let Some(tokens) = tokens.as_mut() else {
                log::debug!("session cleared before its refresh completed");
                return;
            };
            tokens.access = access;
            if let Some(refresh) = refresh {
                tokens.refresh = refresh;
            }
        }
        self.persist();
    }

    /// Clears this [`Session`] and its [`Storage`], moving it into the
    /// provided [`Status`].
    pub(crate) fn clear(&self, status: Status) {
        drop(self.0.tokens.take());
        if let Err(e) = self.0.storage.clear() {
            log::warn!("failed to clear persisted session tokens: {e}");
        }
        self.notify(status);
    }

    /// Mirrors the current [`Tokens`] into the [`Storage`].
    fn persist(&self) {
        let persisted = self
            .0
            .tokens
            .borrow()
            .as_ref()
            .map(|t| storage::Persisted {
                access_token: Some(t.access.expose().to_owned()),
                refresh_token: Some(t.refresh.expose().to_owned()),
            })
            .unwrap_or_default();
        if let Err(e) = self.0.storage.save(&persisted) {
            log::warn!("failed to persist session tokens: {e}");
        }
    }

    /// Publishes the provided [`Status`] to subscribers.
    fn notify(&self, status: Status) {
        let previous = self.0.status.send_replace(status);
        if previous != status {
            log::info!("session status changed: {previous:?} -> {status:?}");
        }
    }
}
