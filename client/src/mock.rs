//! Scripted [`Transport`] for tests.

use std::{
    cell::RefCell, collections::VecDeque, io, rc::Rc, time::Duration,
};

use common::operations::Perform;
use http::{Method, StatusCode};
use secrecy::ExposeSecret as _;
use serde_json::Value;
use tracerr::Traced;

use crate::{
    infra::{
        storage::{self, Persisted},
        transport::{self, Request, Response},
        Storage, Transport,
    },
    Client, Config, Session, Url,
};

/// [`Transport`] replying with pre-scripted responses in order, and
/// recording every request it receives.
#[derive(Clone, Debug, Default)]
pub(crate) struct Scripted(Rc<RefCell<Script>>);

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<Reply>,
    requests: Vec<Recorded>,
}

#[derive(Debug)]
struct Reply {
    delay: Duration,
    status: StatusCode,
    body: Vec<u8>,
}

/// Request received by a [`Scripted`] transport.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Recorded {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) bearer: Option<String>,
    pub(crate) body: Option<Value>,
}

impl Scripted {
    pub(crate) fn reply(&self, status: u16, body: Value) {
        self.reply_after(Duration::ZERO, status, body);
    }

    pub(crate) fn reply_after(&self, delay: Duration, status: u16, body: Value) {
        self.push(delay, status, serde_json::to_vec(&body).unwrap());
    }

    pub(crate) fn reply_raw(&self, status: u16, body: &str) {
        self.push(Duration::ZERO, status, body.as_bytes().to_vec());
    }

    pub(crate) fn requests(&self) -> Vec<Recorded> {
        self.0.borrow().requests.clone()
    }

    fn push(&self, delay: Duration, status: u16, body: Vec<u8>) {
        self.0.borrow_mut().replies.push_back(Reply {
            delay,
            status: StatusCode::from_u16(status).unwrap(),
            body,
        });
    }
}

impl Transport<Perform<Request>> for Scripted {
    type Ok = Response;
    type Err = Traced<transport::Error>;

    async fn execute(
        &self,
        Perform(request): Perform<Request>,
    ) -> Result<Self::Ok, Self::Err> {
        let reply = {
            let mut script = self.0.borrow_mut();
            script.requests.push(Recorded {
                method: request.method,
                url: request.url.to_string(),
                bearer: request
                    .bearer
                    .as_ref()
                    .map(|t| t.expose_secret().to_owned()),
                body: request.body,
            });
            script.replies.pop_front().expect("unexpected request")
        };
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        Ok(Response {
            status: reply.status,
            body: reply.body,
        })
    }
}

/// [`Storage`] restoring the provided tokens, but failing every write.
#[derive(Debug, Default)]
pub(crate) struct Failing(Option<Persisted>);

impl Failing {
    pub(crate) fn with(access: &str, refresh: &str) -> Self {
        Self(Some(Persisted {
            access_token: Some(access.into()),
            refresh_token: Some(refresh.into()),
        }))
    }
}

impl Storage for Failing {
    fn load(&self) -> Result<Option<Persisted>, Traced<storage::Error>> {
        Ok(self.0.clone())
    }

    fn save(&self, _: &Persisted) -> Result<(), Traced<storage::Error>> {
        Err(tracerr::new!(storage::Error::Io(io::Error::other("disk full"))))
    }

    fn clear(&self) -> Result<(), Traced<storage::Error>> {
        Err(tracerr::new!(storage::Error::Io(io::Error::other("disk full"))))
    }
}

/// Creates a [`Client`] over the provided [`Scripted`] transport, with a
/// [`Session`] restored from the provided `(access, refresh)` tokens.
pub(crate) fn client(
    transport: &Scripted,
    tokens: Option<(&str, &str)>,
) -> (Client<Scripted>, storage::Memory) {
    let storage = storage::Memory::default();
    if let Some((access, refresh)) = tokens {
        storage
            .save(&Persisted {
                access_token: Some(access.into()),
                refresh_token: Some(refresh.into()),
            })
            .unwrap();
    }
    let session = Session::restore(storage.clone());

    (client_with(transport, session), storage)
}

/// Creates a [`Client`] over the provided [`Scripted`] transport and
/// [`Session`].
pub(crate) fn client_with(
    transport: &Scripted,
    session: Session,
) -> Client<Scripted> {
    let config = Config::new(Url::parse("https://api.test/v1").unwrap());
    Client::new(config, transport.clone(), session)
}
