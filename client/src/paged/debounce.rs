//! [`Debounce`] of rapidly changing inputs.

use std::{cell::RefCell, future::Future, time::Duration};

use tokio::{
    task::{self, JoinHandle},
    time,
};

/// Delays an action until no other one has been scheduled for a quiet
/// period.
///
/// Must be used inside a [`task::LocalSet`].
#[derive(Debug)]
pub struct Debounce {
    /// Quiet period to wait for.
    delay: Duration,

    /// Handle of the scheduled action, if any.
    pending: RefCell<Option<JoinHandle<()>>>,
}

impl Debounce {
    /// Creates a new [`Debounce`] with the provided quiet period.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: RefCell::new(None),
        }
    }

    /// Schedules the provided `action` to run once the quiet period elapses,
    /// replacing any previously scheduled one.
    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + 'static,
    {
        let delay = self.delay;
        let handle = task::spawn_local(async move {
            time::sleep(delay).await;
            action.await;
        });
        if let Some(previous) = self.pending.replace(Some(handle)) {
            previous.abort();
        }
    }

    /// Cancels the scheduled action, if any.
    ///
    /// Returns whether there was an action still waiting to run.
    pub fn cancel(&self) -> bool {
        self.pending.take().is_some_and(|handle| {
            let waiting = !handle.is_finished();
            handle.abort();
            waiting
        })
    }

    /// Indicates whether there is an action still waiting to run.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.borrow().as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debounce {
    fn drop(&mut self) {
        _ = self.cancel();
    }
}
