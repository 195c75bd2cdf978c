//! One asynchronous decode, delivered through a callback or a deferred handle
use std::future::{Future, IntoFuture};
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;

use smol::channel::{self, Receiver, Sender};
use tracing::{trace, warn};

use crate::error::{DecodeError, Result};
use crate::models::DecodeResult;

/// Final outcome of one decode call
pub type Outcome = Result<DecodeResult>;

pub(crate) type Handler = Box<dyn FnOnce(Outcome) + Send + 'static>;

/// Where the outcome of a dispatched decode goes. Consumed on completion, so
/// each call settles exactly once.
pub(crate) enum Completion {
    Callback(Handler),
    Deferred(Sender<Outcome>),
}

impl Completion {
    pub(crate) fn complete(self, outcome: Outcome) {
        match self {
            Completion::Callback(handler) => {
                if panic::catch_unwind(AssertUnwindSafe(move || handler(outcome))).is_err() {
                    warn!("decode completion handler panicked");
                }
            }
            Completion::Deferred(sender) => {
                if sender.try_send(outcome).is_err() {
                    trace!("pending decode dropped before completion");
                }
            }
        }
    }
}

/// Deferred result of [`crate::Decoder::decode`].
///
/// Await it (it implements [`IntoFuture`]) or block on [`PendingDecode::wait`].
/// Dropping it does not cancel the decode; the outcome is discarded.
#[derive(Debug)]
#[must_use = "a pending decode does nothing unless awaited or waited on"]
pub struct PendingDecode {
    receiver: Receiver<Outcome>,
}

impl PendingDecode {
    pub(crate) fn channel() -> (Completion, PendingDecode) {
        let (sender, receiver) = channel::bounded(1);
        (Completion::Deferred(sender), PendingDecode { receiver })
    }

    /// Block the current thread until the decode settles
    pub fn wait(self) -> Outcome {
        self.receiver
            .recv_blocking()
            .unwrap_or(Err(DecodeError::WorkerLost))
    }
}

impl IntoFuture for PendingDecode {
    type Output = Outcome;
    type IntoFuture = Pin<Box<dyn Future<Output = Outcome> + Send + 'static>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            self.receiver
                .recv()
                .await
                .unwrap_or(Err(DecodeError::WorkerLost))
        })
    }
}
