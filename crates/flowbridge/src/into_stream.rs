//! Push-stream to pull-stream: lazy [`futures_core::Stream`] adapters.
//!
//! The push shapes deliver through callbacks; `into_stream` re-exposes them
//! as a poll-driven [`Stream`] the consumer pulls from with `StreamExt`
//! combinators. The adapter is cold: the upstream subscription is opened at
//! the first poll, not at construction, so an unpolled [`BridgeStream`] does
//! no work. Dropping it before the terminal disposes the subscription.

use crate::error::BridgeError;
use crate::stream::{
    MaybeObserver, MaybeStream, SignalObserver, SignalStream, SingleObserver, SingleStream,
    ValueObserver, ValueStream,
};
use crate::subscription::Subscription;
use futures_core::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

type Subscribe<T> =
    Box<dyn FnOnce(mpsc::UnboundedSender<Result<T, BridgeError>>) -> Subscription + Send>;

/// Poll-driven view of a push shape.
///
/// Items are `Result<T, BridgeError>`: zero or more `Ok` values in emission
/// order, then the end of the stream. An upstream error arrives as one final
/// `Err` item before the end. The pull side is decoupled from the push side
/// by an internal unbounded queue, so emitters never block on a slow
/// consumer.
pub struct BridgeStream<T> {
    subscribe: Option<Subscribe<T>>,
    drain: Option<Drain<T>>,
}

struct Drain<T> {
    rx: mpsc::UnboundedReceiver<Result<T, BridgeError>>,
    subscription: Subscription,
}

impl<T> BridgeStream<T> {
    fn new(subscribe: Subscribe<T>) -> Self {
        Self {
            subscribe: Some(subscribe),
            drain: None,
        }
    }
}

impl<T: Send + 'static> Stream for BridgeStream<T> {
    type Item = Result<T, BridgeError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        // First poll opens the upstream subscription.
        if let Some(subscribe) = this.subscribe.take() {
            let (tx, rx) = mpsc::unbounded_channel();
            let subscription = subscribe(tx);
            this.drain = Some(Drain { rx, subscription });
        }

        let Some(drain) = this.drain.as_mut() else {
            return Poll::Ready(None);
        };
        match drain.rx.poll_recv(cx) {
            Poll::Ready(Some(item)) => Poll::Ready(Some(item)),
            Poll::Ready(None) => {
                this.drain = None;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> Drop for BridgeStream<T> {
    fn drop(&mut self) {
        if let Some(drain) = &self.drain {
            drain.subscription.dispose();
        }
    }
}

impl<T: Send + 'static> ValueStream<T> {
    /// Re-exposes this stream as a poll-driven [`Stream`] of its values.
    pub fn into_stream(self) -> BridgeStream<T> {
        BridgeStream::new(Box::new(move |tx| self.subscribe(ValuePull { tx: Some(tx) })))
    }
}

impl<T: Send + 'static> SingleStream<T> {
    /// Poll-driven view: exactly one `Ok` item, or one `Err` item.
    pub fn into_stream(self) -> BridgeStream<T> {
        BridgeStream::new(Box::new(move |tx| self.subscribe(OnePull { tx: Some(tx) })))
    }
}

impl<T: Send + 'static> MaybeStream<T> {
    /// Poll-driven view: at most one `Ok` item, or one `Err` item.
    pub fn into_stream(self) -> BridgeStream<T> {
        BridgeStream::new(Box::new(move |tx| self.subscribe(OnePull { tx: Some(tx) })))
    }
}

impl SignalStream {
    /// Poll-driven view: ends with no items on completion, or yields one
    /// `Err` item on failure.
    pub fn into_stream(self) -> BridgeStream<()> {
        BridgeStream::new(Box::new(move |tx| self.subscribe(OnePull { tx: Some(tx) })))
    }
}

/// Forwards value-stream events into the pull queue. Dropping the sender
/// closes the queue, which the poll side reads as end-of-stream.
struct ValuePull<T> {
    tx: Option<mpsc::UnboundedSender<Result<T, BridgeError>>>,
}

impl<T: Send + 'static> ValueObserver<T> for ValuePull<T> {
    fn on_next(&mut self, value: T) {
        if let Some(tx) = self.tx.as_ref() {
            let _ = tx.send(Ok(value));
        }
    }

    fn on_complete(&mut self) {
        self.tx = None;
    }

    fn on_error(&mut self, error: BridgeError) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Err(error));
        }
    }
}

/// Forwards an at-most-one-value terminal into the pull queue.
struct OnePull<T> {
    tx: Option<mpsc::UnboundedSender<Result<T, BridgeError>>>,
}

impl<T> OnePull<T> {
    fn send(&mut self, item: Result<T, BridgeError>) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(item);
        }
    }
}

impl<T: Send + 'static> SingleObserver<T> for OnePull<T> {
    fn on_success(&mut self, value: T) {
        self.send(Ok(value));
    }
    fn on_error(&mut self, error: BridgeError) {
        self.send(Err(error));
    }
}

impl<T: Send + 'static> MaybeObserver<T> for OnePull<T> {
    fn on_success(&mut self, value: T) {
        self.send(Ok(value));
    }
    fn on_complete(&mut self) {
        self.tx = None;
    }
    fn on_error(&mut self, error: BridgeError) {
        self.send(Err(error));
    }
}

impl SignalObserver for OnePull<()> {
    fn on_complete(&mut self) {
        self.tx = None;
    }
    fn on_error(&mut self, error: BridgeError) {
        self.send(Err(error));
    }
}
