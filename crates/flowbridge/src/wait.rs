//! Stream→Task: suspension points that resolve at the stream's terminal.
//!
//! Each method subscribes with an observer that relays the terminal through a
//! oneshot, then awaits it. The subscription is wrapped in a guard that
//! disposes on drop: if the caller's future is cancelled (dropped) before the
//! terminal arrives, the upstream subscription is released synchronously,
//! before control returns to the cancelling caller. Disposing an
//! already-settled bridge is a no-op, so the guard needs no disarm step.

use crate::error::BridgeError;
use crate::stream::{
    MaybeObserver, MaybeStream, SignalObserver, SignalStream, SingleObserver, SingleStream,
    ValueObserver, ValueStream,
};
use crate::subscription::Subscription;
use tokio::sync::oneshot;

struct DisposeOnDrop(Subscription);

impl Drop for DisposeOnDrop {
    fn drop(&mut self) {
        self.0.dispose();
    }
}

impl SignalStream {
    /// Suspends until the stream terminates: `Ok(())` on completion, the
    /// stream's error on failure.
    pub async fn wait(self) -> Result<(), BridgeError> {
        let (tx, rx) = oneshot::channel();
        let _guard = DisposeOnDrop(self.subscribe(Relay { tx: Some(tx) }));
        rx.await.unwrap_or_else(|_| Err(dropped_without_terminal()))
    }
}

impl<T: Send + 'static> SingleStream<T> {
    /// Suspends until the stream delivers its one value.
    ///
    /// A source that terminates without ever emitting violates the
    /// exactly-one contract and resolves to [`BridgeError::MissingValue`],
    /// never a default value.
    pub async fn into_value(self) -> Result<T, BridgeError> {
        let (tx, rx) = oneshot::channel();
        let _guard = DisposeOnDrop(self.subscribe(Relay { tx: Some(tx) }));
        rx.await.unwrap_or_else(|_| Err(BridgeError::MissingValue))
    }
}

impl<T: Send + 'static> MaybeStream<T> {
    /// Suspends until the stream terminates: `Ok(Some(value))` if one arrived
    /// before completion, `Ok(None)` for an empty completion.
    pub async fn into_option(self) -> Result<Option<T>, BridgeError> {
        let (tx, rx) = oneshot::channel();
        let _guard = DisposeOnDrop(self.subscribe(Relay { tx: Some(tx) }));
        rx.await.unwrap_or_else(|_| Err(dropped_without_terminal()))
    }
}

impl<T: Send + 'static> ValueStream<T> {
    /// Suspends until completion and resolves with every value emitted, in
    /// order. All-or-nothing: on error the partial sequence is discarded and
    /// only the error surfaces.
    pub async fn collect(self) -> Result<Vec<T>, BridgeError> {
        let (tx, rx) = oneshot::channel();
        let _guard = DisposeOnDrop(self.subscribe(Collect {
            values: Vec::new(),
            tx: Some(tx),
        }));
        rx.await.unwrap_or_else(|_| Err(dropped_without_terminal()))
    }
}

/// The producer dropped its emitter without delivering any terminal.
fn dropped_without_terminal() -> BridgeError {
    BridgeError::cancelled("stream dropped without a terminal event")
}

/// Relays the terminal event of a value-less or single-valued shape.
struct Relay<R> {
    tx: Option<oneshot::Sender<R>>,
}

impl<R: Send> Relay<R> {
    fn send(&mut self, result: R) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(result);
        }
    }
}

impl SignalObserver for Relay<Result<(), BridgeError>> {
    fn on_complete(&mut self) {
        self.send(Ok(()));
    }
    fn on_error(&mut self, error: BridgeError) {
        self.send(Err(error));
    }
}

impl<T: Send> SingleObserver<T> for Relay<Result<T, BridgeError>> {
    fn on_success(&mut self, value: T) {
        self.send(Ok(value));
    }
    fn on_error(&mut self, error: BridgeError) {
        self.send(Err(error));
    }
}

impl<T: Send> MaybeObserver<T> for Relay<Result<Option<T>, BridgeError>> {
    fn on_success(&mut self, value: T) {
        self.send(Ok(Some(value)));
    }
    fn on_complete(&mut self) {
        self.send(Ok(None));
    }
    fn on_error(&mut self, error: BridgeError) {
        self.send(Err(error));
    }
}

/// Accumulates values and relays the whole ordered sequence at completion.
struct Collect<T> {
    values: Vec<T>,
    tx: Option<oneshot::Sender<Result<Vec<T>, BridgeError>>>,
}

impl<T: Send> ValueObserver<T> for Collect<T> {
    fn on_next(&mut self, value: T) {
        self.values.push(value);
    }

    fn on_complete(&mut self) {
        let values = std::mem::take(&mut self.values);
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Ok(values));
        }
    }

    fn on_error(&mut self, error: BridgeError) {
        self.values.clear();
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Err(error));
        }
    }
}
