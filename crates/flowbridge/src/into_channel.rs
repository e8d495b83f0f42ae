//! Stream→Channel: forward push-stream emissions into tokio channels.

use crate::config::OverflowPolicy;
use crate::error::BridgeError;
use crate::stream::{ValueObserver, ValueStream};
use crate::subscription::Subscription;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc, oneshot};

/// Forwards a push-stream into a bounded mpsc channel.
///
/// The channel is created and its receiver returned immediately; the
/// subscription starts eagerly. Values are offered in arrival order. When the
/// buffer is full the [`OverflowPolicy`] decides between silently dropping
/// the value (the default best-effort offer) and closing the channel with
/// [`BridgeError::Overflow`].
///
/// Stream completion closes the channel with no cause; a stream error closes
/// it with a final `Err` item, whose delivery is guaranteed even under a full
/// buffer. Dropping or closing the receiver before the stream terminates
/// tears the subscription down so the upstream stops producing.
///
/// tokio has no rendezvous channel, so `capacity` is clamped to at least 1.
/// Must be called within a tokio runtime.
pub fn stream_to_channel<T: Send + 'static>(
    stream: ValueStream<T>,
    capacity: usize,
    policy: OverflowPolicy,
) -> mpsc::Receiver<Result<T, BridgeError>> {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let (done_tx, done_rx) = oneshot::channel();

    let subscription = stream.subscribe(ChannelForwarder {
        tx: Some(tx.clone()),
        done: Some(done_tx),
        policy,
        runtime: Handle::current(),
    });

    // Watch for the consumer going away; the forwarder reports its own end
    // through `done` so this task never outlives the bridge. Dispose on
    // either exit: releases the upstream after a consumer drop, a fail-fast
    // close, or a producer that dropped its emitter without a terminal. A
    // no-op when the stream already claimed its own terminal.
    tokio::spawn(async move {
        tokio::select! {
            () = tx.closed() => {}
            _ = done_rx => {}
        }
        subscription.dispose();
    });

    rx
}

struct ChannelForwarder<T> {
    tx: Option<mpsc::Sender<Result<T, BridgeError>>>,
    done: Option<oneshot::Sender<()>>,
    policy: OverflowPolicy,
    // Observer callbacks may run on non-runtime threads; the handle lets
    // `close_with` spawn its pending-send task regardless.
    runtime: Handle,
}

impl<T> ChannelForwarder<T> {
    /// Drops the sender so the channel closes once drained, and wakes the
    /// consumer watcher.
    fn finish(&mut self) {
        self.tx = None;
        if let Some(done) = self.done.take() {
            let _ = done.send(());
        }
    }
}

impl<T: Send + 'static> ChannelForwarder<T> {
    /// Closes the channel carrying a cause. If the buffer is full the cause
    /// is handed to a task that waits for space: a draining consumer always
    /// observes the failure.
    fn close_with(&mut self, cause: BridgeError) {
        if let Some(tx) = self.tx.take() {
            if let Err(mpsc::error::TrySendError::Full(item)) = tx.try_send(Err(cause)) {
                self.runtime.spawn(async move {
                    let _ = tx.send(item).await;
                });
            }
        }
        self.finish();
    }
}

impl<T: Send + 'static> ValueObserver<T> for ChannelForwarder<T> {
    fn on_next(&mut self, value: T) {
        let Some(tx) = self.tx.as_ref() else { return };
        match tx.try_send(Ok(value)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => match self.policy {
                OverflowPolicy::DropNewest => {}
                OverflowPolicy::FailFast => self.close_with(BridgeError::Overflow),
            },
            Err(mpsc::error::TrySendError::Closed(_)) => {
                // Consumer gone; the watcher task disposes the subscription.
                self.tx = None;
            }
        }
    }

    fn on_complete(&mut self) {
        self.finish();
    }

    fn on_error(&mut self, error: BridgeError) {
        self.close_with(error);
    }
}

impl<T> Drop for ChannelForwarder<T> {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Handle to a broadcast fan-out bridge created by [`stream_to_broadcast`].
///
/// One upstream subscription feeds any number of receivers opened through
/// [`BroadcastBridge::subscribe`]. The handle is the consumer side's
/// ownership of the bridge: dropping it, or calling [`BroadcastBridge::cancel`],
/// tears down the upstream subscription, after which receivers observe
/// channel closure.
pub struct BroadcastBridge<T> {
    // The forwarder owns the only sender, so receivers observe closure as
    // soon as the stream terminates; this stashed receiver exists purely to
    // mint new ones.
    rx: broadcast::Receiver<Result<T, BridgeError>>,
    subscription: Subscription,
}

impl<T: Clone + Send + 'static> BroadcastBridge<T> {
    /// Opens an independent receiver.
    ///
    /// Broadcast semantics apply: a receiver only observes values sent after
    /// it subscribed, and one that falls behind the capacity sees a lag error
    /// from tokio rather than silently losing its place in this bridge.
    pub fn subscribe(&self) -> broadcast::Receiver<Result<T, BridgeError>> {
        self.rx.resubscribe()
    }

    /// Cancels the bridge from the consumer side.
    pub fn cancel(&self) {
        self.subscription.dispose();
    }

    /// `true` once the upstream stream has terminated or the bridge was
    /// cancelled.
    pub fn is_settled(&self) -> bool {
        self.subscription.is_settled()
    }
}

impl<T> Drop for BroadcastBridge<T> {
    fn drop(&mut self) {
        self.subscription.dispose();
    }
}

/// Fans a push-stream out to multiple independent receivers through one
/// upstream subscription.
///
/// Values sent while no receiver is subscribed are dropped, per broadcast
/// semantics; terminal events likewise reach only currently-subscribed
/// receivers (followed by channel closure for everyone). Must be called
/// within a tokio runtime.
pub fn stream_to_broadcast<T: Clone + Send + 'static>(
    stream: ValueStream<T>,
    capacity: usize,
) -> BroadcastBridge<T> {
    let (tx, rx) = broadcast::channel(capacity.max(1));
    let subscription = stream.subscribe(BroadcastForwarder { tx: Some(tx) });
    BroadcastBridge { rx, subscription }
}

struct BroadcastForwarder<T> {
    tx: Option<broadcast::Sender<Result<T, BridgeError>>>,
}

impl<T: Clone + Send + 'static> ValueObserver<T> for BroadcastForwarder<T> {
    fn on_next(&mut self, value: T) {
        if let Some(tx) = self.tx.as_ref() {
            // Err here means no receiver is currently subscribed; the value
            // is dropped, matching broadcast fan-out semantics.
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
