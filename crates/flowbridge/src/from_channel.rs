//! Channel→Stream: drain a cancellable channel into a push subscriber.
//!
//! The channel vocabulary is `Result<T, BridgeError>` items: `Ok` carries a
//! value, a received `Err` is a close-with-cause, and plain channel closure
//! is a normal close. This matches what [`crate::stream_to_channel`]
//! produces, so the two adapters compose.

use crate::config::DrainOptions;
use crate::error::{remap_cancel, BridgeError, Terminal};
use crate::stream::ValueStream;
use tokio::sync::{broadcast, mpsc};

/// Drains a channel into a push-stream.
///
/// On subscription a drain task starts: each `Ok` value is pushed to the
/// subscriber in receipt order, exactly once. Channel exhaustion signals
/// completion; a close cause signals an error, unless it is a cancellation
/// and [`DrainOptions::complete_on_cancel`] is set, in which case the stream
/// completes cleanly. Disposing the subscription aborts the drain task and
/// drops the receiver, so the channel's producer is not left running.
///
/// Must be subscribed within a tokio runtime.
pub fn channel_to_stream<T: Send + 'static>(
    mut rx: mpsc::Receiver<Result<T, BridgeError>>,
    options: DrainOptions,
) -> ValueStream<T> {
    ValueStream::new(move |mut emitter| {
        let canceller = emitter.canceller();
        let drain = tokio::spawn(async move {
            while let Some(item) = rx.recv().await {
                match item {
                    Ok(value) => emitter.next(value),
                    Err(cause) => {
                        emitter.terminal(remap_cancel(
                            Terminal::Failed(cause),
                            options.complete_on_cancel,
                        ));
                        return;
                    }
                }
            }
            emitter.complete();
        });
        // Aborting the drain task drops the receiver with it.
        canceller.set_cancel(move || drain.abort());
    })
}

/// Fan-out convenience: derives a private subscription from the broadcast
/// sender, then applies the same draining contract as [`channel_to_stream`].
///
/// A receiver that falls behind the broadcast capacity observes the overrun
/// as a terminal upstream error, never as a silent gap.
pub fn broadcast_to_stream<T: Clone + Send + 'static>(
    tx: &broadcast::Sender<Result<T, BridgeError>>,
    options: DrainOptions,
) -> ValueStream<T> {
    let mut rx = tx.subscribe();
    ValueStream::new(move |mut emitter| {
        let canceller = emitter.canceller();
        let drain = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(Ok(value)) => emitter.next(value),
                    Ok(Err(cause)) => {
                        emitter.terminal(remap_cancel(
                            Terminal::Failed(cause),
                            options.complete_on_cancel,
                        ));
                        return;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        emitter.complete();
                        return;
                    }
                    Err(lagged @ broadcast::error::RecvError::Lagged(_)) => {
                        emitter.error(BridgeError::upstream(lagged));
                        return;
                    }
                }
            }
        });
        canceller.set_cancel(move || drain.abort());
    })
}
