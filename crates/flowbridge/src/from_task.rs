//! Task→Stream: observe task completion and translate its terminal event.
//!
//! A tokio task terminates in one of three ways: its future returns a result,
//! it is aborted, or it panics. Each adapter maps those onto its stream
//! shape's vocabulary through the shared terminal remap: `Err` from the task
//! is an upstream failure, an abort is a cancellation, a panic is an upstream
//! failure carrying the join error.

use crate::config::TaskBridgeOptions;
use crate::error::{remap_cancel, BridgeError, Terminal};
use crate::stream::{MaybeStream, SignalStream, SingleStream, ValueStream};
use tokio::task::{JoinError, JoinHandle};

fn join_failure(error: JoinError) -> BridgeError {
    if error.is_cancelled() {
        BridgeError::cancelled("task aborted")
    } else {
        BridgeError::upstream(error)
    }
}

/// Signal-only shape: the task's success is pure completion.
///
/// If the subscriber disposes first and
/// [`TaskBridgeOptions::cancel_task_on_dispose`] is set (the default), the
/// task is aborted; otherwise it runs to completion with its result
/// discarded. Must be called within a tokio runtime.
pub fn task_to_signal<E>(
    handle: JoinHandle<Result<(), E>>,
    options: TaskBridgeOptions,
) -> SignalStream
where
    E: std::error::Error + Send + Sync + 'static,
{
    SignalStream::new(move |mut emitter| {
        let abort = handle.abort_handle();
        let canceller = emitter.canceller();
        tokio::spawn(async move {
            let terminal = match handle.await {
                Ok(Ok(())) => Terminal::Done,
                Ok(Err(cause)) => Terminal::Failed(BridgeError::upstream(cause)),
                Err(join) => Terminal::Failed(join_failure(join)),
            };
            emitter.terminal(remap_cancel(terminal, options.complete_on_cancel));
        });
        if options.cancel_task_on_dispose {
            canceller.set_cancel(move || abort.abort());
        }
    })
}

/// Exactly-one-value shape.
///
/// There is no `complete_on_cancel` here: this shape has no empty completion
/// to remap a cancellation into, so an aborted task always surfaces as an
/// error.
pub fn task_to_single<T, E>(
    handle: JoinHandle<Result<T, E>>,
    cancel_task_on_dispose: bool,
) -> SingleStream<T>
where
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    SingleStream::new(move |mut emitter| {
        let abort = handle.abort_handle();
        let canceller = emitter.canceller();
        tokio::spawn(async move {
            match handle.await {
                Ok(Ok(value)) => emitter.success(value),
                Ok(Err(cause)) => emitter.error(BridgeError::upstream(cause)),
                Err(join) => emitter.error(join_failure(join)),
            }
        });
        if cancel_task_on_dispose {
            canceller.set_cancel(move || abort.abort());
        }
    })
}

/// At-most-one-value shape: `Some` becomes a success, `None` an empty
/// completion.
pub fn task_to_maybe<T, E>(
    handle: JoinHandle<Result<Option<T>, E>>,
    options: TaskBridgeOptions,
) -> MaybeStream<T>
where
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    MaybeStream::new(move |mut emitter| {
        let abort = handle.abort_handle();
        let canceller = emitter.canceller();
        tokio::spawn(async move {
            match handle.await {
                Ok(Ok(Some(value))) => emitter.success(value),
                Ok(Ok(None)) => emitter.complete(),
                Ok(Err(cause)) => emitter.terminal(remap_cancel(
                    Terminal::Failed(BridgeError::upstream(cause)),
                    options.complete_on_cancel,
                )),
                Err(join) => emitter.terminal(remap_cancel(
                    Terminal::Failed(join_failure(join)),
                    options.complete_on_cancel,
                )),
            }
        });
        if options.cancel_task_on_dispose {
            canceller.set_cancel(move || abort.abort());
        }
    })
}

/// Same success behavior as [`task_to_maybe`], exposed through the
/// stream-of-many shape: zero or one `on_next`, then completion.
pub fn task_to_stream<T, E>(
    handle: JoinHandle<Result<Option<T>, E>>,
    options: TaskBridgeOptions,
) -> ValueStream<T>
where
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    ValueStream::new(move |mut emitter| {
        let abort = handle.abort_handle();
        let canceller = emitter.canceller();
        tokio::spawn(async move {
            match handle.await {
                Ok(Ok(value)) => {
                    if let Some(value) = value {
                        emitter.next(value);
                    }
                    emitter.complete();
                }
                Ok(Err(cause)) => emitter.terminal(remap_cancel(
                    Terminal::Failed(BridgeError::upstream(cause)),
                    options.complete_on_cancel,
                )),
                Err(join) => emitter.terminal(remap_cancel(
                    Terminal::Failed(join_failure(join)),
                    options.complete_on_cancel,
                )),
            }
        });
        if options.cancel_task_on_dispose {
            canceller.set_cancel(move || abort.abort());
        }
    })
}
