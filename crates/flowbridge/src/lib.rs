//! Bidirectional adapters between callback push-streams and tokio tasks/channels.
//!
//! A push-stream delivers values to a subscriber through callbacks and ends
//! in exactly one terminal event; tokio offers cooperative tasks
//! (`JoinHandle`) and channels (`mpsc`, `broadcast`). This crate translates
//! completion, error, and cancellation across the two models without
//! scheduling any work or transforming any value:
//!
//! - **Channel→Stream**: [`channel_to_stream`], [`broadcast_to_stream`]
//! - **Task→Stream**: [`task_to_signal`], [`task_to_single`],
//!   [`task_to_maybe`], [`task_to_stream`]
//! - **Stream→Channel**: [`stream_to_channel`], [`stream_to_broadcast`]
//! - **Stream→Task**: [`SignalStream::wait`], [`SingleStream::into_value`],
//!   [`MaybeStream::into_option`], [`ValueStream::collect`]
//! - **Stream→pull-stream**: `into_stream` on each shape, yielding a lazy
//!   poll-driven [`BridgeStream`]
//!
//! # Guarantees
//!
//! - **Exactly-once terminal**: every bridge delivers at most one terminal
//!   event downstream, arbitrated by an atomic claim, even when an upstream
//!   terminal and a downstream dispose race from different threads.
//! - **Unconditional release**: whichever side settles the bridge runs the
//!   registered cancel hook, so the upstream resource (task, channel
//!   receiver, subscription) is released on every exit path.
//! - **Order preservation**: sequence adapters deliver values in exactly the
//!   order received; no reordering, batching, or duplication.
//!
//! # Example
//!
//! ```no_run
//! use flowbridge::{channel_to_stream, DrainOptions};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (tx, rx) = mpsc::channel(8);
//!     for s in ["1", "2", "3"] {
//!         tx.send(Ok(s.to_owned())).await.unwrap();
//!     }
//!     drop(tx); // close normally
//!
//!     let stream = channel_to_stream(rx, DrainOptions::default());
//!     assert_eq!(stream.collect().await.unwrap(), vec!["1", "2", "3"]);
//! }
//! ```

mod config;
mod error;
mod from_channel;
mod from_task;
mod gate;
mod into_channel;
mod into_stream;
mod invariants;
mod stream;
mod subscription;
mod wait;

pub use config::{DrainOptions, OverflowPolicy, TaskBridgeOptions};
pub use error::{BridgeError, Cause};
pub use from_channel::{broadcast_to_stream, channel_to_stream};
pub use from_task::{task_to_maybe, task_to_signal, task_to_single, task_to_stream};
pub use into_channel::{stream_to_broadcast, stream_to_channel, BroadcastBridge};
pub use into_stream::BridgeStream;
pub use stream::{
    Canceller, MaybeEmitter, MaybeObserver, MaybeStream, SignalEmitter, SignalObserver,
    SignalStream, SingleEmitter, SingleObserver, SingleStream, ValueEmitter, ValueObserver,
    ValueStream,
};
pub use subscription::Subscription;
