//! Push-stream vocabulary: observers, emitters, and the four cold stream shapes.
//!
//! A stream here is a *cold, single-subscription* source: constructing one
//! does no work, `subscribe` runs its producer closure exactly once with a
//! typed emitter. All delivery goes through the bridge's terminal gate, so a
//! subscriber observes at most one terminal event no matter how the producer
//! and a concurrent dispose interleave.

use crate::error::{BridgeError, Terminal};
#[cfg(debug_assertions)]
use crate::invariants::debug_assert_emission_while_active;
use crate::subscription::{BridgeCore, Subscription};
use std::sync::Arc;

// =============================================================================
// Observer traits
// =============================================================================

/// Subscriber side of a zero-or-more value stream.
///
/// `on_next` is called once per value in upstream order; then exactly one of
/// `on_complete` / `on_error` is called, unless the subscription is disposed
/// first.
pub trait ValueObserver<T>: Send {
    fn on_next(&mut self, value: T);
    fn on_complete(&mut self);
    fn on_error(&mut self, error: BridgeError);
}

/// Subscriber side of an exactly-one value stream.
pub trait SingleObserver<T>: Send {
    fn on_success(&mut self, value: T);
    fn on_error(&mut self, error: BridgeError);
}

/// Subscriber side of an at-most-one value stream: either `on_success` or an
/// empty `on_complete`, or `on_error`.
pub trait MaybeObserver<T>: Send {
    fn on_success(&mut self, value: T);
    fn on_complete(&mut self);
    fn on_error(&mut self, error: BridgeError);
}

/// Subscriber side of a signal-only stream: no values, only the terminal.
pub trait SignalObserver: Send {
    fn on_complete(&mut self);
    fn on_error(&mut self, error: BridgeError);
}

// =============================================================================
// Canceller
// =============================================================================

/// Registers the upstream-release hook of a bridge.
///
/// Producers usually move their emitter into a spawned task; a `Canceller`
/// taken beforehand lets them register the hook (e.g. aborting that task)
/// afterwards. If the bridge has already settled when the hook is registered,
/// the hook runs immediately.
#[derive(Clone)]
pub struct Canceller {
    core: Arc<BridgeCore>,
}

impl Canceller {
    /// Registers the hook run exactly once when the bridge settles,
    /// whichever side settles it.
    pub fn set_cancel(&self, hook: impl FnOnce() + Send + 'static) {
        self.core.set_cancel_hook(Box::new(hook));
    }

    /// `true` once the downstream has disposed the subscription.
    pub fn is_disposed(&self) -> bool {
        self.core.is_disposed()
    }
}

// =============================================================================
// Emitters
// =============================================================================

/// Producer side of a [`ValueStream`], handed to the producer closure at
/// subscribe time.
///
/// Events emitted after the bridge settles (terminal delivered, or the
/// subscriber disposed) are silently discarded; the first terminal claims
/// the gate and triggers the registered cancel hook for resource release.
pub struct ValueEmitter<T> {
    observer: Box<dyn ValueObserver<T>>,
    core: Arc<BridgeCore>,
}

impl<T> ValueEmitter<T> {
    /// Pushes one value downstream, in emission order.
    pub fn next(&mut self, value: T) {
        if self.core.is_active() {
            #[cfg(debug_assertions)]
            debug_assert_emission_while_active!(self.core.is_active());
            self.observer.on_next(value);
        }
    }

    /// Signals clean completion. First terminal wins; later calls are no-ops.
    pub fn complete(&mut self) {
        if self.core.claim_terminal() {
            self.observer.on_complete();
            self.core.run_cleanup();
        }
    }

    /// Signals failure. First terminal wins; later calls are no-ops.
    pub fn error(&mut self, error: BridgeError) {
        if self.core.claim_terminal() {
            self.observer.on_error(error);
            self.core.run_cleanup();
        }
    }

    pub(crate) fn terminal(&mut self, terminal: Terminal) {
        match terminal {
            Terminal::Done => self.complete(),
            Terminal::Failed(error) => self.error(error),
        }
    }

    /// Registers the hook that releases the upstream resource.
    pub fn set_cancel(&self, hook: impl FnOnce() + Send + 'static) {
        self.core.set_cancel_hook(Box::new(hook));
    }

    /// Detached handle for registering the cancel hook after the emitter has
    /// been moved into a producer task.
    pub fn canceller(&self) -> Canceller {
        Canceller {
            core: Arc::clone(&self.core),
        }
    }

    /// `true` once the downstream has disposed the subscription.
    pub fn is_disposed(&self) -> bool {
        self.core.is_disposed()
    }
}

/// Producer side of a [`SingleStream`]: exactly one `success` or one `error`.
pub struct SingleEmitter<T> {
    observer: Box<dyn SingleObserver<T>>,
    core: Arc<BridgeCore>,
}

impl<T> SingleEmitter<T> {
    /// Delivers the value and completes. First terminal wins.
    pub fn success(&mut self, value: T) {
        if self.core.claim_terminal() {
            self.observer.on_success(value);
            self.core.run_cleanup();
        }
    }

    /// Signals failure. First terminal wins.
    pub fn error(&mut self, error: BridgeError) {
        if self.core.claim_terminal() {
            self.observer.on_error(error);
            self.core.run_cleanup();
        }
    }

    /// Registers the hook that releases the upstream resource.
    pub fn set_cancel(&self, hook: impl FnOnce() + Send + 'static) {
        self.core.set_cancel_hook(Box::new(hook));
    }

    pub fn canceller(&self) -> Canceller {
        Canceller {
            core: Arc::clone(&self.core),
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.core.is_disposed()
    }
}

/// Producer side of a [`MaybeStream`]: one `success`, or an empty `complete`,
/// or an `error`.
pub struct MaybeEmitter<T> {
    observer: Box<dyn MaybeObserver<T>>,
    core: Arc<BridgeCore>,
}

impl<T> MaybeEmitter<T> {
    /// Delivers the value and completes. First terminal wins.
    pub fn success(&mut self, value: T) {
        if self.core.claim_terminal() {
            self.observer.on_success(value);
            self.core.run_cleanup();
        }
    }

    /// Completes without a value. First terminal wins.
    pub fn complete(&mut self) {
        if self.core.claim_terminal() {
            self.observer.on_complete();
            self.core.run_cleanup();
        }
    }

    /// Signals failure. First terminal wins.
    pub fn error(&mut self, error: BridgeError) {
        if self.core.claim_terminal() {
            self.observer.on_error(error);
            self.core.run_cleanup();
        }
    }

    pub(crate) fn terminal(&mut self, terminal: Terminal) {
        match terminal {
            Terminal::Done => self.complete(),
            Terminal::Failed(error) => self.error(error),
        }
    }

    /// Registers the hook that releases the upstream resource.
    pub fn set_cancel(&self, hook: impl FnOnce() + Send + 'static) {
        self.core.set_cancel_hook(Box::new(hook));
    }

    pub fn canceller(&self) -> Canceller {
        Canceller {
            core: Arc::clone(&self.core),
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.core.is_disposed()
    }
}

/// Producer side of a [`SignalStream`]: one `complete` or one `error`.
pub struct SignalEmitter {
    observer: Box<dyn SignalObserver>,
    core: Arc<BridgeCore>,
}

impl SignalEmitter {
    /// Signals clean completion. First terminal wins.
    pub fn complete(&mut self) {
        if self.core.claim_terminal() {
            self.observer.on_complete();
            self.core.run_cleanup();
        }
    }

    /// Signals failure. First terminal wins.
    pub fn error(&mut self, error: BridgeError) {
        if self.core.claim_terminal() {
            self.observer.on_error(error);
            self.core.run_cleanup();
        }
    }

    pub(crate) fn terminal(&mut self, terminal: Terminal) {
        match terminal {
            Terminal::Done => self.complete(),
            Terminal::Failed(error) => self.error(error),
        }
    }

    /// Registers the hook that releases the upstream resource.
    pub fn set_cancel(&self, hook: impl FnOnce() + Send + 'static) {
        self.core.set_cancel_hook(Box::new(hook));
    }

    pub fn canceller(&self) -> Canceller {
        Canceller {
            core: Arc::clone(&self.core),
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.core.is_disposed()
    }
}

// =============================================================================
// Stream shapes
// =============================================================================

/// Cold push-stream of zero or more values ending in one terminal event.
pub struct ValueStream<T> {
    producer: Box<dyn FnOnce(ValueEmitter<T>) + Send>,
}

impl<T: Send + 'static> ValueStream<T> {
    /// Creates a stream from a producer closure.
    ///
    /// The closure runs once, at subscribe time, with the typed emitter.
    /// Construction itself is non-blocking and does no work.
    pub fn new(producer: impl FnOnce(ValueEmitter<T>) + Send + 'static) -> Self {
        Self {
            producer: Box::new(producer),
        }
    }

    /// Subscribes, starting the producer. Single subscription: consumes the
    /// stream. The returned [`Subscription`] cancels the bridge on `dispose`.
    pub fn subscribe(self, observer: impl ValueObserver<T> + 'static) -> Subscription {
        let core = BridgeCore::new();
        let emitter = ValueEmitter {
            observer: Box::new(observer),
            core: Arc::clone(&core),
        };
        (self.producer)(emitter);
        Subscription::new(core)
    }
}

/// Cold push-stream delivering exactly one value or an error.
pub struct SingleStream<T> {
    producer: Box<dyn FnOnce(SingleEmitter<T>) + Send>,
}

impl<T: Send + 'static> SingleStream<T> {
    /// Creates a stream from a producer closure; see [`ValueStream::new`].
    pub fn new(producer: impl FnOnce(SingleEmitter<T>) + Send + 'static) -> Self {
        Self {
            producer: Box::new(producer),
        }
    }

    /// Subscribes, starting the producer. Single subscription.
    pub fn subscribe(self, observer: impl SingleObserver<T> + 'static) -> Subscription {
        let core = BridgeCore::new();
        let emitter = SingleEmitter {
            observer: Box::new(observer),
            core: Arc::clone(&core),
        };
        (self.producer)(emitter);
        Subscription::new(core)
    }
}

/// Cold push-stream delivering at most one value.
pub struct MaybeStream<T> {
    producer: Box<dyn FnOnce(MaybeEmitter<T>) + Send>,
}

impl<T: Send + 'static> MaybeStream<T> {
    /// Creates a stream from a producer closure; see [`ValueStream::new`].
    pub fn new(producer: impl FnOnce(MaybeEmitter<T>) + Send + 'static) -> Self {
        Self {
            producer: Box::new(producer),
        }
    }

    /// Subscribes, starting the producer. Single subscription.
    pub fn subscribe(self, observer: impl MaybeObserver<T> + 'static) -> Subscription {
        let core = BridgeCore::new();
        let emitter = MaybeEmitter {
            observer: Box::new(observer),
            core: Arc::clone(&core),
        };
        (self.producer)(emitter);
        Subscription::new(core)
    }
}

/// Cold push-stream carrying no values, only a completion or error signal.
pub struct SignalStream {
    producer: Box<dyn FnOnce(SignalEmitter) + Send>,
}

impl SignalStream {
    /// Creates a stream from a producer closure; see [`ValueStream::new`].
    pub fn new(producer: impl FnOnce(SignalEmitter) + Send + 'static) -> Self {
        Self {
            producer: Box::new(producer),
        }
    }

    /// Subscribes, starting the producer. Single subscription.
    pub fn subscribe(self, observer: impl SignalObserver + 'static) -> Subscription {
        let core = BridgeCore::new();
        let emitter = SignalEmitter {
            observer: Box::new(observer),
            core: Arc::clone(&core),
        };
        (self.producer)(emitter);
        Subscription::new(core)
    }
}
