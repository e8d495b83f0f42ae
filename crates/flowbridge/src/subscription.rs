//! Per-bridge shared state and the downstream `Subscription` handle.

use crate::gate::TerminalGate;
#[cfg(debug_assertions)]
use crate::invariants::{debug_assert_hook_consumed, debug_assert_settled_after_claim};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type CancelHook = Box<dyn FnOnce() + Send>;

/// State shared between an emitter and its [`Subscription`].
///
/// Owns the terminal gate and the cancel hook. The hook is the non-owning
/// back-reference to the upstream resource: it is registered at bridge
/// construction, run exactly once by whichever side claims the terminal
/// transition, and cleared afterwards.
pub(crate) struct BridgeCore {
    gate: TerminalGate,
    cancel_hook: Mutex<Option<CancelHook>>,
}

impl BridgeCore {
    /// Creates the core for one bridge and marks it active.
    pub(crate) fn new() -> Arc<Self> {
        let core = Self {
            gate: TerminalGate::new(),
            cancel_hook: Mutex::new(None),
        };
        core.gate.activate();
        Arc::new(core)
    }

    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        self.gate.is_active()
    }

    #[inline]
    pub(crate) fn is_settled(&self) -> bool {
        self.gate.is_settled()
    }

    #[inline]
    pub(crate) fn is_disposed(&self) -> bool {
        self.gate.is_disposed()
    }

    /// Registers the hook that releases the upstream resource.
    ///
    /// If the bridge has already settled the hook runs immediately, so a
    /// producer that registers its hook after a fast dispose still cleans up.
    pub(crate) fn set_cancel_hook(&self, hook: CancelHook) {
        {
            let mut slot = self.lock_hook();
            if !self.gate.is_settled() {
                *slot = Some(hook);
                return;
            }
        }
        hook();
    }

    /// Claims the upstream-terminal transition. The single winner must
    /// deliver the downstream signal and then call [`Self::run_cleanup`].
    pub(crate) fn claim_terminal(&self) -> bool {
        let won = self.gate.claim_terminal();
        #[cfg(debug_assertions)]
        debug_assert_settled_after_claim!(won, self.gate.is_settled());
        won
    }

    /// Downstream cancel: claims the dispose transition and releases the
    /// upstream resource. No terminal event is delivered on this path; the
    /// downstream consumer separately observes its own cancellation.
    pub(crate) fn dispose(&self) {
        if self.gate.claim_dispose() {
            #[cfg(debug_assertions)]
            debug_assert_settled_after_claim!(true, self.gate.is_settled());
            self.run_cleanup();
        }
    }

    /// Runs and clears the cancel hook. Idempotent.
    pub(crate) fn run_cleanup(&self) {
        let hook = self.lock_hook().take();
        #[cfg(debug_assertions)]
        debug_assert_hook_consumed!(self.lock_hook().is_none());
        if let Some(hook) = hook {
            hook();
        }
    }

    fn lock_hook(&self) -> MutexGuard<'_, Option<CancelHook>> {
        // A hook that panicked must not wedge cleanup for the other side.
        self.cancel_hook
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle returned by `subscribe`.
///
/// Disposing it cancels the bridge from the downstream side: the upstream
/// resource is released and this bridge delivers no terminal event of its
/// own. Disposal loses gracefully to a concurrent upstream terminal — of the
/// two, exactly one takes effect.
#[derive(Clone)]
pub struct Subscription {
    core: Arc<BridgeCore>,
}

impl Subscription {
    pub(crate) fn new(core: Arc<BridgeCore>) -> Self {
        Self { core }
    }

    /// Requests cancellation. Idempotent.
    pub fn dispose(&self) {
        self.core.dispose();
    }

    /// `true` once the bridge has reached any terminal state.
    pub fn is_settled(&self) -> bool {
        self.core.is_settled()
    }

    /// `true` if this subscription was cancelled from the downstream side
    /// before an upstream terminal arrived.
    pub fn is_disposed(&self) -> bool {
        self.core.is_disposed()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("settled", &self.core.is_settled())
            .field("disposed", &self.core.is_disposed())
            .finish()
    }
}
