//! Atomic terminal gate: the exactly-once claim every bridge relies on.

use std::sync::atomic::{AtomicU8, Ordering};

const UNSTARTED: u8 = 0;
const ACTIVE: u8 = 1;
const TERMINATED: u8 = 2;
const DISPOSED: u8 = 3;

/// Lifecycle holder for one bridge.
///
/// `Unstarted → Active → {Terminated | Disposed}`. The transition out of
/// `Active` is claimed with compare-and-set, so of a concurrent upstream
/// terminal and downstream dispose exactly one wins and proceeds to cleanup
/// and signal propagation. A plain check-then-set would allow both.
#[derive(Debug)]
pub(crate) struct TerminalGate(AtomicU8);

impl TerminalGate {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(UNSTARTED))
    }

    /// Marks the bridge active. Called once at subscribe time.
    pub(crate) fn activate(&self) {
        let _ = self
            .0
            .compare_exchange(UNSTARTED, ACTIVE, Ordering::AcqRel, Ordering::Acquire);
    }

    /// Claims the upstream-terminal transition. Returns `true` for the single
    /// winner, which must deliver the downstream signal and release resources.
    pub(crate) fn claim_terminal(&self) -> bool {
        self.0
            .compare_exchange(ACTIVE, TERMINATED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Claims the downstream-dispose transition. Returns `true` for the single
    /// winner, which must release resources without delivering any terminal.
    pub(crate) fn claim_dispose(&self) -> bool {
        self.0
            .compare_exchange(ACTIVE, DISPOSED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// `true` while values may still flow and no terminal has been claimed.
    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire) == ACTIVE
    }

    /// `true` once either side has claimed its terminal transition.
    #[inline]
    pub(crate) fn is_settled(&self) -> bool {
        self.0.load(Ordering::Acquire) >= TERMINATED
    }

    /// `true` if the downstream dispose won the claim.
    #[inline]
    pub(crate) fn is_disposed(&self) -> bool {
        self.0.load(Ordering::Acquire) == DISPOSED
    }
}
