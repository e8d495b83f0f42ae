//! Debug assertion macros for the bridge lifecycle invariants.
//!
//! Active only in debug builds (`#[cfg(debug_assertions)]`), so there is zero
//! overhead in release builds.

// =============================================================================
// INV-GATE-01: Settled After Claim
// =============================================================================

/// Assert that a won claim left the gate in a settled state.
///
/// **Invariant**: `claim_* returns true → gate.is_settled()`
///
/// Used in: `BridgeCore::claim_terminal()`, `BridgeCore::dispose()`
macro_rules! debug_assert_settled_after_claim {
    ($won:expr, $settled:expr) => {
        debug_assert!(
            !$won || $settled,
            "INV-GATE-01 violated: terminal claim won but gate is not settled"
        )
    };
}

// =============================================================================
// INV-HOOK-01: Cleanup Hook Consumed
// =============================================================================

/// Assert that the cancel hook slot is empty after cleanup ran.
///
/// **Invariant**: `run_cleanup() → hook slot is None` (release is idempotent)
///
/// Used in: `BridgeCore::run_cleanup()`
macro_rules! debug_assert_hook_consumed {
    ($slot_empty:expr) => {
        debug_assert!(
            $slot_empty,
            "INV-HOOK-01 violated: cleanup ran but a cancel hook is still registered"
        )
    };
}

// =============================================================================
// INV-EMIT-01: No Emission After Settle
// =============================================================================

/// Assert that a value is only delivered downstream while the gate is active.
///
/// **Invariant**: `on_next delivered → gate.is_active()` at the check
///
/// Used in: the emitters' value paths
macro_rules! debug_assert_emission_while_active {
    ($active:expr) => {
        debug_assert!(
            $active,
            "INV-EMIT-01 violated: value delivered after the bridge settled"
        )
    };
}

pub(crate) use debug_assert_emission_while_active;
pub(crate) use debug_assert_hook_consumed;
pub(crate) use debug_assert_settled_after_claim;
