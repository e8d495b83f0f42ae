//! Failure vocabulary shared by every adapter.

use std::sync::Arc;
use thiserror::Error;

/// Type-erased failure cause carried across a bridge.
///
/// Causes are reference-counted so one upstream failure can fan out to
/// multiple consumers (broadcast variants) without losing the source chain.
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Terminal failure of a bridge.
///
/// Every adapter hands its downstream consumer exactly one of these when the
/// upstream side fails. The variants distinguish a genuine upstream failure
/// from "stopped because someone asked it to stop" and from a violated
/// value-arity contract.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    /// The upstream source failed. The original cause is preserved as-is,
    /// never re-wrapped in new message text.
    #[error(transparent)]
    Upstream(Cause),

    /// The source stopped because it was asked to stop, not because it failed.
    ///
    /// Adapters with a `complete_on_cancel` policy remap this variant into a
    /// clean completion instead of surfacing it.
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// A source that promised exactly one value terminated without producing it.
    #[error("source terminated without emitting its required value")]
    MissingValue,

    /// A value was rejected by a full destination under the fail-fast
    /// overflow policy.
    #[error("destination channel full, value rejected")]
    Overflow,
}

impl BridgeError {
    /// Wraps an arbitrary upstream failure, preserving it as the source chain.
    pub fn upstream<E>(cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Upstream(Arc::new(cause))
    }

    /// A cancellation signal carrying a short reason.
    pub fn cancelled(reason: impl Into<String>) -> Self {
        Self::Cancelled(reason.into())
    }

    /// Returns `true` if this failure is cancellation-flavored.
    #[inline]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

/// Internal terminal vocabulary every adapter translates through.
///
/// Upstream terminations (task result, channel closure, stream terminal) are
/// first mapped into this tagged pair, run through [`remap_cancel`], and only
/// then translated into the destination's vocabulary.
#[derive(Debug, Clone)]
pub(crate) enum Terminal {
    /// Clean completion.
    Done,
    /// Failure carrying its cause.
    Failed(BridgeError),
}

/// The single remap table shared by every adapter: decides whether a
/// cancellation-flavored failure surfaces as an error or as clean completion.
pub(crate) fn remap_cancel(terminal: Terminal, complete_on_cancel: bool) -> Terminal {
    match terminal {
        Terminal::Failed(error) if complete_on_cancel && error.is_cancellation() => Terminal::Done,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn upstream_cause_is_transparent() {
        let error = BridgeError::upstream(io::Error::new(io::ErrorKind::Other, "disk on fire"));
        assert_eq!(error.to_string(), "disk on fire");
        assert!(!error.is_cancellation());
    }

    #[test]
    fn cancellation_is_recognized() {
        assert!(BridgeError::cancelled("caller gave up").is_cancellation());
        assert!(!BridgeError::MissingValue.is_cancellation());
    }

    #[test]
    fn remap_turns_cancellation_into_done() {
        let terminal = Terminal::Failed(BridgeError::cancelled("stop"));
        assert!(matches!(remap_cancel(terminal, true), Terminal::Done));
    }

    #[test]
    fn remap_leaves_cancellation_alone_by_default() {
        let terminal = Terminal::Failed(BridgeError::cancelled("stop"));
        assert!(matches!(
            remap_cancel(terminal, false),
            Terminal::Failed(BridgeError::Cancelled(_))
        ));
    }

    #[test]
    fn remap_never_touches_genuine_failures() {
        let terminal = Terminal::Failed(BridgeError::MissingValue);
        assert!(matches!(
            remap_cancel(terminal, true),
            Terminal::Failed(BridgeError::MissingValue)
        ));
    }
}
