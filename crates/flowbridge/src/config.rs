//! Per-adapter policy flags.

/// Policy flags for Channel→Stream draining.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrainOptions {
    /// Remap an upstream cancellation close into clean completion.
    ///
    /// Default: `false` — cancellation surfaces as a stream error carrying
    /// the cancellation cause.
    pub complete_on_cancel: bool,
}

impl DrainOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cancellation remap.
    pub fn with_complete_on_cancel(mut self, complete: bool) -> Self {
        self.complete_on_cancel = complete;
        self
    }
}

/// Policy flags for Task→Stream adapters.
///
/// The two flags are independent: one governs what a downstream dispose does
/// to the task, the other what an upstream task cancellation looks like to
/// the subscriber.
#[derive(Debug, Clone, Copy)]
pub struct TaskBridgeOptions {
    /// Abort the upstream task when the subscriber disposes.
    ///
    /// Default: `true`. With `false` the task runs to completion and its
    /// result is discarded.
    pub cancel_task_on_dispose: bool,

    /// Remap a cancelled (aborted) task into clean completion.
    ///
    /// Default: `false` — an aborted task surfaces as a stream error.
    pub complete_on_cancel: bool,
}

impl Default for TaskBridgeOptions {
    fn default() -> Self {
        Self {
            cancel_task_on_dispose: true,
            complete_on_cancel: false,
        }
    }
}

impl TaskBridgeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether a downstream dispose aborts the task.
    pub fn with_cancel_task_on_dispose(mut self, cancel: bool) -> Self {
        self.cancel_task_on_dispose = cancel;
        self
    }

    /// Sets the cancellation remap.
    pub fn with_complete_on_cancel(mut self, complete: bool) -> Self {
        self.complete_on_cancel = complete;
        self
    }
}

/// What Stream→Channel does when the destination buffer is full.
///
/// The choice materially changes delivery guarantees, so it is explicit
/// rather than inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Best-effort offer: the incoming value is silently dropped. Terminal
    /// events are never dropped, only values.
    #[default]
    DropNewest,

    /// Close the channel with [`crate::BridgeError::Overflow`] so the
    /// consumer observes the lost delivery loudly.
    FailFast,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        assert!(!DrainOptions::default().complete_on_cancel);
        let task = TaskBridgeOptions::default();
        assert!(task.cancel_task_on_dispose);
        assert!(!task.complete_on_cancel);
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::DropNewest);
    }

    #[test]
    fn builders_flip_flags() {
        let drain = DrainOptions::new().with_complete_on_cancel(true);
        assert!(drain.complete_on_cancel);
        let task = TaskBridgeOptions::new()
            .with_cancel_task_on_dispose(false)
            .with_complete_on_cancel(true);
        assert!(!task.cancel_task_on_dispose);
        assert!(task.complete_on_cancel);
    }
}
