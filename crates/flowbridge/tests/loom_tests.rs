//! Loom-based concurrency tests for the terminal-claim protocol.
//!
//! Run with: `cargo test --features loom --test loom_tests --release`
//!
//! Loom exhaustively explores all possible thread interleavings to find
//! concurrency bugs that might only occur under specific scheduling. The
//! bridge core is modelled here in isolation with loom primitives: an atomic
//! tri-state gate plus a mutex-held cleanup hook slot, the same protocol the
//! crate uses for exactly-once terminal delivery.

#![cfg(feature = "loom")]

use loom::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use loom::sync::{Arc, Mutex};
use loom::thread;

const ACTIVE: u8 = 1;
const TERMINATED: u8 = 2;
const DISPOSED: u8 = 3;

/// Simplified bridge core for loom testing: gate + cleanup-hook slot.
struct LoomCore {
    gate: AtomicU8,
    /// `true` while a cleanup hook is registered and unconsumed.
    hook: Mutex<bool>,
    cleanups: AtomicUsize,
    terminals: AtomicUsize,
}

impl LoomCore {
    fn new() -> Self {
        Self {
            gate: AtomicU8::new(ACTIVE),
            hook: Mutex::new(true),
            cleanups: AtomicUsize::new(0),
            terminals: AtomicUsize::new(0),
        }
    }

    fn run_cleanup(&self) {
        let mut slot = self.hook.lock().unwrap();
        if *slot {
            *slot = false;
            self.cleanups.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Upstream terminal path: claim, deliver downstream, release.
    fn terminal(&self) {
        if self
            .gate
            .compare_exchange(ACTIVE, TERMINATED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.terminals.fetch_add(1, Ordering::Relaxed);
            self.run_cleanup();
        }
    }

    /// Downstream dispose path: claim, release, deliver nothing.
    fn dispose(&self) {
        if self
            .gate
            .compare_exchange(ACTIVE, DISPOSED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.run_cleanup();
        }
    }
}

#[test]
fn loom_terminal_vs_dispose_single_winner() {
    loom::model(|| {
        let core = Arc::new(LoomCore::new());

        let upstream = {
            let core = Arc::clone(&core);
            thread::spawn(move || core.terminal())
        };
        let downstream = {
            let core = Arc::clone(&core);
            thread::spawn(move || core.dispose())
        };
        upstream.join().unwrap();
        downstream.join().unwrap();

        // exactly one cleanup, at most one delivered terminal
        assert_eq!(core.cleanups.load(Ordering::Relaxed), 1);
        let terminals = core.terminals.load(Ordering::Relaxed);
        let disposed = u8::from(core.gate.load(Ordering::Relaxed) == DISPOSED);
        assert_eq!(terminals + usize::from(disposed), 1);
    });
}

#[test]
fn loom_double_terminal_delivers_once() {
    loom::model(|| {
        let core = Arc::new(LoomCore::new());

        let first = {
            let core = Arc::clone(&core);
            thread::spawn(move || core.terminal())
        };
        core.terminal();
        first.join().unwrap();

        assert_eq!(core.terminals.load(Ordering::Relaxed), 1);
        assert_eq!(core.cleanups.load(Ordering::Relaxed), 1);
    });
}

#[test]
fn loom_late_hook_registration_still_cleans_up() {
    loom::model(|| {
        let core = Arc::new(LoomCore::new());
        // start with no hook registered
        *core.hook.lock().unwrap() = false;

        let disposer = {
            let core = Arc::clone(&core);
            thread::spawn(move || core.dispose())
        };

        // producer registers its hook concurrently with the dispose;
        // whichever side observes the settled gate runs it
        {
            let mut slot = core.hook.lock().unwrap();
            if core.gate.load(Ordering::Acquire) == ACTIVE {
                *slot = true;
            } else {
                drop(slot);
                core.cleanups.fetch_add(1, Ordering::Relaxed);
            }
        }

        disposer.join().unwrap();
        assert_eq!(core.cleanups.load(Ordering::Relaxed), 1);
    });
}
