//! Signal router
//!
//! One router serves every subscription of a session. For each inbound
//! frame it resolves the registration by composite key, decodes the payload
//! for that signal kind and invokes the callback on the delivering thread.
//! Nothing is ever reported back to the transport: frames that cannot be
//! routed, decoded or delivered are logged and dropped.

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Weak;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, info, warn};

use crate::registration::RegistrationTable;
use crate::transport::{SignalFrame, SignalSink};

use super::{SignalKey, SignalKind, SignalPayload};

/// What happened to one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Dispatched,
    /// The session was torn down
    SessionClosed,
    /// Not a signal this library knows
    UnknownSignal,
    /// No callback registered for the key
    NoRegistration,
    /// The payload did not match the signal's shape
    DecodeFailed,
    /// The callback panicked; the panic was contained
    CallbackPanicked,
}

#[derive(Debug, Default)]
struct Counters {
    frames_received: AtomicU64,
    frames_dispatched: AtomicU64,
    frames_dropped: AtomicU64,
    decode_failures: AtomicU64,
    callback_panics: AtomicU64,
    records_allocated: AtomicU64,
    records_released: AtomicU64,
}

/// Snapshot of a router's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchStats {
    pub frames_received: u64,
    pub frames_dispatched: u64,
    pub frames_dropped: u64,
    pub decode_failures: u64,
    pub callback_panics: u64,
    /// Nested call records built for call-event callbacks
    pub records_allocated: u64,
    /// Nested call records released after their callback returned
    pub records_released: u64,
}

pub struct SignalRouter {
    table: Weak<RegistrationTable>,
    delivery: ReentrantMutex<()>,
    counters: Counters,
}

impl SignalRouter {
    pub fn new(table: Weak<RegistrationTable>) -> Self {
        Self {
            table,
            delivery: ReentrantMutex::new(()),
            counters: Counters::default(),
        }
    }

    /// Block until no frame is being delivered on another thread
    ///
    /// Frames arriving while the guard is held wait for it. The calling
    /// thread may already be inside a callback.
    pub(crate) fn hold_delivery(&self) -> ReentrantMutexGuard<'_, ()> {
        self.delivery.lock()
    }

    /// Route one frame to its callback
    pub fn route(&self, frame: &SignalFrame) -> RouteOutcome {
        // One frame at a time per session; a callback may still re-enter on its own thread.
        let _delivery = self.delivery.lock();
        self.counters.frames_received.fetch_add(1, Ordering::Relaxed);

        let outcome = self.deliver(frame);
        if outcome != RouteOutcome::Dispatched {
            self.counters.frames_dropped.fetch_add(1, Ordering::Relaxed);
        }
        outcome
    }

    fn deliver(&self, frame: &SignalFrame) -> RouteOutcome {
        info!(signal = %frame.member, "Signal received");

        let Some(table) = self.table.upgrade() else {
            debug!(signal = %frame.member, "Session is gone, dropping signal");
            return RouteOutcome::SessionClosed;
        };
        if table.is_closed() {
            debug!(signal = %frame.member, "Session is closed, dropping signal");
            return RouteOutcome::SessionClosed;
        }

        let Some(kind) = SignalKind::from_member(&frame.member) else {
            warn!(signal = %frame.member, "Unknown signal");
            return RouteOutcome::UnknownSignal;
        };

        let key = SignalKey::new(frame.object_path.clone(), frame.interface.clone(), kind);
        let Some(callback) = table.lookup(&key) else {
            warn!(key = %key, "No callback registered for signal");
            return RouteOutcome::NoRegistration;
        };
        // The table stays unlocked while the application runs.
        drop(table);

        let payload = match SignalPayload::decode(kind, &frame.args) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(signal = %kind, error = %e, "Dropping undecodable signal");
                self.counters.decode_failures.fetch_add(1, Ordering::Relaxed);
                return RouteOutcome::DecodeFailed;
            }
        };
        debug!(signal = %kind, payload = ?payload, "Decoded signal");

        let nested = payload.nested_records() as u64;
        self.counters.records_allocated.fetch_add(nested, Ordering::Relaxed);
        let payload = scopeguard::guard(payload, |payload| {
            let released = payload.nested_records() as u64;
            drop(payload);
            self.counters.records_released.fetch_add(released, Ordering::Relaxed);
        });

        match catch_unwind(AssertUnwindSafe(|| callback.invoke(&payload))) {
            Ok(true) => {
                self.counters.frames_dispatched.fetch_add(1, Ordering::Relaxed);
                RouteOutcome::Dispatched
            }
            Ok(false) => {
                error!(signal = %kind, callback = ?callback, "Callback shape does not match signal");
                RouteOutcome::DecodeFailed
            }
            Err(_) => {
                error!(signal = %kind, "Signal callback panicked");
                self.counters.callback_panics.fetch_add(1, Ordering::Relaxed);
                RouteOutcome::CallbackPanicked
            }
        }
    }

    pub fn stats(&self) -> DispatchStats {
        let c = &self.counters;
        DispatchStats {
            frames_received: c.frames_received.load(Ordering::Relaxed),
            frames_dispatched: c.frames_dispatched.load(Ordering::Relaxed),
            frames_dropped: c.frames_dropped.load(Ordering::Relaxed),
            decode_failures: c.decode_failures.load(Ordering::Relaxed),
            callback_panics: c.callback_panics.load(Ordering::Relaxed),
            records_allocated: c.records_allocated.load(Ordering::Relaxed),
            records_released: c.records_released.load(Ordering::Relaxed),
        }
    }
}

impl SignalSink for SignalRouter {
    fn on_signal(&self, frame: &SignalFrame) {
        self.route(frame);
    }
}
