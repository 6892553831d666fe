//! Registration table
//!
//! Maps each [`SignalKey`] to the callback registered for it and the bus
//! subscription feeding it. At most one registration exists per key. All
//! mutations go through one lock; the lock is only held for table updates
//! and subscription bookkeeping, never while an application callback runs.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use crate::client::config::ClientConfig;
use crate::error::{CallManagerError, ClientResult};
use crate::signal::{SignalCallback, SignalKey, SignalKind};
use crate::transport::{IpcChannel, MatchRule, SignalSink, SubscriptionId};

struct Registration {
    callback: SignalCallback,
    subscription: SubscriptionId,
}

/// Outcome of tearing the table down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeardownReport {
    /// Subscriptions closed cleanly
    pub closed: usize,
    /// Subscriptions the transport failed to close
    pub failed: usize,
}

pub struct RegistrationTable {
    channel: Arc<dyn IpcChannel>,
    service: String,
    object_path: String,
    interface: String,
    entries: Mutex<HashMap<SignalKey, Registration>>,
    closed: AtomicBool,
}

impl RegistrationTable {
    pub fn new(channel: Arc<dyn IpcChannel>, config: &ClientConfig) -> Self {
        Self {
            channel,
            service: config.service.clone(),
            object_path: config.object_path.clone(),
            interface: config.interface.clone(),
            entries: Mutex::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Key a registration for `kind` is stored under
    pub fn key_for(&self, kind: SignalKind) -> SignalKey {
        SignalKey::new(self.object_path.clone(), self.interface.clone(), kind)
    }

    /// Register `callback` and subscribe `sink` to its signal
    pub fn register(&self, callback: SignalCallback, sink: Arc<dyn SignalSink>) -> ClientResult<()> {
        let kind = callback.kind();
        let key = self.key_for(kind);

        let mut entries = self.entries.lock();
        if self.is_closed() {
            return Err(CallManagerError::session_closed());
        }
        if entries.contains_key(&key) {
            debug!(key = %key, "Signal is already registered");
            return Err(CallManagerError::already_registered(kind.member()));
        }

        let rule = MatchRule {
            sender: self.service.clone(),
            interface: self.interface.clone(),
            member: kind.member().to_string(),
            object_path: self.object_path.clone(),
        };
        let subscription = self.channel.subscribe_signal(rule, sink).map_err(|e| {
            warn!(key = %key, error = %e, "Signal subscription failed");
            CallManagerError::from(e)
        })?;

        entries.insert(
            key.clone(),
            Registration {
                callback,
                subscription,
            },
        );
        info!(key = %key, subscription = %subscription, "Registered signal callback");
        Ok(())
    }

    /// Remove the registration for `kind` and close its subscription
    ///
    /// The entry is removed even when the transport fails to close the
    /// subscription; the failure is reported as `OperationFailed`.
    pub fn unregister(&self, kind: SignalKind) -> ClientResult<()> {
        let key = self.key_for(kind);

        let mut entries = self.entries.lock();
        if self.is_closed() {
            return Err(CallManagerError::session_closed());
        }
        let registration = entries.remove(&key).ok_or_else(|| {
            warn!(key = %key, "Signal is not registered");
            CallManagerError::not_registered(kind.member())
        })?;
        // The callback may own the last client handle; drop it unlocked.
        drop(entries);

        self.channel
            .unsubscribe_signal(registration.subscription)
            .map_err(|e| {
                warn!(key = %key, error = %e, "Failed to close signal subscription");
                CallManagerError::operation_failed(format!("failed to unsubscribe {}: {}", kind, e))
            })?;
        info!(key = %key, "Unregistered signal callback");
        Ok(())
    }

    /// Callback registered under `key`, if any
    pub fn lookup(&self, key: &SignalKey) -> Option<SignalCallback> {
        if self.is_closed() {
            return None;
        }
        self.entries.lock().get(key).map(|r| r.callback.clone())
    }

    pub fn is_registered(&self, kind: SignalKind) -> bool {
        self.entries.lock().contains_key(&self.key_for(kind))
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Close the table and every subscription in it
    ///
    /// Keeps going past individual unsubscribe failures. Calling it again
    /// is a no-op.
    pub fn teardown(&self) -> TeardownReport {
        let drained: Vec<(SignalKey, Registration)> = {
            let mut entries = self.entries.lock();
            if self.closed.swap(true, Ordering::SeqCst) {
                return TeardownReport::default();
            }
            entries.drain().collect()
        };

        let mut report = TeardownReport::default();
        for (key, registration) in drained {
            match self.channel.unsubscribe_signal(registration.subscription) {
                Ok(()) => report.closed += 1,
                Err(e) => {
                    warn!(key = %key, error = %e, "Failed to close subscription during teardown");
                    report.failed += 1;
                }
            }
        }
        debug!(closed = report.closed, failed = report.failed, "Registration table torn down");
        report
    }
}
