//! In-process bus
//!
//! [`LocalBus`] routes method calls to handlers registered by an embedded
//! peer and delivers emitted signals to matching subscriptions, synchronously
//! and in emission order, on the emitting thread. Each client session gets
//! its own [`LocalConnection`].

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, trace, warn};

use super::{
    Connector, IpcChannel, MatchRule, MethodCall, SignalFrame, SignalSink, SubscriptionId,
    TransportError, TransportErrorKind, TransportResult, Value,
};

/// Handler serving one method on the bus
pub type MethodHandler = Arc<dyn Fn(&[Value]) -> TransportResult<Vec<Value>> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MethodKey {
    destination: String,
    object_path: String,
    interface: String,
    member: String,
}

struct Subscription {
    id: SubscriptionId,
    connection: u64,
    rule: MatchRule,
    sink: Arc<dyn SignalSink>,
}

#[derive(Default)]
struct BusInner {
    handlers: RwLock<HashMap<MethodKey, MethodHandler>>,
    subscriptions: Mutex<Vec<Subscription>>,
    calls: Mutex<Vec<MethodCall>>,
    names: Mutex<HashMap<String, u64>>,
    reply_delay: Mutex<Option<Duration>>,
    next_subscription: AtomicU64,
    next_connection: AtomicU64,
    open_connections: AtomicUsize,
    refuse_connections: AtomicBool,
}

/// An in-process message bus
#[derive(Clone, Default)]
pub struct LocalBus {
    inner: Arc<BusInner>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `member` on the given service object
    pub fn serve_method<F>(
        &self,
        destination: &str,
        object_path: &str,
        interface: &str,
        member: &str,
        handler: F,
    ) where
        F: Fn(&[Value]) -> TransportResult<Vec<Value>> + Send + Sync + 'static,
    {
        let key = MethodKey {
            destination: destination.to_string(),
            object_path: object_path.to_string(),
            interface: interface.to_string(),
            member: member.to_string(),
        };
        self.inner.handlers.write().insert(key, Arc::new(handler));
    }

    /// Deliver a signal to every matching subscription
    ///
    /// Returns the number of sinks that received the frame.
    pub fn emit_signal(&self, frame: SignalFrame) -> usize {
        let sinks: Vec<Arc<dyn SignalSink>> = self
            .inner
            .subscriptions
            .lock()
            .iter()
            .filter(|sub| sub.rule.matches(&frame))
            .map(|sub| sub.sink.clone())
            .collect();

        trace!(member = %frame.member, receivers = sinks.len(), "Emitting signal");
        for sink in &sinks {
            sink.on_signal(&frame);
        }
        sinks.len()
    }

    /// Number of live subscriptions across all connections
    pub fn subscription_count(&self) -> usize {
        self.inner.subscriptions.lock().len()
    }

    /// Every method call made on the bus so far
    pub fn method_calls(&self) -> Vec<MethodCall> {
        self.inner.calls.lock().clone()
    }

    /// Delay every reply by `delay`
    pub fn set_reply_delay(&self, delay: Option<Duration>) {
        *self.inner.reply_delay.lock() = delay;
    }

    /// Make new connection attempts fail
    pub fn refuse_connections(&self, refuse: bool) {
        self.inner.refuse_connections.store(refuse, Ordering::SeqCst);
    }

    pub fn open_connections(&self) -> usize {
        self.inner.open_connections.load(Ordering::SeqCst)
    }

    /// Whether some connection currently owns `name`
    pub fn has_owner(&self, name: &str) -> bool {
        self.inner.names.lock().contains_key(name)
    }

    /// Open a connection to this bus
    pub fn connect_local(&self) -> TransportResult<LocalConnection> {
        if self.inner.refuse_connections.load(Ordering::SeqCst) {
            return Err(TransportError::disconnected("bus refused the connection"));
        }
        let id = self.inner.next_connection.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.open_connections.fetch_add(1, Ordering::SeqCst);
        debug!(connection = id, "Opened local bus connection");
        Ok(LocalConnection {
            bus: self.inner.clone(),
            id,
            closed: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl Connector for LocalBus {
    async fn connect(&self) -> TransportResult<Arc<dyn IpcChannel>> {
        let connection = self.connect_local()?;
        Ok(Arc::new(connection))
    }
}

/// One client's connection to a [`LocalBus`]
pub struct LocalConnection {
    bus: Arc<BusInner>,
    id: u64,
    closed: AtomicBool,
}

impl LocalConnection {
    fn ensure_open(&self) -> TransportResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::disconnected("connection is closed"));
        }
        Ok(())
    }

    fn lookup_handler(&self, call: &MethodCall) -> TransportResult<MethodHandler> {
        let handlers = self.bus.handlers.read();
        let key = MethodKey {
            destination: call.destination.clone(),
            object_path: call.object_path.clone(),
            interface: call.interface.clone(),
            member: call.member.clone(),
        };
        if let Some(handler) = handlers.get(&key) {
            return Ok(handler.clone());
        }
        if handlers.keys().any(|k| k.destination == call.destination) {
            Err(TransportError::new(
                TransportErrorKind::UnknownMethod,
                format!("no method {} on {}", call.member, call.interface),
            ))
        } else {
            Err(TransportError::new(
                TransportErrorKind::ServiceUnknown,
                format!("the name {} was not provided by any service", call.destination),
            ))
        }
    }
}

#[async_trait]
impl IpcChannel for LocalConnection {
    async fn call_method(&self, call: MethodCall) -> TransportResult<Vec<Value>> {
        self.ensure_open()?;
        self.bus.calls.lock().push(call.clone());

        let handler = self.lookup_handler(&call)?;
        let delay = *self.bus.reply_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        handler(&call.args)
    }

    fn subscribe_signal(&self, rule: MatchRule, sink: Arc<dyn SignalSink>) -> TransportResult<SubscriptionId> {
        self.ensure_open()?;
        let id = SubscriptionId(self.bus.next_subscription.fetch_add(1, Ordering::SeqCst) + 1);
        debug!(connection = self.id, subscription = %id, member = %rule.member, "Subscribed to signal");
        self.bus.subscriptions.lock().push(Subscription {
            id,
            connection: self.id,
            rule,
            sink,
        });
        Ok(id)
    }

    fn unsubscribe_signal(&self, id: SubscriptionId) -> TransportResult<()> {
        let mut subscriptions = self.bus.subscriptions.lock();
        let position = subscriptions
            .iter()
            .position(|sub| sub.id == id && sub.connection == self.id)
            .ok_or_else(|| TransportError::failed(format!("unknown subscription {}", id)))?;
        subscriptions.remove(position);
        debug!(connection = self.id, subscription = %id, "Unsubscribed from signal");
        Ok(())
    }

    async fn request_name(&self, name: &str) -> TransportResult<()> {
        self.ensure_open()?;
        let mut names = self.bus.names.lock();
        match names.get(name) {
            Some(owner) if *owner != self.id => Err(TransportError::failed(format!(
                "name {} is already owned",
                name
            ))),
            _ => {
                names.insert(name.to_string(), self.id);
                Ok(())
            }
        }
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut subscriptions = self.bus.subscriptions.lock();
        let before = subscriptions.len();
        subscriptions.retain(|sub| sub.connection != self.id);
        let dropped = before - subscriptions.len();
        drop(subscriptions);
        if dropped > 0 {
            warn!(connection = self.id, dropped, "Closing connection with live subscriptions");
        }

        self.bus.names.lock().retain(|_, owner| *owner != self.id);
        self.bus.open_connections.fetch_sub(1, Ordering::SeqCst);
        debug!(connection = self.id, "Closed local bus connection");
    }
}

impl Drop for LocalConnection {
    fn drop(&mut self) {
        self.close();
    }
}
