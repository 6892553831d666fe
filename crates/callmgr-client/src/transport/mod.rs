//! IPC transport abstractions
//!
//! The client talks to the call-manager daemon through an [`IpcChannel`]:
//! synchronous method calls, signal subscriptions and name ownership. A
//! [`Connector`] opens channels; [`local::LocalBus`] provides an in-process
//! implementation of both.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub mod local;
pub mod value;

pub use value::{tuple_signature, Value, VariantDict};

/// Classification of transport failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// The peer rejected the caller's credentials
    AccessDenied,
    /// No reply arrived in time
    NoReply,
    /// The destination service is not on the bus
    ServiceUnknown,
    /// The peer does not implement the method
    UnknownMethod,
    /// The channel is closed or could not be opened
    Disconnected,
    /// The peer ran out of memory
    NoMemory,
    /// The peer returned an error reply
    Failed,
}

impl TransportErrorKind {
    /// Well-known error name for this kind
    pub fn error_name(&self) -> &'static str {
        match self {
            Self::AccessDenied => "org.freedesktop.DBus.Error.AccessDenied",
            Self::NoReply => "org.freedesktop.DBus.Error.NoReply",
            Self::ServiceUnknown => "org.freedesktop.DBus.Error.ServiceUnknown",
            Self::UnknownMethod => "org.freedesktop.DBus.Error.UnknownMethod",
            Self::Disconnected => "org.freedesktop.DBus.Error.Disconnected",
            Self::NoMemory => "org.freedesktop.DBus.Error.NoMemory",
            Self::Failed => "org.freedesktop.DBus.Error.Failed",
        }
    }
}

/// Error reported by a transport
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}: {message}", .kind.error_name())]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn disconnected(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Disconnected, message)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Failed, message)
    }
}

pub type TransportResult<T> = Result<T, TransportError>;

/// A synchronous request addressed to a service object
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub destination: String,
    pub object_path: String,
    pub interface: String,
    pub member: String,
    pub args: Vec<Value>,
    pub timeout: Duration,
}

/// A broadcast notification received from the bus
#[derive(Debug, Clone, PartialEq)]
pub struct SignalFrame {
    pub sender: String,
    pub object_path: String,
    pub interface: String,
    pub member: String,
    pub args: Vec<Value>,
}

impl SignalFrame {
    pub fn new(
        sender: impl Into<String>,
        object_path: impl Into<String>,
        interface: impl Into<String>,
        member: impl Into<String>,
        args: Vec<Value>,
    ) -> Self {
        Self {
            sender: sender.into(),
            object_path: object_path.into(),
            interface: interface.into(),
            member: member.into(),
            args,
        }
    }

    /// Type signature of the payload
    pub fn signature(&self) -> String {
        tuple_signature(&self.args)
    }
}

/// Which frames a subscription receives
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchRule {
    pub sender: String,
    pub interface: String,
    pub member: String,
    pub object_path: String,
}

impl MatchRule {
    pub fn matches(&self, frame: &SignalFrame) -> bool {
        self.sender == frame.sender
            && self.interface == frame.interface
            && self.member == frame.member
            && self.object_path == frame.object_path
    }
}

/// Handle of a live signal subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Receiver of matching signal frames
///
/// Invoked on the transport's delivery thread. The transport does not hand
/// over the next frame until `on_signal` returns.
pub trait SignalSink: Send + Sync {
    fn on_signal(&self, frame: &SignalFrame);
}

/// Bus connection used by a client session
#[async_trait]
pub trait IpcChannel: Send + Sync {
    /// Invoke a method and wait for its reply tuple
    async fn call_method(&self, call: MethodCall) -> TransportResult<Vec<Value>>;

    /// Start delivering frames matching `rule` to `sink`
    fn subscribe_signal(&self, rule: MatchRule, sink: Arc<dyn SignalSink>) -> TransportResult<SubscriptionId>;

    /// Stop a subscription; no frame reaches its sink afterwards
    fn unsubscribe_signal(&self, id: SubscriptionId) -> TransportResult<()>;

    /// Take ownership of a well-known bus name
    async fn request_name(&self, name: &str) -> TransportResult<()>;

    /// Release the connection
    fn close(&self);
}

/// Opens [`IpcChannel`]s
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> TransportResult<Arc<dyn IpcChannel>>;
}
