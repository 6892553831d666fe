//! # Call Manager Client
//!
//! Client library for the platform call-manager daemon. Applications use it
//! to control telephony calls (dial, answer, hold, swap, join, split,
//! transfer, end), to drive audio routing, DTMF and voice recording, and to
//! receive call-state notifications through typed callbacks.
//!
//! Every request is a synchronous method call over an IPC bus to the
//! daemon. Notifications are bus signals the daemon broadcasts; the client
//! subscribes to the ones an application registers a callback for and
//! dispatches them on the delivering thread.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               CallManagerClient              │
//! │  requests ──► invoke (timeout, cancel) ──────┼──► IpcChannel::call_method
//! │                                              │
//! │  set_*_cb ──► RegistrationTable ─────────────┼──► IpcChannel::subscribe_signal
//! │                      ▲                       │
//! │                      │ lookup by SignalKey   │
//! │               SignalRouter ◄─────────────────┼─── SignalSink::on_signal
//! │                      │ decode payload        │
//! │                      ▼                       │
//! │             application callback             │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! - [`transport`]: the bus abstraction and an in-process [`transport::local::LocalBus`]
//! - [`call`]: wire enumerations, call records and their dictionary codec
//! - [`signal`]: signal kinds, payloads, callbacks and the router
//! - [`registration`]: the per-session registration table
//! - [`client`]: the session handle and every request
//! - [`logging`]: optional subscriber setup
//!
//! ## Quick Start
//!
//! ```rust
//! use callmgr_client::transport::local::LocalBus;
//! use callmgr_client::transport::Value;
//! use callmgr_client::{protocol, CallManagerClient, CallType, ClientConfig, SimSlot};
//!
//! # tokio_test::block_on(async {
//! // An in-process daemon answering DialCall with status 0.
//! let bus = LocalBus::new();
//! bus.serve_method(
//!     protocol::SERVICE,
//!     protocol::OBJECT_PATH,
//!     protocol::INTERFACE,
//!     protocol::method::DIAL_CALL,
//!     |_args| Ok(vec![Value::Int32(0)]),
//! );
//!
//! let client = CallManagerClient::init(&bus, ClientConfig::default()).await.unwrap();
//! client.dial_call("+15551234", CallType::Voice, SimSlot::Default).await.unwrap();
//! client.deinit().unwrap();
//! # });
//! ```

pub mod call;
pub mod client;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod registration;
pub mod signal;
pub mod transport;

pub use call::{
    AnswerType, AudioState, CallDirection, CallDomain, CallEvent, CallEventRecord, CallRecord, CallSlots,
    CallState, CallStatus, CallType, ConferenceCallRecord, DialStatus, DtmfIndication, DtmfResponse,
    EndCause, MuteStatus, NameMode, ReleaseType, SimSlot, VoiceRecordExtra, VoiceRecordStatus,
};
pub use client::config::ClientConfig;
pub use client::CallManagerClient;
pub use error::{CallManagerError, ClientResult};
pub use signal::{DispatchStats, SignalCallback, SignalKind};

/// Version of the call-manager client library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
