//! Scripted call-manager daemon on an in-process bus

#![allow(dead_code)]

use callmgr_client::protocol;
use callmgr_client::transport::local::LocalBus;
use callmgr_client::transport::{MethodCall, SignalFrame, TransportResult, Value};
use callmgr_client::{CallManagerClient, ClientConfig, SignalKind};

#[derive(Clone)]
pub struct FakeDaemon {
    pub bus: LocalBus,
}

impl FakeDaemon {
    pub fn new() -> Self {
        Self { bus: LocalBus::new() }
    }

    /// Serve `member` with a custom handler
    pub fn serve<F>(&self, member: &str, handler: F)
    where
        F: Fn(&[Value]) -> TransportResult<Vec<Value>> + Send + Sync + 'static,
    {
        self.bus
            .serve_method(protocol::SERVICE, protocol::OBJECT_PATH, protocol::INTERFACE, member, handler);
    }

    /// Serve `member` with a fixed reply
    pub fn reply(&self, member: &str, reply: Vec<Value>) {
        self.serve(member, move |_| Ok(reply.clone()));
    }

    /// Serve `member` with a fixed `(i)` status
    pub fn status(&self, member: &str, status: i32) {
        self.reply(member, vec![Value::Int32(status)]);
    }

    /// Broadcast a signal the way the daemon does
    pub fn emit(&self, kind: SignalKind, args: Vec<Value>) -> usize {
        self.bus.emit_signal(SignalFrame::new(
            protocol::SERVICE,
            protocol::OBJECT_PATH,
            protocol::INTERFACE,
            kind.member(),
            args,
        ))
    }

    /// Calls received for `member`, oldest first
    pub fn calls_to(&self, member: &str) -> Vec<MethodCall> {
        self.bus
            .method_calls()
            .into_iter()
            .filter(|call| call.member == member)
            .collect()
    }

    pub async fn client(&self) -> CallManagerClient {
        self.client_with(ClientConfig::default()).await
    }

    pub async fn client_with(&self, config: ClientConfig) -> CallManagerClient {
        CallManagerClient::init(&self.bus, config)
            .await
            .expect("client init against the fake daemon")
    }
}
