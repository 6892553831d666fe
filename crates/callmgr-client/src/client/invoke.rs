//! Method invocation with timeout, cancellation and error mapping

use std::time::Instant;
use tracing::{debug, error, warn};

use super::CallManagerClient;
use crate::error::{CallManagerError, ClientResult};
use crate::transport::{tuple_signature, MethodCall, Value};

impl CallManagerClient {
    /// Call `member` on the daemon and return its reply tuple
    ///
    /// Fails fast when the session's cancellation token fires; a reply that
    /// does not arrive within the configured timeout is `OperationFailed`.
    pub(crate) async fn invoke(&self, member: &'static str, args: Vec<Value>) -> ClientResult<Vec<Value>> {
        self.ensure_open()?;

        let inner = &self.inner;
        let timeout = inner.config.method_timeout();
        let call = MethodCall {
            destination: inner.config.service.clone(),
            object_path: inner.config.object_path.clone(),
            interface: inner.config.interface.clone(),
            member: member.to_string(),
            args,
            timeout,
        };
        debug!(method = member, signature = %tuple_signature(&call.args), "Invoking method");

        let cancel = inner.cancel.clone();
        let started = Instant::now();
        let reply = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(method = member, "Method call cancelled by deinit");
                return Err(CallManagerError::operation_failed(format!("{} was cancelled", member)));
            }
            reply = tokio::time::timeout(timeout, inner.channel.call_method(call)) => reply,
        };

        match reply {
            Err(_) => {
                error!(
                    method = member,
                    timeout_ms = timeout.as_millis() as u64,
                    "Operation timed out"
                );
                Err(CallManagerError::operation_failed(format!(
                    "{} timed out after {}ms",
                    member,
                    timeout.as_millis()
                )))
            }
            Ok(Err(e)) => {
                let mapped = CallManagerError::from(e);
                warn!(method = member, error = %mapped, "Method call failed");
                Err(mapped)
            }
            Ok(Ok(values)) => {
                debug!(
                    method = member,
                    reply = %tuple_signature(&values),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Method call completed"
                );
                Ok(values)
            }
        }
    }

    /// Call a method whose reply is a single `(i)` status, zero meaning success
    pub(crate) async fn invoke_status(&self, member: &'static str, args: Vec<Value>) -> ClientResult<()> {
        let reply = self.invoke(member, args).await?;
        match reply.as_slice() {
            [Value::Int32(0)] => Ok(()),
            [Value::Int32(code)] => {
                warn!(method = member, code = *code, "Daemon rejected request");
                Err(CallManagerError::operation_failed(format!(
                    "{} returned status {}",
                    member, code
                )))
            }
            _ => Err(unexpected_reply(member, "(i)", &reply)),
        }
    }
}

pub(crate) fn unexpected_reply(member: &str, expected: &str, reply: &[Value]) -> CallManagerError {
    let found = tuple_signature(reply);
    warn!(method = member, expected, found = %found, "Unexpected reply shape");
    CallManagerError::operation_failed(format!(
        "{} replied {} instead of {}",
        member, found, expected
    ))
}
