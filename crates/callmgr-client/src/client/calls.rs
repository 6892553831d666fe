//! Call control requests
//!
//! Each request maps onto one daemon method. Arguments are checked before
//! anything goes on the wire; the daemon's integer status is folded into
//! `Ok(())` or `OperationFailed`.

use tracing::{debug, info};

use super::CallManagerClient;
use super::invoke::unexpected_reply;
use crate::call::{AnswerType, CallType, ReleaseType, SimSlot};
use crate::error::{CallManagerError, ClientResult};
use crate::protocol::method;
use crate::transport::Value;

impl CallManagerClient {
    /// Place a call to `number`
    ///
    /// The outcome of the attempt arrives later through the dial-status
    /// callback.
    pub async fn dial_call(&self, number: &str, call_type: CallType, sim_slot: SimSlot) -> ClientResult<()> {
        self.dial(number, call_type, sim_slot, false).await
    }

    /// Place a voice call to an emergency contact on the default SIM slot
    pub async fn dial_emergency_contact_call(&self, number: &str) -> ClientResult<()> {
        self.dial(number, CallType::Voice, SimSlot::Default, true).await
    }

    async fn dial(&self, number: &str, call_type: CallType, sim_slot: SimSlot, emergency_contact: bool) -> ClientResult<()> {
        if number.is_empty() {
            return Err(CallManagerError::invalid_parameter("number is empty"));
        }
        if call_type == CallType::Invalid {
            return Err(CallManagerError::invalid_parameter("call type is invalid"));
        }
        debug!(number = %number, call_type = %call_type, sim_slot = %sim_slot, emergency_contact, "Dialing");

        self.invoke_status(
            method::DIAL_CALL,
            vec![
                Value::Str(number.to_string()),
                Value::Int32(call_type.as_raw()),
                Value::Int32(sim_slot.as_raw()),
                Value::Int32(0),
                Value::Bool(emergency_contact),
            ],
        )
        .await?;
        info!("Dial request accepted");
        Ok(())
    }

    /// End one call or a group of calls
    pub async fn end_call(&self, call_id: u32, release_type: ReleaseType) -> ClientResult<()> {
        self.invoke_status(
            method::END_CALL,
            vec![Value::UInt32(call_id), Value::Int32(release_type.as_raw())],
        )
        .await?;
        info!("Ended call {} ({})", call_id, release_type);
        Ok(())
    }

    /// Reject the incoming call
    pub async fn reject_call(&self) -> ClientResult<()> {
        self.invoke_status(method::REJECT_CALL, Vec::new()).await
    }

    /// Answer the incoming call, treating existing calls per `answer_type`
    pub async fn answer_call(&self, answer_type: AnswerType) -> ClientResult<()> {
        self.invoke_status(method::ANSWER_CALL, vec![Value::Int32(answer_type.as_raw())])
            .await?;
        info!("Answered call ({})", answer_type);
        Ok(())
    }

    pub async fn swap_call(&self) -> ClientResult<()> {
        self.invoke_status(method::SWAP_CALL, Vec::new()).await
    }

    pub async fn hold_call(&self) -> ClientResult<()> {
        self.invoke_status(method::HOLD_CALL, Vec::new()).await
    }

    pub async fn unhold_call(&self) -> ClientResult<()> {
        self.invoke_status(method::UNHOLD_CALL, Vec::new()).await
    }

    /// Merge the active and held calls into a conference
    pub async fn join_call(&self) -> ClientResult<()> {
        self.invoke_status(method::JOIN_CALL, Vec::new()).await
    }

    /// Take `call_id` out of the conference
    pub async fn split_call(&self, call_id: u32) -> ClientResult<()> {
        self.invoke_status(method::SPLIT_CALL, vec![Value::UInt32(call_id)]).await
    }

    /// Connect the active and held parties and drop out
    pub async fn transfer_call(&self) -> ClientResult<()> {
        self.invoke_status(method::TRANSFER_CALL, Vec::new()).await
    }

    pub async fn stop_alert(&self) -> ClientResult<()> {
        self.invoke_status(method::STOP_ALERT, Vec::new()).await
    }

    pub async fn start_alert(&self) -> ClientResult<()> {
        self.invoke_status(method::START_ALERT, Vec::new()).await
    }

    /// Ask the daemon to bring the call UI to the foreground
    pub async fn activate_ui(&self) -> ClientResult<()> {
        self.invoke_status(method::ACTIVATE_UI, Vec::new()).await
    }

    /// Let the daemon watch this application's bus name
    ///
    /// The session takes ownership of `app_id` on the bus, then registers it
    /// with the daemon so calls can be recovered if the application dies.
    pub async fn enable_recovery(&self, app_id: &str) -> ClientResult<()> {
        self.ensure_open()?;
        if app_id.is_empty() {
            return Err(CallManagerError::invalid_parameter("application id is empty"));
        }

        self.inner.channel.request_name(app_id).await.map_err(|e| {
            tracing::error!(app_id, error = %e, "Failed to own application bus name");
            CallManagerError::operation_failed(format!("cannot own {}: {}", app_id, e))
        })?;

        let reply = self
            .invoke(method::SET_WATCH_NAME, vec![Value::Str(app_id.to_string())])
            .await?;
        match reply.as_slice() {
            // The status value carries no meaning for this method.
            [Value::Int32(status)] => {
                debug!(app_id, status = *status, "Recovery watch registered");
                Ok(())
            }
            _ => Err(unexpected_reply(method::SET_WATCH_NAME, "(i)", &reply)),
        }
    }
}
