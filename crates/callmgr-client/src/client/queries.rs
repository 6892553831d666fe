//! Queries for the daemon's current call state
//!
//! Query results are returned by value; the caller owns them.

use tracing::debug;

use super::CallManagerClient;
use super::invoke::unexpected_reply;
use crate::call::codec::{decode_call_record, decode_conference_record, decode_slots};
use crate::call::{CallRecord, CallSlots, CallStatus, ConferenceCallRecord, MuteStatus};
use crate::error::{CallManagerError, ClientResult};
use crate::protocol::method;
use crate::transport::Value;

impl CallManagerClient {
    /// Every call the daemon tracks
    ///
    /// Empty rows in the reply are skipped.
    pub async fn get_all_call_list(&self) -> ClientResult<Vec<CallRecord>> {
        let reply = self.invoke(method::GET_CALL_LIST, Vec::new()).await?;
        let [Value::DictArray(rows)] = reply.as_slice() else {
            return Err(unexpected_reply(method::GET_CALL_LIST, "(aa{sv})", &reply));
        };

        let calls: Vec<CallRecord> = rows
            .iter()
            .filter(|row| !row.is_empty())
            .map(|row| decode_call_record(row))
            .collect();
        debug!(count = calls.len(), "Fetched call list");
        Ok(calls)
    }

    /// Participants of the current conference call
    pub async fn get_conference_call_list(&self) -> ClientResult<Vec<ConferenceCallRecord>> {
        let reply = self.invoke(method::GET_CONF_CALL_LIST, Vec::new()).await?;
        let [Value::DictArray(rows)] = reply.as_slice() else {
            return Err(unexpected_reply(method::GET_CONF_CALL_LIST, "(aa{sv})", &reply));
        };

        let members: Vec<ConferenceCallRecord> = rows
            .iter()
            .filter(|row| !row.is_empty())
            .map(|row| decode_conference_record(row))
            .collect();
        debug!(count = members.len(), "Fetched conference call list");
        Ok(members)
    }

    /// The incoming, active-or-dialing and held calls
    pub async fn get_all_call_data(&self) -> ClientResult<CallSlots> {
        let reply = self.invoke(method::GET_ALL_CALL_DATA, Vec::new()).await?;
        match reply.as_slice() {
            [incoming, active_dial, held] => decode_slots(incoming, active_dial, held)
                .map_err(|_| unexpected_reply(method::GET_ALL_CALL_DATA, "(a{sv}a{sv}a{sv})", &reply)),
            _ => Err(unexpected_reply(method::GET_ALL_CALL_DATA, "(a{sv}a{sv}a{sv})", &reply)),
        }
    }

    /// Aggregate telephony status of the device
    pub async fn get_call_status(&self) -> ClientResult<CallStatus> {
        let reply = self.invoke(method::GET_CALL_STATUS, Vec::new()).await?;
        match reply.as_slice() {
            [Value::Int32(status), Value::Int32(call_type)] => {
                debug!(status = *status, call_type = *call_type, "Fetched call status");
                CallStatus::try_from(*status).map_err(|raw| {
                    CallManagerError::operation_failed(format!("unknown call status {}", raw))
                })
            }
            _ => Err(unexpected_reply(method::GET_CALL_STATUS, "(ii)", &reply)),
        }
    }

    pub async fn get_mute_status(&self) -> ClientResult<MuteStatus> {
        let reply = self.invoke(method::GET_MUTE_STATUS, Vec::new()).await?;
        match reply.as_slice() {
            [Value::Int32(status)] => MuteStatus::try_from(*status).map_err(|raw| {
                CallManagerError::operation_failed(format!("unknown mute status {}", raw))
            }),
            _ => Err(unexpected_reply(method::GET_MUTE_STATUS, "(i)", &reply)),
        }
    }

    /// Whether the answering machine is enabled
    pub async fn get_answering_machine_status(&self) -> ClientResult<bool> {
        let reply = self
            .invoke(method::GET_ANSWERING_MACHINE_STATUS, Vec::new())
            .await?;
        match reply.as_slice() {
            [Value::Bool(enabled)] => Ok(*enabled),
            _ => Err(unexpected_reply(
                method::GET_ANSWERING_MACHINE_STATUS,
                "(b)",
                &reply,
            )),
        }
    }
}
