//! Typed signal payloads
//!
//! Scalars carried directly in a signal (the call event, SIM slot, end
//! cause, statuses) must be inside their wire range. A value the client
//! does not know fails the decode and the whole frame is dropped and
//! counted in `decode_failures`; no callback sees a guessed value.
//!
//! Call records nested in a frame decode leniently instead, see
//! [`crate::call::codec`]. An unknown enum value inside a record only
//! resets that field.

use crate::call::codec::{decode_slots, DecodeError};
use crate::call::{
    AudioState, CallEvent, CallEventRecord, CallStatus, CallType, DialStatus, DtmfIndication, EndCause,
    MuteStatus, SimSlot, VoiceRecordExtra, VoiceRecordStatus,
};
use crate::transport::Value;

use super::SignalKind;

/// A decoded signal
#[derive(Debug, Clone, PartialEq)]
pub enum SignalPayload {
    CallStatus {
        status: CallStatus,
        call_type: CallType,
        number: String,
    },
    CallEvent {
        event: CallEvent,
        record: CallEventRecord,
    },
    DialStatus(DialStatus),
    DtmfIndication {
        indication: DtmfIndication,
        digits: String,
    },
    AudioState(AudioState),
    GoForeground,
    VoiceRecordStatus {
        status: VoiceRecordStatus,
        extra: VoiceRecordExtra,
    },
    MuteStatus(MuteStatus),
}

impl SignalPayload {
    /// Decode `args` as the payload of a `kind` signal
    pub fn decode(kind: SignalKind, args: &[Value]) -> Result<Self, DecodeError> {
        let expected = kind.signature();
        let mismatch = || DecodeError::signature(expected, args);

        match kind {
            SignalKind::CallStatus => match args {
                [Value::Int32(status), Value::Int32(call_type), Value::Str(number)] => {
                    Ok(SignalPayload::CallStatus {
                        status: wire("call status", *status)?,
                        call_type: wire("call type", *call_type)?,
                        number: number.clone(),
                    })
                }
                _ => Err(mismatch()),
            },
            SignalKind::CallEvent => match args {
                [
                    Value::Int32(event),
                    Value::UInt32(call_id),
                    Value::Int32(sim_slot),
                    Value::Int32(end_cause),
                    incoming,
                    active_dial,
                    held,
                ] => {
                    let event = wire::<CallEvent>("call event", *event)?;
                    let record = CallEventRecord {
                        call_id: *call_id,
                        sim_slot: wire::<SimSlot>("sim slot", *sim_slot)?,
                        end_cause: wire::<EndCause>("end cause", *end_cause)?,
                        slots: decode_slots(incoming, active_dial, held).map_err(|_| mismatch())?,
                    };
                    Ok(SignalPayload::CallEvent { event, record })
                }
                _ => Err(mismatch()),
            },
            SignalKind::DialStatus => match args {
                [Value::Int32(status)] => Ok(SignalPayload::DialStatus(wire("dial status", *status)?)),
                _ => Err(mismatch()),
            },
            SignalKind::DtmfIndication => match args {
                [Value::Int32(indication), Value::Str(digits)] => Ok(SignalPayload::DtmfIndication {
                    indication: wire("dtmf indication", *indication)?,
                    digits: digits.clone(),
                }),
                _ => Err(mismatch()),
            },
            SignalKind::AudioState => match args {
                [Value::Int32(state)] => Ok(SignalPayload::AudioState(wire("audio state", *state)?)),
                _ => Err(mismatch()),
            },
            SignalKind::GoForeground => match args {
                [] => Ok(SignalPayload::GoForeground),
                _ => Err(mismatch()),
            },
            SignalKind::VoiceRecordStatus => match args {
                [Value::Int32(status), Value::Int32(extra)] => Ok(SignalPayload::VoiceRecordStatus {
                    status: wire("voice record status", *status)?,
                    extra: wire("voice record extra", *extra)?,
                }),
                _ => Err(mismatch()),
            },
            SignalKind::MuteStatus => match args {
                [Value::Int32(status)] => Ok(SignalPayload::MuteStatus(wire("mute status", *status)?)),
                _ => Err(mismatch()),
            },
        }
    }

    pub fn kind(&self) -> SignalKind {
        match self {
            SignalPayload::CallStatus { .. } => SignalKind::CallStatus,
            SignalPayload::CallEvent { .. } => SignalKind::CallEvent,
            SignalPayload::DialStatus(_) => SignalKind::DialStatus,
            SignalPayload::DtmfIndication { .. } => SignalKind::DtmfIndication,
            SignalPayload::AudioState(_) => SignalKind::AudioState,
            SignalPayload::GoForeground => SignalKind::GoForeground,
            SignalPayload::VoiceRecordStatus { .. } => SignalKind::VoiceRecordStatus,
            SignalPayload::MuteStatus(_) => SignalKind::MuteStatus,
        }
    }

    /// Nested call records carried by this payload
    pub fn nested_records(&self) -> usize {
        match self {
            SignalPayload::CallEvent { record, .. } => record.slots().len(),
            _ => 0,
        }
    }
}

fn wire<T>(field: &'static str, raw: i32) -> Result<T, DecodeError>
where
    T: TryFrom<i32, Error = i32>,
{
    T::try_from(raw).map_err(|value| DecodeError::OutOfRange {
        field,
        value: i64::from(value),
    })
}
