//! Conversion between `a{sv}` dictionaries and call records
//!
//! Decoding starts from the default record and overwrites only the fields
//! whose keys are present. Unknown keys are skipped. A known key carrying a
//! value of the wrong type, or an enum value outside the wire range, is
//! logged and leaves the field at its default; record decoding itself never
//! fails.
//!
//! Scalars outside the records are stricter: an out-of-range value there
//! drops the whole signal frame, see [`crate::signal::payload`].

use thiserror::Error;
use tracing::{trace, warn};

use super::record::{CallRecord, CallSlots, ConferenceCallRecord};
use super::types::{CallDirection, CallState, CallType, NameMode};
use crate::transport::{tuple_signature, Value, VariantDict};

/// Contact index the daemon uses for "no contact"
const NO_CONTACT: u32 = u32::MAX;

/// Record keys on the wire
pub mod keys {
    pub const CALL_ID: &str = "call_id";
    pub const CALL_DIRECTION: &str = "call_direction";
    pub const CALL_NUMBER: &str = "call_number";
    pub const CALLING_NAME: &str = "calling_name";
    pub const CALL_TYPE: &str = "call_type";
    pub const CALL_STATE: &str = "call_state";
    pub const MEMBER_COUNT: &str = "member_count";
    pub const IS_ECC: &str = "is_ecc";
    pub const IS_VOICEMAIL_NUMBER: &str = "is_voicemail_number";
    pub const PERSON_ID: &str = "person_id";
    pub const START_TIME: &str = "start_time";
    pub const NAME_MODE: &str = "name_mode";
}

/// A payload did not have the shape its signal or method promises
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("payload signature mismatch: expected {expected}, found {found}")]
    Signature { expected: &'static str, found: String },

    #[error("value {value} is out of range for {field}")]
    OutOfRange { field: &'static str, value: i64 },
}

impl DecodeError {
    pub(crate) fn signature(expected: &'static str, args: &[Value]) -> Self {
        Self::Signature {
            expected,
            found: tuple_signature(args),
        }
    }
}

/// Decode one call record
pub fn decode_call_record(dict: &[(String, Value)]) -> CallRecord {
    let mut record = CallRecord::default();

    for (key, value) in dict {
        let applied = match key.as_str() {
            keys::CALL_ID => value.as_u32().map(|v| record.call_id = v),
            keys::CALL_DIRECTION => enum_field::<CallDirection>(key, value, |v| record.direction = v),
            keys::CALL_NUMBER => value.as_str().map(|v| record.number = Some(v.to_string())),
            keys::CALLING_NAME => value
                .as_str()
                .map(|v| record.calling_name = Some(v.to_string())),
            keys::CALL_TYPE => enum_field::<CallType>(key, value, |v| record.call_type = v),
            keys::CALL_STATE => enum_field::<CallState>(key, value, |v| record.state = v),
            keys::MEMBER_COUNT => value.as_i32().map(|v| {
                if v < 1 {
                    warn!(member_count = v, "Raising member count to one");
                }
                record.member_count = v.max(1) as u32;
            }),
            keys::IS_ECC => value.as_bool().map(|v| record.is_emergency = v),
            keys::IS_VOICEMAIL_NUMBER => value.as_bool().map(|v| record.is_voicemail = v),
            keys::PERSON_ID => value.as_u32().map(|v| record.contact_index = contact_index(v)),
            keys::START_TIME => value.as_i64().map(|v| record.start_time = v),
            keys::NAME_MODE => enum_field::<NameMode>(key, value, |v| record.name_mode = v),
            _ => {
                trace!(key = %key, "Skipping unknown call record key");
                Some(())
            }
        };

        if applied.is_none() {
            warn!(key = %key, signature = value.signature(), "Ignoring call record entry with unexpected value");
        }
    }

    record
}

/// Decode one conference participant
pub fn decode_conference_record(dict: &[(String, Value)]) -> ConferenceCallRecord {
    let mut record = ConferenceCallRecord::default();

    for (key, value) in dict {
        let applied = match key.as_str() {
            keys::CALL_ID => value.as_u32().map(|v| record.call_id = v),
            keys::CALL_NUMBER => value.as_str().map(|v| record.number = Some(v.to_string())),
            keys::PERSON_ID => value.as_u32().map(|v| record.contact_index = contact_index(v)),
            keys::NAME_MODE => enum_field::<NameMode>(key, value, |v| record.name_mode = v),
            _ => Some(()),
        };

        if applied.is_none() {
            warn!(key = %key, signature = value.signature(), "Ignoring conference entry with unexpected value");
        }
    }

    record
}

/// Decode an optional slot: an empty dictionary means "no call"
pub fn decode_slot(value: &Value) -> Result<Option<CallRecord>, DecodeError> {
    match value.as_dict() {
        Some([]) => Ok(None),
        Some(dict) => Ok(Some(decode_call_record(dict))),
        None => Err(DecodeError::signature("a{sv}", std::slice::from_ref(value))),
    }
}

/// Decode the `(a{sv}a{sv}a{sv})` incoming/active/held triple
pub fn decode_slots(incoming: &Value, active_dial: &Value, held: &Value) -> Result<CallSlots, DecodeError> {
    Ok(CallSlots {
        incoming: decode_slot(incoming)?,
        active_dial: decode_slot(active_dial)?,
        held: decode_slot(held)?,
    })
}

/// Encode a call record with every key present
pub fn encode_call_record(record: &CallRecord) -> VariantDict {
    let mut dict: VariantDict = vec![
        (keys::CALL_ID.into(), Value::UInt32(record.call_id)),
        (keys::CALL_DIRECTION.into(), Value::Int32(record.direction.as_raw())),
    ];
    if let Some(number) = &record.number {
        dict.push((keys::CALL_NUMBER.into(), Value::Str(number.clone())));
    }
    if let Some(name) = &record.calling_name {
        dict.push((keys::CALLING_NAME.into(), Value::Str(name.clone())));
    }
    dict.extend([
        (keys::CALL_TYPE.into(), Value::Int32(record.call_type.as_raw())),
        (keys::CALL_STATE.into(), Value::Int32(record.state.as_raw())),
        (keys::MEMBER_COUNT.into(), Value::Int32(record.member_count as i32)),
        (keys::IS_ECC.into(), Value::Bool(record.is_emergency)),
        (keys::IS_VOICEMAIL_NUMBER.into(), Value::Bool(record.is_voicemail)),
        (
            keys::PERSON_ID.into(),
            Value::UInt32(record.contact_index.unwrap_or(NO_CONTACT)),
        ),
        (keys::START_TIME.into(), Value::Int64(record.start_time)),
        (keys::NAME_MODE.into(), Value::Int32(record.name_mode.as_raw())),
    ]);
    dict
}

pub fn encode_conference_record(record: &ConferenceCallRecord) -> VariantDict {
    let mut dict: VariantDict = vec![(keys::CALL_ID.into(), Value::UInt32(record.call_id))];
    if let Some(number) = &record.number {
        dict.push((keys::CALL_NUMBER.into(), Value::Str(number.clone())));
    }
    dict.push((
        keys::PERSON_ID.into(),
        Value::UInt32(record.contact_index.unwrap_or(NO_CONTACT)),
    ));
    dict.push((keys::NAME_MODE.into(), Value::Int32(record.name_mode.as_raw())));
    dict
}

/// Encode an optional slot, `None` becoming the empty dictionary
pub fn encode_slot(record: Option<&CallRecord>) -> Value {
    Value::Dict(record.map(encode_call_record).unwrap_or_default())
}

fn contact_index(raw: u32) -> Option<u32> {
    (raw != NO_CONTACT).then_some(raw)
}

/// Apply an enum-valued entry; `None` means the entry was not an integer
fn enum_field<T>(key: &str, value: &Value, set: impl FnOnce(T)) -> Option<()>
where
    T: TryFrom<i32, Error = i32>,
{
    let raw = value.as_i32()?;
    match T::try_from(raw) {
        Ok(v) => set(v),
        Err(raw) => warn!(key = %key, value = raw, "Unknown enum value in call record, keeping default"),
    }
    Some(())
}
