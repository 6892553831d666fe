//! Call data model: wire enumerations and the records built from payloads

pub mod codec;
pub mod record;
pub mod types;

pub use codec::DecodeError;
pub use record::{CallEventRecord, CallRecord, CallSlots, ConferenceCallRecord};
pub use types::{
    AnswerType, AudioState, CallDirection, CallDomain, CallEvent, CallState, CallStatus, CallType,
    DialStatus, DtmfIndication, DtmfResponse, EndCause, MuteStatus, NameMode, ReleaseType, SimSlot,
    VoiceRecordExtra, VoiceRecordStatus,
};
