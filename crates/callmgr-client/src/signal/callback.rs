//! Application callbacks, one shape per signal kind
//!
//! Context the application needs inside a callback is captured by the
//! closure itself.

use std::fmt;
use std::sync::Arc;

use crate::call::{
    AudioState, CallEvent, CallEventRecord, CallStatus, DialStatus, DtmfIndication, MuteStatus,
    VoiceRecordExtra, VoiceRecordStatus,
};

use super::{SignalKind, SignalPayload};

pub type CallStatusHandler = dyn Fn(CallStatus, &str) + Send + Sync;
/// The record is borrowed for the duration of the call; clone what must outlive it
pub type CallEventHandler = dyn Fn(CallEvent, &CallEventRecord) + Send + Sync;
pub type DialStatusHandler = dyn Fn(DialStatus) + Send + Sync;
pub type DtmfIndicationHandler = dyn Fn(DtmfIndication, &str) + Send + Sync;
pub type AudioStateHandler = dyn Fn(AudioState) + Send + Sync;
pub type GoForegroundHandler = dyn Fn() + Send + Sync;
pub type VoiceRecordStatusHandler = dyn Fn(VoiceRecordStatus, VoiceRecordExtra) + Send + Sync;
pub type MuteStatusHandler = dyn Fn(MuteStatus) + Send + Sync;

/// A registered callback
#[derive(Clone)]
pub enum SignalCallback {
    CallStatus(Arc<CallStatusHandler>),
    CallEvent(Arc<CallEventHandler>),
    DialStatus(Arc<DialStatusHandler>),
    DtmfIndication(Arc<DtmfIndicationHandler>),
    AudioState(Arc<AudioStateHandler>),
    GoForeground(Arc<GoForegroundHandler>),
    VoiceRecordStatus(Arc<VoiceRecordStatusHandler>),
    MuteStatus(Arc<MuteStatusHandler>),
}

impl SignalCallback {
    pub fn call_status(f: impl Fn(CallStatus, &str) + Send + Sync + 'static) -> Self {
        Self::CallStatus(Arc::new(f))
    }

    pub fn call_event(f: impl Fn(CallEvent, &CallEventRecord) + Send + Sync + 'static) -> Self {
        Self::CallEvent(Arc::new(f))
    }

    pub fn dial_status(f: impl Fn(DialStatus) + Send + Sync + 'static) -> Self {
        Self::DialStatus(Arc::new(f))
    }

    pub fn dtmf_indication(f: impl Fn(DtmfIndication, &str) + Send + Sync + 'static) -> Self {
        Self::DtmfIndication(Arc::new(f))
    }

    pub fn audio_state(f: impl Fn(AudioState) + Send + Sync + 'static) -> Self {
        Self::AudioState(Arc::new(f))
    }

    pub fn go_foreground(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self::GoForeground(Arc::new(f))
    }

    pub fn voice_record_status(f: impl Fn(VoiceRecordStatus, VoiceRecordExtra) + Send + Sync + 'static) -> Self {
        Self::VoiceRecordStatus(Arc::new(f))
    }

    pub fn mute_status(f: impl Fn(MuteStatus) + Send + Sync + 'static) -> Self {
        Self::MuteStatus(Arc::new(f))
    }

    /// Signal this callback listens to
    pub fn kind(&self) -> SignalKind {
        match self {
            Self::CallStatus(_) => SignalKind::CallStatus,
            Self::CallEvent(_) => SignalKind::CallEvent,
            Self::DialStatus(_) => SignalKind::DialStatus,
            Self::DtmfIndication(_) => SignalKind::DtmfIndication,
            Self::AudioState(_) => SignalKind::AudioState,
            Self::GoForeground(_) => SignalKind::GoForeground,
            Self::VoiceRecordStatus(_) => SignalKind::VoiceRecordStatus,
            Self::MuteStatus(_) => SignalKind::MuteStatus,
        }
    }

    /// Call the handler with `payload`
    ///
    /// Returns `false` without calling anything if the payload belongs to
    /// another signal kind.
    pub(crate) fn invoke(&self, payload: &SignalPayload) -> bool {
        match (self, payload) {
            (Self::CallStatus(f), SignalPayload::CallStatus { status, number, .. }) => f(*status, number.as_str()),
            (Self::CallEvent(f), SignalPayload::CallEvent { event, record }) => f(*event, record),
            (Self::DialStatus(f), SignalPayload::DialStatus(status)) => f(*status),
            (Self::DtmfIndication(f), SignalPayload::DtmfIndication { indication, digits }) => {
                f(*indication, digits.as_str())
            }
            (Self::AudioState(f), SignalPayload::AudioState(state)) => f(*state),
            (Self::GoForeground(f), SignalPayload::GoForeground) => f(),
            (Self::VoiceRecordStatus(f), SignalPayload::VoiceRecordStatus { status, extra }) => f(*status, *extra),
            (Self::MuteStatus(f), SignalPayload::MuteStatus(status)) => f(*status),
            _ => return false,
        }
        true
    }
}

impl fmt::Debug for SignalCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SignalCallback").field(&self.kind()).finish()
    }
}
