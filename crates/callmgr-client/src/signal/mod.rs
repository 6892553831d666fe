//! Signal subscription and dispatch
//!
//! The daemon broadcasts eight kinds of signals on its interface. Each kind
//! has its own payload shape ([`SignalPayload`]) and its own callback shape
//! ([`SignalCallback`]). The [`router::SignalRouter`] ties them together.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod callback;
pub mod payload;
pub mod router;

pub use callback::SignalCallback;
pub use payload::SignalPayload;
pub use router::{DispatchStats, SignalRouter};

/// The signals a client can register for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    CallStatus,
    CallEvent,
    DialStatus,
    DtmfIndication,
    AudioState,
    GoForeground,
    VoiceRecordStatus,
    MuteStatus,
}

impl SignalKind {
    pub const ALL: [SignalKind; 8] = [
        SignalKind::CallStatus,
        SignalKind::CallEvent,
        SignalKind::DialStatus,
        SignalKind::DtmfIndication,
        SignalKind::AudioState,
        SignalKind::GoForeground,
        SignalKind::VoiceRecordStatus,
        SignalKind::MuteStatus,
    ];

    /// Signal member name on the bus
    pub fn member(self) -> &'static str {
        match self {
            SignalKind::CallStatus => "CallStatus",
            SignalKind::CallEvent => "CallEvent",
            SignalKind::DialStatus => "DialStatus",
            SignalKind::DtmfIndication => "DtmfIndi",
            SignalKind::AudioState => "AudioState",
            SignalKind::GoForeground => "GoForeground",
            SignalKind::VoiceRecordStatus => "VoiceRecordStatus",
            SignalKind::MuteStatus => "MuteStatus",
        }
    }

    pub fn from_member(member: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.member() == member)
    }

    /// Payload signature the daemon sends for this kind
    pub fn signature(self) -> &'static str {
        match self {
            SignalKind::CallStatus => "(iis)",
            SignalKind::CallEvent => "(iuiia{sv}a{sv}a{sv})",
            SignalKind::DialStatus => "(i)",
            SignalKind::DtmfIndication => "(is)",
            SignalKind::AudioState => "(i)",
            SignalKind::GoForeground => "()",
            SignalKind::VoiceRecordStatus => "(ii)",
            SignalKind::MuteStatus => "(i)",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.member())
    }
}

/// Composite key a registration is stored under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignalKey {
    pub object_path: String,
    pub interface: String,
    pub kind: SignalKind,
}

impl SignalKey {
    pub fn new(object_path: impl Into<String>, interface: impl Into<String>, kind: SignalKind) -> Self {
        Self {
            object_path: object_path.into(),
            interface: interface.into(),
            kind,
        }
    }
}

impl fmt::Display for SignalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.object_path, self.interface, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_names_round_trip() {
        for kind in SignalKind::ALL {
            assert_eq!(SignalKind::from_member(kind.member()), Some(kind));
        }
        assert_eq!(SignalKind::from_member("DtmfIndication"), None);
    }

    #[test]
    fn test_key_display() {
        let key = SignalKey::new("/org/tizen/callmgr", "org.tizen.callmgr", SignalKind::DialStatus);
        assert_eq!(key.to_string(), "/org/tizen/callmgr:org.tizen.callmgr:DialStatus");
    }
}
