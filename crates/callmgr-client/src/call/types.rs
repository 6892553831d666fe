//! Wire enumerations of the call-manager protocol
//!
//! Every enum here maps one-to-one onto the integer values the daemon puts
//! on the wire. Conversion from a raw value is fallible: `TryFrom<i32>`
//! hands the raw value back when it is outside the known range.

use serde::{Deserialize, Serialize};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in wire order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Raw wire value
            pub fn as_raw(self) -> i32 {
                match self {
                    $( $name::$variant => $value ),+
                }
            }
        }

        impl TryFrom<i32> for $name {
            type Error = i32;

            fn try_from(raw: i32) -> Result<Self, Self::Error> {
                match raw {
                    $( v if v == $value => Ok($name::$variant), )+
                    _ => Err(raw),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:?}", self)
            }
        }
    };
}

wire_enum! {
    /// Who originated the call
    #[derive(Default)]
    pub enum CallDirection {
        /// Mobile originated
        #[default]
        Outgoing = 0,
        /// Mobile terminated
        Incoming = 1,
    }
}

wire_enum! {
    #[derive(Default)]
    pub enum CallType {
        #[default]
        Voice = 0,
        Video = 1,
        Invalid = 2,
    }
}

wire_enum! {
    /// State of a single call as tracked by the daemon
    #[derive(Default)]
    pub enum CallState {
        #[default]
        Idle = 0,
        Active = 1,
        Held = 2,
        Dialing = 3,
        Alert = 4,
        Incoming = 5,
        Waiting = 6,
    }
}

wire_enum! {
    /// Network domain carrying the call
    #[derive(Default)]
    pub enum CallDomain {
        /// Circuit switched
        #[default]
        CircuitSwitched = 0,
        /// Packet switched
        PacketSwitched = 1,
        /// Hands-free profile over a short-range link
        HandsFree = 2,
    }
}

wire_enum! {
    /// How the caller's name may be displayed
    #[derive(Default)]
    pub enum NameMode {
        #[default]
        None = 0,
        Unknown = 1,
        Private = 2,
        Payphone = 3,
    }
}

wire_enum! {
    /// Kind of call-event notification
    pub enum CallEvent {
        Idle = 0,
        Dialing = 1,
        Active = 2,
        Held = 3,
        Alert = 4,
        Incoming = 5,
        Waiting = 6,
        Join = 7,
        Split = 8,
        Swapped = 9,
        Retrieved = 10,
        SatCallControl = 11,
    }
}

wire_enum! {
    /// SIM slot a call is placed on
    #[derive(Default)]
    pub enum SimSlot {
        Slot1 = 0,
        Slot2 = 1,
        /// Let the daemon pick the preferred slot
        #[default]
        Default = 2,
    }
}

wire_enum! {
    /// Why a call ended
    #[derive(Default)]
    pub enum EndCause {
        CallEnded = 0,
        CallDisconnected = 1,
        ServiceNotAllowed = 2,
        CallBarred = 3,
        NoService = 4,
        NetworkBusy = 5,
        NetworkFailed = 6,
        NoAnswer = 7,
        NoCredit = 8,
        Rejected = 9,
        UserBusy = 10,
        WrongGroup = 11,
        CallNotAllowed = 12,
        TapiError = 13,
        CallFailed = 14,
        NoUserResponding = 15,
        UserAlertingNoAnswer = 16,
        ServiceTemporarilyUnavailable = 17,
        UserUnavailable = 18,
        InvalidNumberFormat = 19,
        NumberChanged = 20,
        UnassignedNumber = 21,
        UserDoesNotRespond = 22,
        ImeiRejected = 23,
        FixedDialingNumberOnly = 24,
        RejectedBySatCallControl = 25,
        /// Sent with events that do not end a call
        #[default]
        Unspecified = 26,
    }
}

wire_enum! {
    /// Outcome of a dial request, reported asynchronously
    pub enum DialStatus {
        Success = 0,
        Cancel = 1,
        Fail = 2,
        FailSupplementaryService = 3,
        FailFixedDialing = 4,
        FailFlightMode = 5,
    }
}

wire_enum! {
    pub enum DtmfIndication {
        Idle = 0,
        Progressing = 1,
        Wait = 2,
    }
}

wire_enum! {
    /// Current audio output path
    pub enum AudioState {
        None = 0,
        Speaker = 1,
        Receiver = 2,
        Earjack = 3,
        Bluetooth = 4,
    }
}

wire_enum! {
    pub enum VoiceRecordStatus {
        Started = 0,
        Stopped = 1,
    }
}

wire_enum! {
    /// Detail attached to a voice-record status change
    ///
    /// Values up to `0x0f` describe a start, values from `0x10` a stop.
    pub enum VoiceRecordExtra {
        StartNone = 0x00,
        StartNormal = 0x01,
        StartAnswerMessage = 0x02,
        StartMax = 0x0f,
        StopType = 0x10,
        StopByNormal = 0x11,
        StopByMaxSize = 0x12,
        StopByNoFreeSpace = 0x13,
        StopByTimeLimit = 0x14,
        StopByError = 0x15,
        StopMax = 0x1f,
    }
}

impl VoiceRecordExtra {
    pub fn is_stop(self) -> bool {
        self.as_raw() >= 0x10
    }
}

wire_enum! {
    /// How to treat existing calls when answering
    pub enum AnswerType {
        Normal = 0,
        HoldActiveAndAccept = 1,
        ReleaseActiveAndAccept = 2,
        ReleaseHoldAndAccept = 3,
        ReleaseAllAndAccept = 4,
    }
}

wire_enum! {
    /// Which calls an end request releases
    pub enum ReleaseType {
        ByCallHandle = 0,
        AllCalls = 1,
        AllHoldCalls = 2,
        AllActiveCalls = 3,
    }
}

wire_enum! {
    /// Reply to a DTMF wait indication
    pub enum DtmfResponse {
        Cancel = 0,
        Continue = 1,
    }
}

wire_enum! {
    /// Aggregate telephony status of the device
    pub enum CallStatus {
        Idle = 0,
        Ringing = 1,
        Offhook = 2,
    }
}

wire_enum! {
    pub enum MuteStatus {
        Off = 0,
        On = 1,
    }
}
