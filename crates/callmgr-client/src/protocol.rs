//! Bus names and members of the call-manager daemon

use std::time::Duration;

/// Well-known bus name of the daemon
pub const SERVICE: &str = "org.tizen.callmgr";
/// Object path of the daemon's call manager object
pub const OBJECT_PATH: &str = "/org/tizen/callmgr";
/// Interface carrying both methods and signals
pub const INTERFACE: &str = "org.tizen.callmgr";

/// Default time a method call may wait for its reply
pub const DEFAULT_METHOD_TIMEOUT: Duration = Duration::from_millis(5000);

/// Method names
pub mod method {
    pub const DIAL_CALL: &str = "DialCall";
    pub const SWAP_CALL: &str = "SwapCall";
    pub const HOLD_CALL: &str = "HoldCall";
    pub const UNHOLD_CALL: &str = "UnholdCall";
    pub const END_CALL: &str = "EndCall";
    pub const REJECT_CALL: &str = "RejectCall";
    pub const JOIN_CALL: &str = "JoinCall";
    pub const SPLIT_CALL: &str = "SplitCall";
    pub const TRANSFER_CALL: &str = "TransferCall";
    pub const ANSWER_CALL: &str = "AnswerCall";
    pub const GET_CALL_LIST: &str = "GetCallList";
    pub const GET_CONF_CALL_LIST: &str = "GetConfCallList";
    pub const GET_ALL_CALL_DATA: &str = "GetAllCallData";
    pub const SEND_DTMF_RESP: &str = "SendDtmfResp";
    pub const START_DTMF: &str = "StartDtmf";
    pub const STOP_DTMF: &str = "StopDtmf";
    pub const BURST_DTMF: &str = "BurstDtmf";
    pub const SPK_ON: &str = "SpkOn";
    pub const SPK_OFF: &str = "SpkOff";
    pub const BLUETOOTH_ON: &str = "BluetoothOn";
    pub const BLUETOOTH_OFF: &str = "BluetoothOff";
    pub const SET_EXTRA_VOL: &str = "SetExtraVol";
    pub const SET_MUTE_STATE: &str = "SetMuteState";
    pub const GET_AUDIO_STATE: &str = "GetAudioState";
    pub const STOP_ALERT: &str = "StopAlert";
    pub const START_ALERT: &str = "StartAlert";
    pub const ACTIVATE_UI: &str = "ActivateUi";
    pub const GET_CALL_STATUS: &str = "GetCallStatus";
    pub const SET_WATCH_NAME: &str = "SetWatchName";
    pub const START_VOICE_RECORD: &str = "StartVoiceRecord";
    pub const STOP_VOICE_RECORD: &str = "StopVoiceRecord";
    pub const GET_MUTE_STATUS: &str = "GetMuteStatus";
    pub const GET_ANSWERING_MACHINE_STATUS: &str = "GetAnsweringMachineStatus";
}
