//! Requests to the daemon: argument marshaling, status folding and replies

mod common;

use callmgr_client::call::codec::{encode_call_record, encode_conference_record, encode_slot, keys};
use callmgr_client::protocol::method;
use callmgr_client::transport::value::dict;
use callmgr_client::transport::{TransportError, TransportErrorKind, Value};
use callmgr_client::{
    AnswerType, AudioState, CallManagerError, CallRecord, CallState, CallStatus, CallType,
    ConferenceCallRecord, DtmfResponse, MuteStatus, NameMode, ReleaseType, SimSlot,
};
use common::FakeDaemon;
use tokio_test::{assert_err, assert_ok};

fn args_of(daemon: &FakeDaemon, member: &str) -> Vec<Value> {
    let calls = daemon.calls_to(member);
    assert_eq!(calls.len(), 1, "expected exactly one {} call", member);
    calls[0].args.clone()
}

#[tokio::test]
async fn test_dial_call_marshals_arguments() {
    let daemon = FakeDaemon::new();
    daemon.status(method::DIAL_CALL, 0);
    let client = daemon.client().await;

    assert_ok!(client.dial_call("0123456789", CallType::Video, SimSlot::Slot2).await);
    assert_eq!(
        args_of(&daemon, method::DIAL_CALL),
        vec![
            Value::Str("0123456789".into()),
            Value::Int32(1),
            Value::Int32(1),
            Value::Int32(0),
            Value::Bool(false),
        ]
    );
}

#[tokio::test]
async fn test_emergency_contact_dial_sets_flag() {
    let daemon = FakeDaemon::new();
    daemon.status(method::DIAL_CALL, 0);
    let client = daemon.client().await;

    assert_ok!(client.dial_emergency_contact_call("112").await);
    assert_eq!(
        args_of(&daemon, method::DIAL_CALL),
        vec![
            Value::Str("112".into()),
            Value::Int32(CallType::Voice.as_raw()),
            Value::Int32(SimSlot::Default.as_raw()),
            Value::Int32(0),
            Value::Bool(true),
        ]
    );
}

#[tokio::test]
async fn test_invalid_arguments_never_reach_the_bus() {
    let daemon = FakeDaemon::new();
    let client = daemon.client().await;

    let err = assert_err!(client.dial_call("", CallType::Voice, SimSlot::Default).await);
    assert!(matches!(err, CallManagerError::InvalidParameter { .. }));
    let err = assert_err!(client.dial_call("100", CallType::Invalid, SimSlot::Default).await);
    assert!(matches!(err, CallManagerError::InvalidParameter { .. }));
    assert_err!(client.start_dtmf('x').await);
    assert_err!(client.burst_dtmf("").await);
    assert_err!(client.burst_dtmf("12$4").await);
    assert_err!(client.start_voice_record("").await);
    assert_err!(client.enable_recovery("").await);

    assert!(daemon.bus.method_calls().is_empty());
}

#[tokio::test]
async fn test_lowercase_tones_and_blank_numbers_go_to_the_daemon() {
    let daemon = FakeDaemon::new();
    daemon.status(method::START_DTMF, 0);
    daemon.status(method::BURST_DTMF, 0);
    daemon.status(method::DIAL_CALL, 0);
    let client = daemon.client().await;

    assert_ok!(client.start_dtmf('a').await);
    assert_ok!(client.burst_dtmf("1d").await);
    assert_ok!(client.dial_call("  ", CallType::Voice, SimSlot::Default).await);

    assert_eq!(args_of(&daemon, method::START_DTMF), vec![Value::Byte(b'a')]);
    assert_eq!(args_of(&daemon, method::BURST_DTMF), vec![Value::Str("1d".into())]);
    assert_eq!(args_of(&daemon, method::DIAL_CALL)[0], Value::Str("  ".into()));
}

#[tokio::test]
async fn test_call_control_requests_marshal_arguments() {
    let daemon = FakeDaemon::new();
    for member in [
        method::END_CALL,
        method::ANSWER_CALL,
        method::SPLIT_CALL,
        method::REJECT_CALL,
        method::SWAP_CALL,
        method::HOLD_CALL,
        method::UNHOLD_CALL,
        method::JOIN_CALL,
        method::TRANSFER_CALL,
        method::STOP_ALERT,
        method::START_ALERT,
        method::ACTIVATE_UI,
    ] {
        daemon.status(member, 0);
    }
    let client = daemon.client().await;

    assert_ok!(client.end_call(4, ReleaseType::AllHoldCalls).await);
    assert_ok!(client.answer_call(AnswerType::HoldActiveAndAccept).await);
    assert_ok!(client.split_call(9).await);
    assert_ok!(client.reject_call().await);
    assert_ok!(client.swap_call().await);
    assert_ok!(client.hold_call().await);
    assert_ok!(client.unhold_call().await);
    assert_ok!(client.join_call().await);
    assert_ok!(client.transfer_call().await);
    assert_ok!(client.stop_alert().await);
    assert_ok!(client.start_alert().await);
    assert_ok!(client.activate_ui().await);

    assert_eq!(
        args_of(&daemon, method::END_CALL),
        vec![Value::UInt32(4), Value::Int32(2)]
    );
    assert_eq!(args_of(&daemon, method::ANSWER_CALL), vec![Value::Int32(1)]);
    assert_eq!(args_of(&daemon, method::SPLIT_CALL), vec![Value::UInt32(9)]);
    assert!(args_of(&daemon, method::HOLD_CALL).is_empty());
    assert_eq!(daemon.bus.method_calls().len(), 12);
}

#[tokio::test]
async fn test_media_requests_marshal_arguments() {
    let daemon = FakeDaemon::new();
    for member in [
        method::SPK_ON,
        method::SPK_OFF,
        method::BLUETOOTH_ON,
        method::BLUETOOTH_OFF,
        method::SET_EXTRA_VOL,
        method::SET_MUTE_STATE,
        method::START_DTMF,
        method::STOP_DTMF,
        method::BURST_DTMF,
        method::SEND_DTMF_RESP,
        method::START_VOICE_RECORD,
        method::STOP_VOICE_RECORD,
    ] {
        daemon.status(member, 0);
    }
    let client = daemon.client().await;

    assert_ok!(client.speaker_on().await);
    assert_ok!(client.speaker_off().await);
    assert_ok!(client.bluetooth_on().await);
    assert_ok!(client.bluetooth_off().await);
    assert_ok!(client.set_extra_volume(true).await);
    assert_ok!(client.set_mute_state(false).await);
    assert_ok!(client.start_dtmf('#').await);
    assert_ok!(client.stop_dtmf().await);
    assert_ok!(client.burst_dtmf("123p456w#").await);
    assert_ok!(client.send_dtmf_response(DtmfResponse::Continue).await);
    assert_ok!(client.start_voice_record("0101").await);
    assert_ok!(client.stop_voice_record().await);

    assert_eq!(args_of(&daemon, method::SET_EXTRA_VOL), vec![Value::Bool(true)]);
    assert_eq!(args_of(&daemon, method::SET_MUTE_STATE), vec![Value::Bool(false)]);
    assert_eq!(args_of(&daemon, method::START_DTMF), vec![Value::Byte(b'#')]);
    assert_eq!(
        args_of(&daemon, method::BURST_DTMF),
        vec![Value::Str("123p456w#".into())]
    );
    assert_eq!(args_of(&daemon, method::SEND_DTMF_RESP), vec![Value::Int32(1)]);
    assert_eq!(
        args_of(&daemon, method::START_VOICE_RECORD),
        vec![Value::Str("0101".into())]
    );
}

#[tokio::test]
async fn test_nonzero_status_is_operation_failed() {
    let daemon = FakeDaemon::new();
    daemon.status(method::HOLD_CALL, -1);
    daemon.reply(method::SWAP_CALL, vec![Value::Str("ok".into())]);
    let client = daemon.client().await;

    let err = assert_err!(client.hold_call().await);
    assert!(matches!(err, CallManagerError::OperationFailed { .. }));
    assert_eq!(err.code(), 0x03);

    let err = assert_err!(client.swap_call().await);
    assert!(matches!(err, CallManagerError::OperationFailed { .. }));
}

#[tokio::test]
async fn test_access_denied_is_permission_denied() {
    let daemon = FakeDaemon::new();
    daemon.serve(method::DIAL_CALL, |_| {
        Err(TransportError::new(TransportErrorKind::AccessDenied, "rejected by policy"))
    });
    daemon.serve(method::SPK_ON, |_| {
        Err(TransportError::failed("Method call failed: No access rights for SpkOn"))
    });
    let client = daemon.client().await;

    let err = assert_err!(client.dial_call("100", CallType::Voice, SimSlot::Slot1).await);
    assert!(err.is_permission_denied());
    assert_eq!(err.code(), -13);

    let err = assert_err!(client.speaker_on().await);
    assert!(err.is_permission_denied());
}

#[tokio::test]
async fn test_missing_daemon_is_operation_failed() {
    let daemon = FakeDaemon::new();
    let client = daemon.client().await;

    let err = assert_err!(client.reject_call().await);
    assert!(matches!(err, CallManagerError::OperationFailed { .. }));
}

#[tokio::test]
async fn test_get_all_call_list_skips_empty_rows() {
    let daemon = FakeDaemon::new();
    let first = CallRecord::new(1)
        .with_number("100")
        .with_state(CallState::Held)
        .with_start_time(1_700_000_000);
    let second = CallRecord::new(2)
        .with_number("200")
        .with_call_type(CallType::Video)
        .with_state(CallState::Active)
        .with_member_count(3);
    daemon.reply(
        method::GET_CALL_LIST,
        vec![Value::DictArray(vec![
            encode_call_record(&first),
            Vec::new(),
            encode_call_record(&second),
        ])],
    );
    let client = daemon.client().await;

    let calls = assert_ok!(client.get_all_call_list().await);
    assert_eq!(calls, vec![first, second]);
    assert!(calls[1].is_conference());
    assert!(calls[0].start_time_utc().is_some());
}

#[tokio::test]
async fn test_get_call_list_tolerates_odd_fields() {
    let daemon = FakeDaemon::new();
    let row = dict([
        (keys::CALL_ID, Value::UInt32(5)),
        (keys::CALL_NUMBER, Value::Str("300".into())),
        (keys::CALL_STATE, Value::Int32(99)),
        (keys::MEMBER_COUNT, Value::UInt32(0)),
        (keys::PERSON_ID, Value::UInt32(u32::MAX)),
        ("vendor_extension", Value::Bool(true)),
    ]);
    daemon.reply(method::GET_CALL_LIST, vec![Value::DictArray(vec![row])]);
    let client = daemon.client().await;

    let calls = assert_ok!(client.get_all_call_list().await);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].call_id(), 5);
    assert_eq!(calls[0].number(), Some("300"));
    assert_eq!(calls[0].state(), CallState::Idle);
    assert_eq!(calls[0].member_count(), 1);
    assert_eq!(calls[0].contact_index(), None);
}

#[tokio::test]
async fn test_get_conference_call_list() {
    let daemon = FakeDaemon::new();
    let members = vec![
        ConferenceCallRecord::new(1).with_number("100").with_contact_index(12),
        ConferenceCallRecord::new(2).with_name_mode(NameMode::Private),
    ];
    daemon.reply(
        method::GET_CONF_CALL_LIST,
        vec![Value::DictArray(members.iter().map(encode_conference_record).collect())],
    );
    let client = daemon.client().await;

    let fetched = assert_ok!(client.get_conference_call_list().await);
    assert_eq!(fetched, members);
}

#[tokio::test]
async fn test_get_all_call_data_fills_present_slots() {
    let daemon = FakeDaemon::new();
    let held = CallRecord::new(3).with_number("300").with_state(CallState::Held);
    daemon.reply(
        method::GET_ALL_CALL_DATA,
        vec![encode_slot(None), encode_slot(None), encode_slot(Some(&held))],
    );
    let client = daemon.client().await;

    let slots = assert_ok!(client.get_all_call_data().await);
    assert!(slots.incoming.is_none());
    assert!(slots.active_dial.is_none());
    assert_eq!(slots.held, Some(held));
    assert_eq!(slots.len(), 1);
}

#[tokio::test]
async fn test_status_queries() {
    let daemon = FakeDaemon::new();
    daemon.reply(method::GET_CALL_STATUS, vec![Value::Int32(2), Value::Int32(0)]);
    daemon.reply(method::GET_MUTE_STATUS, vec![Value::Int32(1)]);
    daemon.reply(method::GET_AUDIO_STATE, vec![Value::Int32(4)]);
    daemon.reply(method::GET_ANSWERING_MACHINE_STATUS, vec![Value::Bool(true)]);
    let client = daemon.client().await;

    assert_eq!(assert_ok!(client.get_call_status().await), CallStatus::Offhook);
    assert_eq!(assert_ok!(client.get_mute_status().await), MuteStatus::On);
    assert_eq!(assert_ok!(client.get_audio_state().await), AudioState::Bluetooth);
    assert!(assert_ok!(client.get_answering_machine_status().await));
}

#[tokio::test]
async fn test_out_of_range_query_reply_is_operation_failed() {
    let daemon = FakeDaemon::new();
    daemon.reply(method::GET_CALL_STATUS, vec![Value::Int32(7), Value::Int32(0)]);
    daemon.reply(method::GET_AUDIO_STATE, vec![Value::Str("speaker".into())]);
    let client = daemon.client().await;

    let err = assert_err!(client.get_call_status().await);
    assert!(matches!(err, CallManagerError::OperationFailed { .. }));
    let err = assert_err!(client.get_audio_state().await);
    assert!(matches!(err, CallManagerError::OperationFailed { .. }));
}

#[tokio::test]
async fn test_enable_recovery_owns_the_name() {
    let daemon = FakeDaemon::new();
    // Any status value is accepted for this method.
    daemon.status(method::SET_WATCH_NAME, 5);
    let client = daemon.client().await;

    assert_ok!(client.enable_recovery("org.example.dialer").await);
    assert!(daemon.bus.has_owner("org.example.dialer"));
    assert_eq!(
        args_of(&daemon, method::SET_WATCH_NAME),
        vec![Value::Str("org.example.dialer".into())]
    );

    client.deinit().unwrap();
    assert!(!daemon.bus.has_owner("org.example.dialer"));
}

#[tokio::test]
async fn test_enable_recovery_fails_when_name_is_taken() {
    let daemon = FakeDaemon::new();
    daemon.status(method::SET_WATCH_NAME, 0);
    let first = daemon.client().await;
    let second = daemon.client().await;

    assert_ok!(first.enable_recovery("org.example.dialer").await);
    let err = assert_err!(second.enable_recovery("org.example.dialer").await);
    assert!(matches!(err, CallManagerError::OperationFailed { .. }));
    assert_eq!(daemon.calls_to(method::SET_WATCH_NAME).len(), 1);
}
