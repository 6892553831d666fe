//! Signal delivery from the daemon to application callbacks

mod common;

use callmgr_client::call::codec::{encode_slot, keys};
use callmgr_client::transport::value::dict;
use callmgr_client::transport::{SignalFrame, Value};
use callmgr_client::{
    AudioState, CallEvent, CallRecord, CallState, CallStatus, DialStatus, DtmfIndication, EndCause,
    MuteStatus, SignalKind, VoiceRecordExtra, VoiceRecordStatus,
};
use common::FakeDaemon;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn call_event_args(event: CallEvent, call_id: u32, slots: [Option<&CallRecord>; 3]) -> Vec<Value> {
    vec![
        Value::Int32(event.as_raw()),
        Value::UInt32(call_id),
        Value::Int32(0),
        Value::Int32(EndCause::Unspecified.as_raw()),
        encode_slot(slots[0]),
        encode_slot(slots[1]),
        encode_slot(slots[2]),
    ]
}

#[tokio::test]
async fn test_call_event_with_only_active_call() {
    let daemon = FakeDaemon::new();
    let client = daemon.client().await;

    let captured = Arc::new(Mutex::new(None));
    let sink = captured.clone();
    client
        .set_call_event_cb(move |event, record| {
            *sink.lock() = Some((event, record.clone()));
        })
        .unwrap();

    let active = dict([
        (keys::CALL_ID, Value::UInt32(7)),
        (keys::CALL_DIRECTION, Value::Int32(0)),
        (keys::CALL_NUMBER, Value::Str("12345".into())),
        (keys::CALL_STATE, Value::Int32(CallState::Active.as_raw())),
    ]);
    let delivered = daemon.emit(
        SignalKind::CallEvent,
        vec![
            Value::Int32(CallEvent::Active.as_raw()),
            Value::UInt32(7),
            Value::Int32(0),
            Value::Int32(EndCause::Unspecified.as_raw()),
            Value::Dict(Vec::new()),
            Value::Dict(active),
            Value::Dict(Vec::new()),
        ],
    );
    assert_eq!(delivered, 1);

    let (event, record) = captured.lock().take().expect("callback ran");
    assert_eq!(event, CallEvent::Active);
    assert_eq!(record.call_id(), 7);
    assert_eq!(record.end_cause(), EndCause::Unspecified);
    assert!(record.incoming().is_none());
    assert!(record.held().is_none());
    let active = record.active_dial().expect("active call present");
    assert_eq!(active.call_id(), 7);
    assert_eq!(active.number(), Some("12345"));
    assert_eq!(active.state(), CallState::Active);
}

#[tokio::test]
async fn test_frames_arrive_in_order_and_bad_frames_are_skipped() {
    let daemon = FakeDaemon::new();
    let client = daemon.client().await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    client
        .set_audio_state_changed_cb(move |state| sink.lock().push(state))
        .unwrap();

    daemon.emit(SignalKind::AudioState, vec![Value::Int32(1)]);
    daemon.emit(SignalKind::AudioState, vec![Value::Int32(2)]);
    daemon.emit(SignalKind::AudioState, vec![Value::Str("speaker".into())]);
    daemon.emit(SignalKind::AudioState, vec![Value::Int32(4), Value::Int32(0)]);
    daemon.emit(SignalKind::AudioState, vec![Value::Int32(3)]);

    assert_eq!(
        *seen.lock(),
        vec![AudioState::Speaker, AudioState::Receiver, AudioState::Earjack]
    );
    let stats = client.dispatch_stats();
    assert_eq!(stats.frames_received, 5);
    assert_eq!(stats.frames_dispatched, 3);
    assert_eq!(stats.decode_failures, 2);
}

#[tokio::test]
async fn test_call_event_with_unknown_end_cause_is_dropped() {
    let daemon = FakeDaemon::new();
    let client = daemon.client().await;

    let hits = Arc::new(AtomicUsize::new(0));
    let h = hits.clone();
    client
        .set_call_event_cb(move |_, _| {
            h.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    let mut args = call_event_args(CallEvent::Idle, 9, [None, None, None]);
    args[3] = Value::Int32(27);
    assert_eq!(daemon.emit(SignalKind::CallEvent, args), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    let record = CallRecord::new(9);
    daemon.emit(SignalKind::CallEvent, call_event_args(CallEvent::Idle, 9, [None, Some(&record), None]));
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let stats = client.dispatch_stats();
    assert_eq!(stats.frames_received, 2);
    assert_eq!(stats.decode_failures, 1);
    assert_eq!(stats.frames_dispatched, 1);
}

#[tokio::test]
async fn test_nested_records_released_after_each_callback() {
    let daemon = FakeDaemon::new();
    let client = daemon.client().await;

    let invocations = Arc::new(AtomicUsize::new(0));
    let counter = invocations.clone();
    client
        .set_call_event_cb(move |_, record| {
            counter.fetch_add(1, Ordering::SeqCst);
            assert!(record.slots().len() <= 3);
        })
        .unwrap();

    let incoming = CallRecord::new(1).with_number("100").with_state(CallState::Incoming);
    let active = CallRecord::new(2).with_number("200").with_state(CallState::Active);
    let held = CallRecord::new(3).with_number("300").with_state(CallState::Held);

    daemon.emit(SignalKind::CallEvent, call_event_args(CallEvent::Incoming, 1, [Some(&incoming), None, None]));
    daemon.emit(SignalKind::CallEvent, call_event_args(CallEvent::Waiting, 1, [Some(&incoming), Some(&active), None]));
    daemon.emit(SignalKind::CallEvent, call_event_args(CallEvent::Swapped, 3, [None, Some(&active), Some(&held)]));
    daemon.emit(SignalKind::CallEvent, call_event_args(CallEvent::Idle, 3, [None, None, None]));

    assert_eq!(invocations.load(Ordering::SeqCst), 4);
    let stats = client.dispatch_stats();
    assert_eq!(stats.records_allocated, 5);
    assert_eq!(stats.records_released, 5);
}

#[tokio::test]
async fn test_every_callback_shape_receives_its_payload() {
    let daemon = FakeDaemon::new();
    let client = daemon.client().await;
    let log = Arc::new(Mutex::new(Vec::<String>::new()));

    let l = log.clone();
    client
        .set_call_status_cb(move |status, number| l.lock().push(format!("status {:?} {}", status, number)))
        .unwrap();
    let l = log.clone();
    client
        .set_dial_status_cb(move |status| l.lock().push(format!("dial {:?}", status)))
        .unwrap();
    let l = log.clone();
    client
        .set_dtmf_indication_cb(move |indication, digits| l.lock().push(format!("dtmf {:?} {}", indication, digits)))
        .unwrap();
    let l = log.clone();
    client
        .set_foreground_cb(move || l.lock().push("foreground".to_string()))
        .unwrap();
    let l = log.clone();
    client
        .set_voice_record_status_cb(move |status, extra| l.lock().push(format!("record {:?} {:?}", status, extra)))
        .unwrap();
    let l = log.clone();
    client
        .set_mute_status_cb(move |status| l.lock().push(format!("mute {:?}", status)))
        .unwrap();

    daemon.emit(
        SignalKind::CallStatus,
        vec![Value::Int32(CallStatus::Ringing.as_raw()), Value::Int32(0), Value::Str("555".into())],
    );
    daemon.emit(SignalKind::DialStatus, vec![Value::Int32(DialStatus::FailFixedDialing.as_raw())]);
    daemon.emit(
        SignalKind::DtmfIndication,
        vec![Value::Int32(DtmfIndication::Progressing.as_raw()), Value::Str("12#".into())],
    );
    daemon.emit(SignalKind::GoForeground, vec![]);
    daemon.emit(
        SignalKind::VoiceRecordStatus,
        vec![
            Value::Int32(VoiceRecordStatus::Started.as_raw()),
            Value::Int32(VoiceRecordExtra::StartNormal.as_raw()),
        ],
    );
    daemon.emit(SignalKind::MuteStatus, vec![Value::Int32(MuteStatus::On.as_raw())]);

    assert_eq!(
        *log.lock(),
        vec![
            "status Ringing 555",
            "dial FailFixedDialing",
            "dtmf Progressing 12#",
            "foreground",
            "record Started StartNormal",
            "mute On",
        ]
    );
}

#[tokio::test]
async fn test_signals_from_other_senders_are_ignored() {
    let daemon = FakeDaemon::new();
    let client = daemon.client().await;
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    client
        .set_foreground_cb(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    let delivered = daemon.bus.emit_signal(SignalFrame::new(
        "org.example.impostor",
        "/org/tizen/callmgr",
        "org.tizen.callmgr",
        "GoForeground",
        vec![],
    ));
    assert_eq!(delivered, 0);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_callback_may_unregister_itself() {
    let daemon = FakeDaemon::new();
    let client = daemon.client().await;
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = hits.clone();
    let handle = client.clone();
    client
        .set_dial_status_cb(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            handle.unset_dial_status_cb().unwrap();
        })
        .unwrap();

    daemon.emit(SignalKind::DialStatus, vec![Value::Int32(0)]);
    daemon.emit(SignalKind::DialStatus, vec![Value::Int32(0)]);

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(client.registered_signals().is_empty());
}

#[tokio::test]
async fn test_panicking_callback_does_not_poison_the_session() {
    let daemon = FakeDaemon::new();
    let client = daemon.client().await;
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = hits.clone();
    client
        .set_mute_status_cb(move |status| {
            counter.fetch_add(1, Ordering::SeqCst);
            if status == MuteStatus::On {
                panic!("application bug");
            }
        })
        .unwrap();

    daemon.emit(SignalKind::MuteStatus, vec![Value::Int32(1)]);
    daemon.emit(SignalKind::MuteStatus, vec![Value::Int32(0)]);

    assert_eq!(hits.load(Ordering::SeqCst), 2);
    let stats = client.dispatch_stats();
    assert_eq!(stats.callback_panics, 1);
    assert_eq!(stats.frames_dispatched, 1);
}
