//! Call records handed to applications
//!
//! Records are plain owned values. The library hands them out either by
//! value (query results, which the caller then owns) or by reference for the
//! duration of a callback (call-event notifications); in the latter case an
//! application that wants to keep the data clones it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{CallDirection, CallDomain, CallState, CallType, EndCause, NameMode, SimSlot};

/// Snapshot of one call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub(crate) call_id: u32,
    pub(crate) direction: CallDirection,
    pub(crate) number: Option<String>,
    pub(crate) calling_name: Option<String>,
    pub(crate) call_type: CallType,
    pub(crate) state: CallState,
    pub(crate) member_count: u32,
    pub(crate) domain: CallDomain,
    pub(crate) is_emergency: bool,
    pub(crate) is_voicemail: bool,
    pub(crate) contact_index: Option<u32>,
    pub(crate) start_time: i64,
    pub(crate) name_mode: NameMode,
}

impl Default for CallRecord {
    fn default() -> Self {
        Self {
            call_id: 0,
            direction: CallDirection::default(),
            number: None,
            calling_name: None,
            call_type: CallType::default(),
            state: CallState::default(),
            member_count: 1,
            domain: CallDomain::default(),
            is_emergency: false,
            is_voicemail: false,
            contact_index: None,
            start_time: 0,
            name_mode: NameMode::default(),
        }
    }
}

impl CallRecord {
    /// Create a record for `call_id` with every other field at its default
    pub fn new(call_id: u32) -> Self {
        Self {
            call_id,
            ..Default::default()
        }
    }

    pub fn with_direction(mut self, direction: CallDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn with_calling_name(mut self, name: impl Into<String>) -> Self {
        self.calling_name = Some(name.into());
        self
    }

    pub fn with_call_type(mut self, call_type: CallType) -> Self {
        self.call_type = call_type;
        self
    }

    pub fn with_state(mut self, state: CallState) -> Self {
        self.state = state;
        self
    }

    /// Set the number of parties; values below one are raised to one
    pub fn with_member_count(mut self, count: u32) -> Self {
        self.member_count = count.max(1);
        self
    }

    pub fn with_emergency(mut self, is_emergency: bool) -> Self {
        self.is_emergency = is_emergency;
        self
    }

    pub fn with_voicemail(mut self, is_voicemail: bool) -> Self {
        self.is_voicemail = is_voicemail;
        self
    }

    pub fn with_contact_index(mut self, index: u32) -> Self {
        self.contact_index = Some(index);
        self
    }

    pub fn with_start_time(mut self, seconds: i64) -> Self {
        self.start_time = seconds;
        self
    }

    pub fn with_name_mode(mut self, mode: NameMode) -> Self {
        self.name_mode = mode;
        self
    }

    pub fn call_id(&self) -> u32 {
        self.call_id
    }

    pub fn direction(&self) -> CallDirection {
        self.direction
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    pub fn calling_name(&self) -> Option<&str> {
        self.calling_name.as_deref()
    }

    pub fn call_type(&self) -> CallType {
        self.call_type
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn member_count(&self) -> u32 {
        self.member_count
    }

    /// Whether the call has more than one remote party
    pub fn is_conference(&self) -> bool {
        self.member_count > 1
    }

    pub fn domain(&self) -> CallDomain {
        self.domain
    }

    pub fn is_emergency(&self) -> bool {
        self.is_emergency
    }

    pub fn is_voicemail_number(&self) -> bool {
        self.is_voicemail
    }

    /// Contact-book index of the remote party, if the daemon resolved one
    pub fn contact_index(&self) -> Option<u32> {
        self.contact_index
    }

    /// Start time in seconds since the Unix epoch
    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    pub fn start_time_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.start_time, 0)
    }

    pub fn name_mode(&self) -> NameMode {
        self.name_mode
    }
}

/// One participant of a conference call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceCallRecord {
    pub(crate) call_id: u32,
    pub(crate) number: Option<String>,
    pub(crate) contact_index: Option<u32>,
    pub(crate) name_mode: NameMode,
}

impl ConferenceCallRecord {
    pub fn new(call_id: u32) -> Self {
        Self {
            call_id,
            ..Default::default()
        }
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn with_contact_index(mut self, index: u32) -> Self {
        self.contact_index = Some(index);
        self
    }

    pub fn with_name_mode(mut self, mode: NameMode) -> Self {
        self.name_mode = mode;
        self
    }

    pub fn call_id(&self) -> u32 {
        self.call_id
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    pub fn contact_index(&self) -> Option<u32> {
        self.contact_index
    }

    pub fn name_mode(&self) -> NameMode {
        self.name_mode
    }
}

/// The incoming, active-or-dialing and held calls at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSlots {
    pub incoming: Option<CallRecord>,
    pub active_dial: Option<CallRecord>,
    pub held: Option<CallRecord>,
}

impl CallSlots {
    /// Number of populated slots
    pub fn len(&self) -> usize {
        [&self.incoming, &self.active_dial, &self.held]
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Payload of a call-event notification
///
/// Handed to the call-event callback by reference; the nested records are
/// released as soon as the callback returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEventRecord {
    pub(crate) call_id: u32,
    pub(crate) sim_slot: SimSlot,
    pub(crate) end_cause: EndCause,
    pub(crate) slots: CallSlots,
}

impl CallEventRecord {
    pub fn call_id(&self) -> u32 {
        self.call_id
    }

    pub fn sim_slot(&self) -> SimSlot {
        self.sim_slot
    }

    pub fn end_cause(&self) -> EndCause {
        self.end_cause
    }

    pub fn incoming(&self) -> Option<&CallRecord> {
        self.slots.incoming.as_ref()
    }

    pub fn active_dial(&self) -> Option<&CallRecord> {
        self.slots.active_dial.as_ref()
    }

    pub fn held(&self) -> Option<&CallRecord> {
        self.slots.held.as_ref()
    }

    pub fn slots(&self) -> &CallSlots {
        &self.slots
    }
}
