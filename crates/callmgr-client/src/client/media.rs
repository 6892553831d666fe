//! Audio routing, DTMF and voice recording requests

use tracing::debug;

use super::CallManagerClient;
use super::invoke::unexpected_reply;
use crate::call::{AudioState, DtmfResponse};
use crate::error::{CallManagerError, ClientResult};
use crate::protocol::method;
use crate::transport::Value;

/// Whether `digit` is a DTMF tone; `a` to `d` count as `A` to `D`
pub fn is_dtmf_digit(digit: char) -> bool {
    matches!(digit.to_ascii_uppercase(), '0'..='9' | '*' | '#' | 'A'..='D')
}

/// Whether `c` may appear in a burst DTMF string (tones plus pause and wait marks)
fn is_burst_char(c: char) -> bool {
    is_dtmf_digit(c) || matches!(c, 'p' | 'P' | 'w' | 'W' | ',' | ';')
}

impl CallManagerClient {
    pub async fn speaker_on(&self) -> ClientResult<()> {
        self.invoke_status(method::SPK_ON, Vec::new()).await
    }

    pub async fn speaker_off(&self) -> ClientResult<()> {
        self.invoke_status(method::SPK_OFF, Vec::new()).await
    }

    pub async fn bluetooth_on(&self) -> ClientResult<()> {
        self.invoke_status(method::BLUETOOTH_ON, Vec::new()).await
    }

    pub async fn bluetooth_off(&self) -> ClientResult<()> {
        self.invoke_status(method::BLUETOOTH_OFF, Vec::new()).await
    }

    pub async fn set_extra_volume(&self, enabled: bool) -> ClientResult<()> {
        self.invoke_status(method::SET_EXTRA_VOL, vec![Value::Bool(enabled)]).await
    }

    pub async fn set_mute_state(&self, muted: bool) -> ClientResult<()> {
        self.invoke_status(method::SET_MUTE_STATE, vec![Value::Bool(muted)]).await
    }

    /// Start playing a DTMF tone until [`stop_dtmf`](Self::stop_dtmf)
    pub async fn start_dtmf(&self, digit: char) -> ClientResult<()> {
        if !is_dtmf_digit(digit) {
            return Err(CallManagerError::invalid_parameter(format!(
                "{:?} is not a DTMF digit",
                digit
            )));
        }
        self.invoke_status(method::START_DTMF, vec![Value::Byte(digit as u8)]).await
    }

    pub async fn stop_dtmf(&self) -> ClientResult<()> {
        self.invoke_status(method::STOP_DTMF, Vec::new()).await
    }

    /// Send a string of DTMF tones
    pub async fn burst_dtmf(&self, digits: &str) -> ClientResult<()> {
        if digits.is_empty() {
            return Err(CallManagerError::invalid_parameter("DTMF string is empty"));
        }
        if let Some(bad) = digits.chars().find(|c| !is_burst_char(*c)) {
            return Err(CallManagerError::invalid_parameter(format!(
                "{:?} is not allowed in a DTMF string",
                bad
            )));
        }
        debug!(digits = %digits, "Sending DTMF burst");
        self.invoke_status(method::BURST_DTMF, vec![Value::Str(digits.to_string())])
            .await
    }

    /// Answer a DTMF wait indication
    pub async fn send_dtmf_response(&self, response: DtmfResponse) -> ClientResult<()> {
        self.invoke_status(method::SEND_DTMF_RESP, vec![Value::Int32(response.as_raw())])
            .await
    }

    /// Current audio output path
    pub async fn get_audio_state(&self) -> ClientResult<AudioState> {
        let reply = self.invoke(method::GET_AUDIO_STATE, Vec::new()).await?;
        match reply.as_slice() {
            [Value::Int32(raw)] => AudioState::try_from(*raw).map_err(|raw| {
                CallManagerError::operation_failed(format!("unknown audio state {}", raw))
            }),
            _ => Err(unexpected_reply(method::GET_AUDIO_STATE, "(i)", &reply)),
        }
    }

    /// Start recording the conversation with `number`
    pub async fn start_voice_record(&self, number: &str) -> ClientResult<()> {
        if number.is_empty() {
            return Err(CallManagerError::invalid_parameter("number is empty"));
        }
        self.invoke_status(method::START_VOICE_RECORD, vec![Value::Str(number.to_string())])
            .await
    }

    pub async fn stop_voice_record(&self) -> ClientResult<()> {
        self.invoke_status(method::STOP_VOICE_RECORD, Vec::new()).await
    }
}
