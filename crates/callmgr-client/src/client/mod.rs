//! Client session
//!
//! A [`CallManagerClient`] owns one bus channel, one cancellation token and
//! one registration table. Requests to the daemon (`dial_call`,
//! `hold_call`, `get_call_status`, ...) are methods on the client; so are
//! the `set_*_cb` / `unset_*_cb` pairs that manage signal callbacks.
//!
//! The handle is cheap to clone. All clones share the session: once any of
//! them calls [`CallManagerClient::deinit`], every operation on every clone
//! fails with `InvalidParameter`, outstanding requests are cancelled and no
//! callback runs again.
//!
//! # Example
//!
//! ```rust
//! use callmgr_client::transport::local::LocalBus;
//! use callmgr_client::transport::{SignalFrame, Value};
//! use callmgr_client::{CallManagerClient, ClientConfig, DialStatus};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! # tokio_test::block_on(async {
//! let bus = LocalBus::new();
//! let client = CallManagerClient::init(&bus, ClientConfig::default()).await.unwrap();
//!
//! let failed = Arc::new(AtomicBool::new(false));
//! let flag = failed.clone();
//! client
//!     .set_dial_status_cb(move |status| flag.store(status != DialStatus::Success, Ordering::SeqCst))
//!     .unwrap();
//!
//! bus.emit_signal(SignalFrame::new(
//!     "org.tizen.callmgr",
//!     "/org/tizen/callmgr",
//!     "org.tizen.callmgr",
//!     "DialStatus",
//!     vec![Value::Int32(2)],
//! ));
//! assert!(failed.load(Ordering::SeqCst));
//!
//! client.deinit().unwrap();
//! assert!(client.deinit().is_err());
//! # });
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::call::{
    AudioState, CallEvent, CallEventRecord, CallStatus, DialStatus, DtmfIndication, MuteStatus,
    VoiceRecordExtra, VoiceRecordStatus,
};
use crate::error::{CallManagerError, ClientResult};
use crate::registration::RegistrationTable;
use crate::signal::{DispatchStats, SignalCallback, SignalKind, SignalRouter};
use crate::transport::{Connector, IpcChannel};

pub mod calls;
pub mod config;
mod invoke;
pub mod media;
pub mod queries;

use config::ClientConfig;

struct SessionInner {
    config: ClientConfig,
    channel: Arc<dyn IpcChannel>,
    cancel: CancellationToken,
    registrations: Arc<RegistrationTable>,
    router: Arc<SignalRouter>,
    closed: AtomicBool,
}

impl SessionInner {
    /// Release everything the session holds; `false` if already released
    fn shutdown(&self) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            return false;
        }
        // No callback may still be running once deinit returns.
        let _delivery = self.router.hold_delivery();
        let report = self.registrations.teardown();
        self.cancel.cancel();
        self.channel.close();
        info!(
            subscriptions_closed = report.closed,
            subscriptions_failed = report.failed,
            "Call manager client deinitialized"
        );
        true
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        if self.shutdown() {
            debug!("Client session dropped without deinit");
        }
    }
}

/// Handle to a call-manager client session
#[derive(Clone)]
pub struct CallManagerClient {
    inner: Arc<SessionInner>,
}

impl CallManagerClient {
    /// Open a channel through `connector` and start a session on it
    pub async fn init<C>(connector: &C, config: ClientConfig) -> ClientResult<Self>
    where
        C: Connector + ?Sized,
    {
        config.validate()?;
        let channel = connector.connect().await.map_err(|e| {
            error!(error = %e, "Bus connection failed");
            CallManagerError::from(e)
        })?;
        Self::with_channel(channel, config)
    }

    /// Start a session on an already open channel
    ///
    /// The channel is closed again if the session cannot be started.
    pub fn with_channel(channel: Arc<dyn IpcChannel>, config: ClientConfig) -> ClientResult<Self> {
        if let Err(e) = config.validate() {
            channel.close();
            return Err(e);
        }

        let registrations = Arc::new(RegistrationTable::new(channel.clone(), &config));
        let router = Arc::new(SignalRouter::new(Arc::downgrade(&registrations)));
        info!(service = %config.service, "Call manager client initialized");

        Ok(Self {
            inner: Arc::new(SessionInner {
                config,
                channel,
                cancel: CancellationToken::new(),
                registrations,
                router,
                closed: AtomicBool::new(false),
            }),
        })
    }

    /// Tear the session down
    ///
    /// Closes every signal subscription, cancels outstanding requests and
    /// releases the channel. Fails with `InvalidParameter` if the session was
    /// already deinitialized.
    pub fn deinit(&self) -> ClientResult<()> {
        if self.inner.shutdown() {
            Ok(())
        } else {
            Err(CallManagerError::session_closed())
        }
    }

    pub fn is_initialized(&self) -> bool {
        !self.inner.closed.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Counters of the session's signal router
    pub fn dispatch_stats(&self) -> DispatchStats {
        self.inner.router.stats()
    }

    /// Signal kinds that currently have a callback
    pub fn registered_signals(&self) -> Vec<SignalKind> {
        SignalKind::ALL
            .into_iter()
            .filter(|kind| self.inner.registrations.is_registered(*kind))
            .collect()
    }

    pub(crate) fn ensure_open(&self) -> ClientResult<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(CallManagerError::session_closed())
        }
    }

    /// Register a callback for the signal it listens to
    pub fn set_callback(&self, callback: SignalCallback) -> ClientResult<()> {
        self.ensure_open()?;
        self.inner
            .registrations
            .register(callback, self.inner.router.clone())
    }

    /// Remove the callback registered for `kind`
    pub fn unset_callback(&self, kind: SignalKind) -> ClientResult<()> {
        self.ensure_open()?;
        self.inner.registrations.unregister(kind)
    }

    pub fn set_call_status_cb(&self, cb: impl Fn(CallStatus, &str) + Send + Sync + 'static) -> ClientResult<()> {
        self.set_callback(SignalCallback::call_status(cb))
    }

    pub fn unset_call_status_cb(&self) -> ClientResult<()> {
        self.unset_callback(SignalKind::CallStatus)
    }

    /// The event record is only valid while `cb` runs
    pub fn set_call_event_cb(
        &self,
        cb: impl Fn(CallEvent, &CallEventRecord) + Send + Sync + 'static,
    ) -> ClientResult<()> {
        self.set_callback(SignalCallback::call_event(cb))
    }

    pub fn unset_call_event_cb(&self) -> ClientResult<()> {
        self.unset_callback(SignalKind::CallEvent)
    }

    pub fn set_dial_status_cb(&self, cb: impl Fn(DialStatus) + Send + Sync + 'static) -> ClientResult<()> {
        self.set_callback(SignalCallback::dial_status(cb))
    }

    pub fn unset_dial_status_cb(&self) -> ClientResult<()> {
        self.unset_callback(SignalKind::DialStatus)
    }

    pub fn set_dtmf_indication_cb(
        &self,
        cb: impl Fn(DtmfIndication, &str) + Send + Sync + 'static,
    ) -> ClientResult<()> {
        self.set_callback(SignalCallback::dtmf_indication(cb))
    }

    pub fn unset_dtmf_indication_cb(&self) -> ClientResult<()> {
        self.unset_callback(SignalKind::DtmfIndication)
    }

    pub fn set_audio_state_changed_cb(&self, cb: impl Fn(AudioState) + Send + Sync + 'static) -> ClientResult<()> {
        self.set_callback(SignalCallback::audio_state(cb))
    }

    pub fn unset_audio_state_changed_cb(&self) -> ClientResult<()> {
        self.unset_callback(SignalKind::AudioState)
    }

    pub fn set_foreground_cb(&self, cb: impl Fn() + Send + Sync + 'static) -> ClientResult<()> {
        self.set_callback(SignalCallback::go_foreground(cb))
    }

    pub fn unset_foreground_cb(&self) -> ClientResult<()> {
        self.unset_callback(SignalKind::GoForeground)
    }

    pub fn set_voice_record_status_cb(
        &self,
        cb: impl Fn(VoiceRecordStatus, VoiceRecordExtra) + Send + Sync + 'static,
    ) -> ClientResult<()> {
        self.set_callback(SignalCallback::voice_record_status(cb))
    }

    pub fn unset_voice_record_status_cb(&self) -> ClientResult<()> {
        self.unset_callback(SignalKind::VoiceRecordStatus)
    }

    pub fn set_mute_status_cb(&self, cb: impl Fn(MuteStatus) + Send + Sync + 'static) -> ClientResult<()> {
        self.set_callback(SignalCallback::mute_status(cb))
    }

    pub fn unset_mute_status_cb(&self) -> ClientResult<()> {
        self.unset_callback(SignalKind::MuteStatus)
    }
}

impl std::fmt::Debug for CallManagerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallManagerClient")
            .field("service", &self.inner.config.service)
            .field("initialized", &self.is_initialized())
            .field("registrations", &self.inner.registrations.len())
            .finish()
    }
}
