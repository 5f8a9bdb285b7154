//! Session lifecycle
//!
//! The session owns the scan table, the measurement dispatcher and the
//! pending-command table, all behind one lock together with the lifecycle
//! state. Entry points driven by the stack's worker threads (ticks,
//! measurement delivery, command outcomes) take that lock before touching
//! anything, so shutdown — which also takes it — blocks until in-flight
//! callbacks have returned and no later callback can observe partially
//! torn-down state.
//!
//! # State Transitions
//! ```text
//! Created -> Enabled  (on enable(), which also runs the first tick)
//! Created -> Shutdown (on shutdown())
//! Enabled -> Shutdown (on shutdown())
//! ```
//!
//! There is no way back from `Shutdown`; construct a fresh session
//! instead.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use dnp3_core::{
    ClassField, CommandMode, CommandRequest, Dnp3Error, Dnp3Result, FragmentInfo, HeaderInfo,
    MeasurementBatch,
};

use crate::channel::{ChannelListener, ChannelState, PointOutcome, RequestChannel};
use crate::command::{CommandHandle, CommandTracker, RequestId};
use crate::dispatch::{LoggingSoeHandler, MeasurementDispatcher, SoeHandler};
use crate::scheduler::{ScanHandle, ScanScheduler};

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed but not yet polling
    Created,
    /// Enabled; scans fire and requests are accepted
    Enabled,
    /// Torn down; every entry point is a no-op or an error
    Shutdown,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Created => "Created",
            SessionState::Enabled => "Enabled",
            SessionState::Shutdown => "Shutdown",
        }
    }
}

struct Inner {
    state: SessionState,
    scheduler: ScanScheduler,
    dispatcher: MeasurementDispatcher,
    commands: CommandTracker,
    // Both dropped at shutdown, after the tables above are drained.
    channel: Option<Arc<dyn RequestChannel>>,
    listener: Option<Box<dyn ChannelListener>>,
}

/// One master session on one channel
///
/// Owns the scan scheduler, measurement dispatcher and command tracker,
/// and the handle to the underlying channel. All methods are safe to call
/// concurrently from the stack's worker contexts.
pub struct Session {
    inner: Mutex<Inner>,
}

impl Session {
    /// Create a session in the `Created` state
    pub fn new(channel: Arc<dyn RequestChannel>, handler: Box<dyn SoeHandler>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: SessionState::Created,
                scheduler: ScanScheduler::new(),
                dispatcher: MeasurementDispatcher::new(handler),
                commands: CommandTracker::new(),
                channel: Some(channel),
                listener: None,
            }),
        }
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state
    }

    /// Register an observer for channel connection-state notifications
    pub async fn set_channel_listener(&self, listener: Box<dyn ChannelListener>) {
        self.inner.lock().await.listener = Some(listener);
    }

    /// Register a periodic class scan
    ///
    /// Permitted while `Created` or `Enabled`; the first firing happens one
    /// period after `now`.
    pub async fn add_scan(
        &self,
        classes: ClassField,
        period: Duration,
        now: Instant,
    ) -> Dnp3Result<ScanHandle> {
        let mut inner = self.inner.lock().await;
        if inner.state == SessionState::Shutdown {
            return Err(Dnp3Error::ShutdownInProgress);
        }
        inner.scheduler.add_scan(classes, period, now)
    }

    /// Cancel a registered scan; returns whether the handle was known
    pub async fn cancel_scan(&self, handle: ScanHandle) -> bool {
        self.inner.lock().await.scheduler.cancel(handle)
    }

    /// Transition `Created` -> `Enabled` and run the scheduler's first tick
    pub async fn enable(&self, now: Instant) -> Dnp3Result<()> {
        let mut inner = self.inner.lock().await;
        match inner.state {
            SessionState::Created => {}
            SessionState::Enabled => {
                return Err(Dnp3Error::InvalidState("session already enabled".to_string()))
            }
            SessionState::Shutdown => return Err(Dnp3Error::ShutdownInProgress),
        }
        inner.state = SessionState::Enabled;
        log::info!("session enabled");
        if let Some(channel) = inner.channel.clone() {
            inner.scheduler.tick(now, channel.as_ref()).await;
        }
        Ok(())
    }

    /// Advance the scan scheduler
    ///
    /// No-op unless the session is `Enabled`.
    pub async fn tick(&self, now: Instant) {
        let mut inner = self.inner.lock().await;
        if inner.state != SessionState::Enabled {
            return;
        }
        if let Some(channel) = inner.channel.clone() {
            inner.scheduler.tick(now, channel.as_ref()).await;
        }
    }

    /// Submit a command request
    ///
    /// Completion arrives through the returned handle, never inline.
    ///
    /// # Errors
    /// `ShutdownInProgress` after shutdown began, `InvalidState` before
    /// `enable`, plus any submission error from the tracker.
    pub async fn submit(
        &self,
        request: CommandRequest,
        mode: CommandMode,
    ) -> Dnp3Result<CommandHandle> {
        let mut inner = self.inner.lock().await;
        match inner.state {
            SessionState::Enabled => {}
            SessionState::Created => {
                return Err(Dnp3Error::InvalidState("session not enabled".to_string()))
            }
            SessionState::Shutdown => return Err(Dnp3Error::ShutdownInProgress),
        }
        let channel = inner
            .channel
            .clone()
            .ok_or(Dnp3Error::ChannelUnavailable)?;
        inner.commands.submit(channel.as_ref(), request, mode).await
    }

    /// Stack callback: a response fragment begins
    pub async fn on_fragment_begin(&self, info: &FragmentInfo) {
        let mut inner = self.inner.lock().await;
        if inner.state == SessionState::Enabled {
            inner.dispatcher.fragment_start(info);
        }
    }

    /// Stack callback: one measurement batch of the current fragment
    pub async fn on_measurements(&self, info: &HeaderInfo, batch: &MeasurementBatch) {
        let mut inner = self.inner.lock().await;
        if inner.state == SessionState::Enabled {
            inner.dispatcher.process(info, batch);
        }
    }

    /// Stack callback: the current response fragment ends
    pub async fn on_fragment_end(&self, info: &FragmentInfo) {
        let mut inner = self.inner.lock().await;
        if inner.state == SessionState::Enabled {
            inner.dispatcher.fragment_end(info);
        }
    }

    /// Stack callback: per-point outcomes for one phase of a command
    pub async fn on_command_outcomes(&self, id: RequestId, outcomes: &[PointOutcome]) {
        let mut inner = self.inner.lock().await;
        if inner.state != SessionState::Enabled {
            return;
        }
        if let Some(channel) = inner.channel.clone() {
            inner.commands.deliver(channel.as_ref(), id, outcomes).await;
        }
    }

    /// Stack callback: the channel's connection state changed
    ///
    /// A transition to `Closed` or `Shutdown` fails every pending command
    /// with a timeout-classed result; scans keep their schedule and simply
    /// skip firing until the channel is open again.
    pub async fn on_channel_state_change(&self, state: ChannelState) {
        let mut inner = self.inner.lock().await;
        if let Some(listener) = inner.listener.as_mut() {
            listener.on_state_change(state);
        }
        if inner.state != SessionState::Enabled {
            return;
        }
        if matches!(state, ChannelState::Closed | ChannelState::Shutdown) {
            inner.commands.disconnect_all();
        }
    }

    /// Tear the session down
    ///
    /// Cancels all scans, fails every pending command with a `Cancelled`
    /// result (exactly once), releases the measurement handler and finally
    /// the channel handle. Holding the session lock for the whole sequence
    /// means no stack callback can interleave with a partial teardown.
    /// Idempotent: later calls return immediately.
    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state == SessionState::Shutdown {
            return;
        }
        inner.state = SessionState::Shutdown;
        log::info!("session shutting down");
        inner.scheduler.cancel_all();
        inner.commands.cancel_all();
        inner.dispatcher.replace_handler(Box::new(LoggingSoeHandler));
        inner.listener = None;
        inner.channel = None;
        log::info!("session shut down");
    }
}
