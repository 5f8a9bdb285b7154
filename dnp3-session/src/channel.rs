//! Channel abstraction over the underlying protocol stack
//!
//! The session core never opens sockets or encodes bytes; it talks to the
//! stack through [`RequestChannel`]. Requests are fire-and-forget: the
//! stack owns retries and response timeouts and reports outcomes back
//! through the session's `on_*` entry points.

use async_trait::async_trait;
use dnp3_core::{ClassField, CommandRequest, CommandStatus, Dnp3Result};

use crate::command::RequestId;

/// Connection state of the underlying channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// No connection (initial state, or after a disconnect)
    Closed,
    /// Connection attempt in progress
    Opening,
    /// Connected; requests are accepted
    Open,
    /// The channel was shut down and will not reopen
    Shutdown,
}

impl ChannelState {
    /// Whether the channel accepts requests
    pub fn is_open(self) -> bool {
        matches!(self, ChannelState::Open)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChannelState::Closed => "Closed",
            ChannelState::Opening => "Opening",
            ChannelState::Open => "Open",
            ChannelState::Shutdown => "Shutdown",
        }
    }
}

/// Request surface of the underlying DNP3 stack
///
/// One instance represents one master session on one channel. All methods
/// are non-blocking with respect to the remote outstation: a returned
/// `Ok(())` means the request was accepted for transmission, not that it
/// completed. Completion (for commands) is delivered out-of-band, keyed by
/// the [`RequestId`] passed in here.
#[async_trait]
pub trait RequestChannel: Send + Sync {
    /// Current connection state
    fn state(&self) -> ChannelState;

    /// Issue a class-based poll (integrity or exception read)
    async fn class_poll(&self, classes: ClassField) -> Dnp3Result<()>;

    /// Issue the Select phase of a select-then-operate request
    async fn select(&self, id: RequestId, request: &CommandRequest) -> Dnp3Result<()>;

    /// Issue the Operate phase of a select-then-operate request
    ///
    /// `request` preserves the header layout of the original request;
    /// headers whose points all failed Select are present but empty.
    async fn operate(&self, id: RequestId, request: &CommandRequest) -> Dnp3Result<()>;

    /// Issue a direct-operate request (no Select phase)
    async fn direct_operate(&self, id: RequestId, request: &CommandRequest) -> Dnp3Result<()>;
}

/// Per-point outcome of one command phase, as delivered by the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointOutcome {
    pub header_index: usize,
    pub index: u16,
    pub status: CommandStatus,
}

impl PointOutcome {
    pub fn new(header_index: usize, index: u16, status: CommandStatus) -> Self {
        Self {
            header_index,
            index,
            status,
        }
    }
}

/// Observer for channel connection-state notifications
///
/// The default implementation just logs the transition.
pub trait ChannelListener: Send {
    fn on_state_change(&mut self, state: ChannelState) {
        log::info!("channel state: {}", state.as_str());
    }
}

/// Listener that keeps the default logging behavior
pub struct LoggingChannelListener;

impl ChannelListener for LoggingChannelListener {}
