//! Session-level orchestration for DNP3 masters
//!
//! This crate sits on top of a conformant DNP3 protocol stack (link and
//! transport layers, socket management and byte encoding are *not* here)
//! and provides the orchestration a master application needs:
//!
//! - [`scheduler::ScanScheduler`]: periodic class-based polling with an
//!   injectable clock
//! - [`dispatch::MeasurementDispatcher`]: routing of typed measurement
//!   batches to a replaceable handler
//! - [`command::CommandTracker`]: select-then-operate sequencing and
//!   reduction of per-point command results
//! - [`session::Session`]: lifecycle that owns the three above and tears
//!   them down without dangling callbacks
//!
//! The underlying stack is reached through the [`channel::RequestChannel`]
//! trait; completions flow back in through the session's `on_*` entry
//! points, which the stack's worker threads may call concurrently.

pub mod channel;
pub mod command;
pub mod dispatch;
pub mod scheduler;
pub mod session;

pub use channel::{
    ChannelListener, ChannelState, LoggingChannelListener, PointOutcome, RequestChannel,
};
pub use command::{CommandHandle, CommandTracker, RequestId};
pub use dispatch::{LoggingSoeHandler, MeasurementDispatcher, SoeHandler};
pub use scheduler::{ScanHandle, ScanScheduler};
pub use session::{Session, SessionState};

#[cfg(test)]
pub(crate) mod test_support;
