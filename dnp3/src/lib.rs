//! DNP3 session core
//!
//! Session-level orchestration for DNP3 masters and outstations, built on
//! top of (and deliberately excluding) a conformant link/transport stack.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `dnp3-core`: point classes, measurement values, control payloads,
//!   command results, error handling
//! - `dnp3-session`: master-side orchestration — scan scheduling,
//!   measurement dispatch, command tracking, session lifecycle
//! - `dnp3-outstation`: outstation-side collaborators — command
//!   servicing, point database configuration, update batching
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::{Duration, Instant};
//!
//! use dnp3::core::{ClassField, PointClass};
//! use dnp3::session::{LoggingSoeHandler, RequestChannel, Session};
//!
//! async fn run(channel: Arc<dyn RequestChannel>) -> dnp3::core::Dnp3Result<()> {
//!     let session = Session::new(channel, Box::new(LoggingSoeHandler));
//!     let now = Instant::now();
//!     session
//!         .add_scan(ClassField::all_classes(), Duration::from_secs(3600), now)
//!         .await?;
//!     session
//!         .add_scan(ClassField::single(PointClass::Class1), Duration::from_secs(60), now)
//!         .await?;
//!     session.enable(now).await?;
//!     Ok(())
//! }
//! ```

pub use dnp3_core as core;
pub use dnp3_outstation as outstation;
pub use dnp3_session as session;
