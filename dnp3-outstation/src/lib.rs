//! Outstation-side collaborators for the DNP3 session core
//!
//! The master-side session (`dnp3-session`) issues controls and polls;
//! this crate holds the outstation-side counterparts an application
//! implements on top of the same underlying stack:
//!
//! - [`handler::CommandHandler`]: per-point Select/Operate servicing
//! - [`database::DatabaseConfig`]: static point-table configuration
//! - [`update::UpdateBuilder`]: batching of measurement updates pushed
//!   toward the master
//! - [`application::OutstationApplication`]: application-level callbacks
//!   (IIN bits, restart support)

pub mod application;
pub mod database;
pub mod handler;
pub mod update;

pub use application::{
    ApplicationIin, DefaultOutstationApplication, IinField, OutstationApplication, RestartMode,
};
pub use database::{
    AnalogPointConfig, BinaryPointConfig, DatabaseConfig, EventAnalogVariation,
    EventBinaryVariation, EventBufferConfig, StaticAnalogVariation, StaticBinaryVariation,
};
pub use handler::{CommandHandler, OperateType, SuccessCommandHandler};
pub use update::{OutstationHandle, PointUpdate, Update, UpdateBuilder};
