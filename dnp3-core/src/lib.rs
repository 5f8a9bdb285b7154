//! Core types and utilities for the DNP3 session core
//!
//! This crate provides the fundamental value types shared by the master and
//! outstation session layers: point classes, measurement kinds and values,
//! group/variation header context, control payloads and command results.
//!
//! Nothing in this crate touches the wire. Link/transport framing, CRC and
//! byte encoding belong to the underlying protocol stack that the session
//! core sits on top of.

pub mod class;
pub mod command;
pub mod error;
pub mod measurement;
pub mod variation;

pub use class::{ClassField, PointClass};
pub use command::{
    AnalogOutput, CommandHeader, CommandMode, CommandPayload, CommandPointResult,
    CommandPointState, CommandRequest, CommandStatus, CommandTaskResult, ControlCode,
    ControlRelayOutputBlock, TaskCompletion,
};
pub use error::{Dnp3Error, Dnp3Result};
pub use measurement::{
    Analog, AnalogOutputStatus, Binary, BinaryOutputStatus, Counter, DoubleBit, DoubleBitBinary,
    Flags, FrozenCounter, Indexed, MeasurementBatch, MeasurementType, OctetString, TimeAndInterval,
    Timestamp,
};
pub use variation::{FragmentInfo, HeaderInfo, Variation};
