//! Measurement update batching
//!
//! An outstation application records new measurement values through a
//! builder; the finished [`Update`] batch is applied atomically to the
//! outstation held by the application. The handle is passed explicitly —
//! there is no process-global outstation reference.

use dnp3_core::{
    Analog, AnalogOutputStatus, Binary, BinaryOutputStatus, Counter, Dnp3Result, DoubleBitBinary,
    FrozenCounter, Indexed,
};

/// One typed point update
#[derive(Debug, Clone, PartialEq)]
pub enum PointUpdate {
    Binary(Indexed<Binary>),
    DoubleBitBinary(Indexed<DoubleBitBinary>),
    Analog(Indexed<Analog>),
    Counter(Indexed<Counter>),
    FrozenCounter(Indexed<FrozenCounter>),
    BinaryOutputStatus(Indexed<BinaryOutputStatus>),
    AnalogOutputStatus(Indexed<AnalogOutputStatus>),
}

/// An immutable batch of point updates, applied in insertion order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Update {
    updates: Vec<PointUpdate>,
}

impl Update {
    pub fn updates(&self) -> &[PointUpdate] {
        &self.updates
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

/// Collects typed point updates into an [`Update`] batch
#[derive(Debug, Default)]
pub struct UpdateBuilder {
    updates: Vec<PointUpdate>,
}

impl UpdateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_binary(mut self, value: Binary, index: u16) -> Self {
        self.updates
            .push(PointUpdate::Binary(Indexed::new(index, value)));
        self
    }

    pub fn update_double_bit_binary(mut self, value: DoubleBitBinary, index: u16) -> Self {
        self.updates
            .push(PointUpdate::DoubleBitBinary(Indexed::new(index, value)));
        self
    }

    pub fn update_analog(mut self, value: Analog, index: u16) -> Self {
        self.updates
            .push(PointUpdate::Analog(Indexed::new(index, value)));
        self
    }

    pub fn update_counter(mut self, value: Counter, index: u16) -> Self {
        self.updates
            .push(PointUpdate::Counter(Indexed::new(index, value)));
        self
    }

    pub fn update_frozen_counter(mut self, value: FrozenCounter, index: u16) -> Self {
        self.updates
            .push(PointUpdate::FrozenCounter(Indexed::new(index, value)));
        self
    }

    pub fn update_binary_output_status(mut self, value: BinaryOutputStatus, index: u16) -> Self {
        self.updates
            .push(PointUpdate::BinaryOutputStatus(Indexed::new(index, value)));
        self
    }

    pub fn update_analog_output_status(mut self, value: AnalogOutputStatus, index: u16) -> Self {
        self.updates
            .push(PointUpdate::AnalogOutputStatus(Indexed::new(index, value)));
        self
    }

    pub fn build(self) -> Update {
        Update {
            updates: self.updates,
        }
    }
}

/// Handle to a running outstation, as provided by the underlying stack
///
/// Applying an update records the new values in the outstation's database;
/// event-class points generate events toward the master as a side effect.
pub trait OutstationHandle: Send + Sync {
    fn apply(&self, update: Update) -> Dnp3Result<()>;
}
