//! Static point-table configuration
//!
//! An outstation's database is fixed at configuration time: each point has
//! a polling class and the group/variations used to encode it statically
//! and as an event. These types are plain data (serde-derived) so point
//! tables can be loaded from files.

use serde::{Deserialize, Serialize};

use dnp3_core::PointClass;

/// Static encoding of a binary input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaticBinaryVariation {
    /// Packed format (g1v1)
    Group1Var1,
    /// With flags (g1v2)
    Group1Var2,
}

/// Event encoding of a binary input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventBinaryVariation {
    /// Without time (g2v1)
    Group2Var1,
    /// With absolute time (g2v2)
    Group2Var2,
    /// With relative time (g2v3)
    Group2Var3,
}

/// Static encoding of an analog input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaticAnalogVariation {
    /// 32-bit with flags (g30v1)
    Group30Var1,
    /// 16-bit with flags (g30v2)
    Group30Var2,
    /// 32-bit without flags (g30v3)
    Group30Var3,
    /// Single-precision float with flags (g30v5)
    Group30Var5,
    /// Double-precision float with flags (g30v6)
    Group30Var6,
}

/// Event encoding of an analog input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventAnalogVariation {
    /// 32-bit without time (g32v1)
    Group32Var1,
    /// 32-bit with time (g32v3)
    Group32Var3,
    /// Single-precision float without time (g32v5)
    Group32Var5,
    /// Double-precision float with time (g32v7)
    Group32Var7,
}

/// Per-point configuration of a binary input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinaryPointConfig {
    pub class: PointClass,
    pub static_variation: StaticBinaryVariation,
    pub event_variation: EventBinaryVariation,
}

impl Default for BinaryPointConfig {
    fn default() -> Self {
        Self {
            class: PointClass::Class1,
            static_variation: StaticBinaryVariation::Group1Var2,
            event_variation: EventBinaryVariation::Group2Var2,
        }
    }
}

/// Per-point configuration of an analog input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalogPointConfig {
    pub class: PointClass,
    pub static_variation: StaticAnalogVariation,
    pub event_variation: EventAnalogVariation,
    /// Minimum change before an event is generated
    pub deadband: f64,
}

impl Default for AnalogPointConfig {
    fn default() -> Self {
        Self {
            class: PointClass::Class2,
            static_variation: StaticAnalogVariation::Group30Var1,
            event_variation: EventAnalogVariation::Group32Var7,
            deadband: 0.0,
        }
    }
}

/// Sizing of the outstation's event buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventBufferConfig {
    pub max_binary: u16,
    pub max_analog: u16,
    pub max_counter: u16,
}

impl EventBufferConfig {
    /// Same capacity for every event type
    pub fn all_types(max: u16) -> Self {
        Self {
            max_binary: max,
            max_analog: max,
            max_counter: max,
        }
    }
}

/// The outstation's point database configuration
///
/// Indexes are dense: a database created with `new(10)` has binary and
/// analog points 0 through 9, each starting from the per-type default
/// configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub binary_input: Vec<BinaryPointConfig>,
    pub analog_input: Vec<AnalogPointConfig>,
    pub event_buffers: EventBufferConfig,
}

impl DatabaseConfig {
    /// Create a database with `points` binary and analog inputs at their
    /// default configuration
    pub fn new(points: usize) -> Self {
        Self {
            binary_input: vec![BinaryPointConfig::default(); points],
            analog_input: vec![AnalogPointConfig::default(); points],
            event_buffers: EventBufferConfig::default(),
        }
    }

    pub fn binary_input_mut(&mut self, index: usize) -> Option<&mut BinaryPointConfig> {
        self.binary_input.get_mut(index)
    }

    pub fn analog_input_mut(&mut self, index: usize) -> Option<&mut AnalogPointConfig> {
        self.analog_input.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_defaults() {
        let db = DatabaseConfig::new(10);
        assert_eq!(db.binary_input.len(), 10);
        assert_eq!(db.analog_input.len(), 10);
        assert_eq!(db.analog_input[3].class, PointClass::Class2);
        assert_eq!(
            db.analog_input[3].static_variation,
            StaticAnalogVariation::Group30Var1
        );
    }

    #[test]
    fn test_point_overrides() {
        let mut db = DatabaseConfig::new(4);
        db.analog_input_mut(1).unwrap().class = PointClass::Class3;
        db.analog_input_mut(1).unwrap().deadband = 0.5;
        assert_eq!(db.analog_input[1].class, PointClass::Class3);
        assert_eq!(db.analog_input[0].class, PointClass::Class2);
        assert!(db.binary_input_mut(7).is_none());
    }

    #[test]
    fn test_event_buffer_all_types() {
        let buffers = EventBufferConfig::all_types(10);
        assert_eq!(buffers.max_binary, 10);
        assert_eq!(buffers.max_analog, 10);
        assert_eq!(buffers.max_counter, 10);
    }
}
