//! Measurement kinds and values
//!
//! The set of measurement kinds a DNP3 outstation can report is closed, so
//! it is modelled as an enum ([`MeasurementType`]) and a tagged batch type
//! ([`MeasurementBatch`]) carrying one homogeneous collection per kind.
//! Dispatching over a batch is an exhaustive `match`: there is no runtime
//! type table and no way to receive an "unregistered" kind — adding a kind
//! is a compile error until every dispatcher handles it.

use bytes::Bytes;

/// Quality flags attached to a measurement value
///
/// Bit layout follows the common DNP3 flag octet. Only the bits the session
/// core itself inspects are named; the raw value is preserved for
/// application handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(pub u8);

impl Flags {
    pub const ONLINE: Flags = Flags(0x01);
    pub const RESTART: Flags = Flags(0x02);
    pub const COMM_LOST: Flags = Flags(0x04);
    pub const REMOTE_FORCED: Flags = Flags(0x08);
    pub const LOCAL_FORCED: Flags = Flags(0x10);

    /// Check whether all bits of `other` are set in `self`
    pub fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check the ONLINE bit
    pub fn is_online(self) -> bool {
        self.contains(Flags::ONLINE)
    }
}

/// Millisecond timestamp as reported by the outstation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn new(millis: u64) -> Self {
        Timestamp(millis)
    }

    pub fn millis(self) -> u64 {
        self.0
    }
}

/// Double-bit binary value (four states instead of two)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleBit {
    Intermediate,
    DeterminedOff,
    DeterminedOn,
    Indeterminate,
}

/// Binary input value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binary {
    pub value: bool,
    pub flags: Flags,
    pub time: Option<Timestamp>,
}

/// Double-bit binary input value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleBitBinary {
    pub value: DoubleBit,
    pub flags: Flags,
    pub time: Option<Timestamp>,
}

/// Analog input value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Analog {
    pub value: f64,
    pub flags: Flags,
    pub time: Option<Timestamp>,
}

/// Counter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Counter {
    pub value: u32,
    pub flags: Flags,
    pub time: Option<Timestamp>,
}

/// Frozen counter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrozenCounter {
    pub value: u32,
    pub flags: Flags,
    pub time: Option<Timestamp>,
}

/// Echo of the last accepted binary output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryOutputStatus {
    pub value: bool,
    pub flags: Flags,
    pub time: Option<Timestamp>,
}

/// Echo of the last accepted analog output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalogOutputStatus {
    pub value: f64,
    pub flags: Flags,
    pub time: Option<Timestamp>,
}

/// Free-form octet string value
#[derive(Debug, Clone, PartialEq)]
pub struct OctetString {
    pub value: Bytes,
}

/// Time and interval value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAndInterval {
    pub time: Timestamp,
    pub interval: u32,
    pub units: u8,
}

macro_rules! impl_flagged_new {
    ($name:ident, $value_ty:ty) => {
        impl $name {
            /// Create a value with the ONLINE flag and no timestamp
            pub fn new(value: $value_ty) -> Self {
                Self {
                    value,
                    flags: Flags::ONLINE,
                    time: None,
                }
            }

            /// Attach a timestamp
            pub fn at(mut self, time: Timestamp) -> Self {
                self.time = Some(time);
                self
            }

            /// Replace the quality flags
            pub fn with_flags(mut self, flags: Flags) -> Self {
                self.flags = flags;
                self
            }
        }
    };
}

impl_flagged_new!(Binary, bool);
impl_flagged_new!(DoubleBitBinary, DoubleBit);
impl_flagged_new!(Analog, f64);
impl_flagged_new!(Counter, u32);
impl_flagged_new!(FrozenCounter, u32);
impl_flagged_new!(BinaryOutputStatus, bool);
impl_flagged_new!(AnalogOutputStatus, f64);

impl OctetString {
    pub fn new(value: impl Into<Bytes>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Value paired with its point index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indexed<T> {
    pub index: u16,
    pub value: T,
}

impl<T> Indexed<T> {
    pub fn new(index: u16, value: T) -> Self {
        Self { index, value }
    }
}

/// The closed set of measurement kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementType {
    Binary,
    DoubleBitBinary,
    Analog,
    Counter,
    FrozenCounter,
    BinaryOutputStatus,
    AnalogOutputStatus,
    OctetString,
    TimeAndInterval,
}

impl MeasurementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementType::Binary => "Binary",
            MeasurementType::DoubleBitBinary => "DoubleBitBinary",
            MeasurementType::Analog => "Analog",
            MeasurementType::Counter => "Counter",
            MeasurementType::FrozenCounter => "FrozenCounter",
            MeasurementType::BinaryOutputStatus => "BinaryOutputStatus",
            MeasurementType::AnalogOutputStatus => "AnalogOutputStatus",
            MeasurementType::OctetString => "OctetString",
            MeasurementType::TimeAndInterval => "TimeAndInterval",
        }
    }
}

impl std::fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One homogeneous batch of measurement updates
///
/// A batch carries exactly one measurement kind; the kind tag and the
/// element type are coupled by construction, so a consumer matching on the
/// batch gets the correctly typed collection without any downcasting.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasurementBatch {
    Binary(Vec<Indexed<Binary>>),
    DoubleBitBinary(Vec<Indexed<DoubleBitBinary>>),
    Analog(Vec<Indexed<Analog>>),
    Counter(Vec<Indexed<Counter>>),
    FrozenCounter(Vec<Indexed<FrozenCounter>>),
    BinaryOutputStatus(Vec<Indexed<BinaryOutputStatus>>),
    AnalogOutputStatus(Vec<Indexed<AnalogOutputStatus>>),
    OctetString(Vec<Indexed<OctetString>>),
    TimeAndInterval(Vec<Indexed<TimeAndInterval>>),
}

impl MeasurementBatch {
    /// The measurement kind shared by every entry of the batch
    pub fn measurement_type(&self) -> MeasurementType {
        match self {
            MeasurementBatch::Binary(_) => MeasurementType::Binary,
            MeasurementBatch::DoubleBitBinary(_) => MeasurementType::DoubleBitBinary,
            MeasurementBatch::Analog(_) => MeasurementType::Analog,
            MeasurementBatch::Counter(_) => MeasurementType::Counter,
            MeasurementBatch::FrozenCounter(_) => MeasurementType::FrozenCounter,
            MeasurementBatch::BinaryOutputStatus(_) => MeasurementType::BinaryOutputStatus,
            MeasurementBatch::AnalogOutputStatus(_) => MeasurementType::AnalogOutputStatus,
            MeasurementBatch::OctetString(_) => MeasurementType::OctetString,
            MeasurementBatch::TimeAndInterval(_) => MeasurementType::TimeAndInterval,
        }
    }

    /// Number of entries in the batch
    pub fn len(&self) -> usize {
        match self {
            MeasurementBatch::Binary(v) => v.len(),
            MeasurementBatch::DoubleBitBinary(v) => v.len(),
            MeasurementBatch::Analog(v) => v.len(),
            MeasurementBatch::Counter(v) => v.len(),
            MeasurementBatch::FrozenCounter(v) => v.len(),
            MeasurementBatch::BinaryOutputStatus(v) => v.len(),
            MeasurementBatch::AnalogOutputStatus(v) => v.len(),
            MeasurementBatch::OctetString(v) => v.len(),
            MeasurementBatch::TimeAndInterval(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
