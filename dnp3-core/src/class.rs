//! Point classes and class masks
//!
//! DNP3 groups points into four classes for polling purposes: Class 0 holds
//! static (current value) data, Classes 1-3 hold event data ordered by
//! priority. Scans address a *set* of classes, so the mask type below is the
//! unit of scan configuration.

use serde::{Deserialize, Serialize};

/// Polling class assigned to a point at configuration time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointClass {
    /// Static (current value) data
    Class0,
    /// Highest priority event data
    Class1,
    /// Medium priority event data
    Class2,
    /// Lowest priority event data
    Class3,
}

impl PointClass {
    fn bit(self) -> u8 {
        match self {
            PointClass::Class0 => 0x01,
            PointClass::Class1 => 0x02,
            PointClass::Class2 => 0x04,
            PointClass::Class3 => 0x08,
        }
    }
}

/// Set of point classes addressed by a single class-based poll
///
/// Two built-in scan flavors use this: a slow "integrity" scan with
/// [`ClassField::all_classes`] and a fast "exception" scan covering event
/// classes only. Masks are plain values; overlapping masks on independent
/// scans are permitted and never de-duplicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ClassField(u8);

impl ClassField {
    /// Empty mask addressing no classes
    pub const fn none() -> Self {
        ClassField(0)
    }

    /// Mask covering all four classes (integrity scan)
    pub const fn all_classes() -> Self {
        ClassField(0x0f)
    }

    /// Mask covering the three event classes (exception scan)
    pub const fn all_events() -> Self {
        ClassField(0x0e)
    }

    /// Mask covering a single class
    pub fn single(class: PointClass) -> Self {
        ClassField(class.bit())
    }

    /// Add a class to the mask
    pub fn with(self, class: PointClass) -> Self {
        ClassField(self.0 | class.bit())
    }

    /// Check whether a class is part of the mask
    pub fn contains(self, class: PointClass) -> bool {
        self.0 & class.bit() != 0
    }

    /// Check whether the mask addresses no classes at all
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check whether the mask addresses any event class (1-3)
    pub fn has_events(self) -> bool {
        self.0 & 0x0e != 0
    }
}

impl std::fmt::Display for ClassField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (class, name) in [
            (PointClass::Class0, "0"),
            (PointClass::Class1, "1"),
            (PointClass::Class2, "2"),
            (PointClass::Class3, "3"),
        ] {
            if self.contains(class) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "Class{}", name)?;
                first = false;
            }
        }
        if first {
            write!(f, "None")?;
        }
        Ok(())
    }
}
