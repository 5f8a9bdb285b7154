//! Group/variation header context
//!
//! Every object header inside a response fragment names the group/variation
//! it was encoded with. The session core never decodes objects itself, but
//! it forwards that context to measurement handlers so applications can
//! tell, say, an event report from a static report.

use serde::{Deserialize, Serialize};

/// Group/variation pair of an object header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variation {
    pub group: u8,
    pub variation: u8,
}

impl Variation {
    pub fn new(group: u8, variation: u8) -> Self {
        Self { group, variation }
    }
}

impl std::fmt::Display for Variation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}v{}", self.group, self.variation)
    }
}

/// Context of the object header a measurement batch arrived under
///
/// Constant across a whole batch and supplied once per batch, not per
/// entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Group/variation the batch was encoded with
    pub variation: Variation,
    /// Position of the header within its fragment
    pub header_index: usize,
    /// Whether the header carries event data (as opposed to static data)
    pub is_event: bool,
}

impl HeaderInfo {
    pub fn new(variation: Variation, header_index: usize, is_event: bool) -> Self {
        Self {
            variation,
            header_index,
            is_event,
        }
    }
}

/// Context of a whole response fragment
///
/// A fragment may carry several headers of different measurement kinds;
/// begin/end notifications bracket them so a consumer can correlate the
/// batches of one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentInfo {
    /// Application-layer sequence number of the fragment
    pub sequence: u8,
    /// Whether the fragment was an unsolicited response
    pub unsolicited: bool,
}

impl FragmentInfo {
    pub fn new(sequence: u8, unsolicited: bool) -> Self {
        Self {
            sequence,
            unsolicited,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variation_display() {
        assert_eq!(Variation::new(30, 1).to_string(), "g30v1");
        assert_eq!(Variation::new(2, 2).to_string(), "g2v2");
    }
}
