//! Application-level outstation callbacks
//!
//! The stack asks the application for the IIN bits it controls and for
//! restart support; everything has a conservative default so a minimal
//! outstation implements nothing.

use serde::{Deserialize, Serialize};

/// Whether a restart function is supported, and at what time resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestartMode {
    #[default]
    Unsupported,
    SupportedDelayFine,
    SupportedDelayCoarse,
}

/// The IIN field as transmitted in response headers (two octets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IinField {
    pub lsb: u8,
    pub msb: u8,
}

/// The application-controlled subset of the IIN bits
///
/// The stack merges these with the bits it owns (restart, events pending,
/// etc.) on every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApplicationIin {
    /// IIN1.4: the outstation needs time synchronization
    pub need_time: bool,
    /// IIN1.5: some points are in local (non-remote) control
    pub local_control: bool,
    /// IIN1.6: abnormal device condition
    pub device_trouble: bool,
    /// IIN2.5: configuration is corrupt
    pub config_corrupt: bool,
}

impl ApplicationIin {
    /// Pack into the two-octet wire representation
    pub fn to_iin(self) -> IinField {
        let mut field = IinField::default();
        if self.need_time {
            field.lsb |= 0x10;
        }
        if self.local_control {
            field.lsb |= 0x20;
        }
        if self.device_trouble {
            field.lsb |= 0x40;
        }
        if self.config_corrupt {
            field.msb |= 0x20;
        }
        field
    }
}

/// Application callbacks consumed by the outstation stack
pub trait OutstationApplication: Send {
    /// IIN bits under application control, sampled per response
    fn application_iin(&self) -> ApplicationIin {
        ApplicationIin::default()
    }

    fn cold_restart_support(&self) -> RestartMode {
        RestartMode::Unsupported
    }

    fn warm_restart_support(&self) -> RestartMode {
        RestartMode::Unsupported
    }

    fn supports_write_absolute_time(&self) -> bool {
        false
    }

    fn supports_assign_class(&self) -> bool {
        false
    }
}

/// Application with every default left in place
pub struct DefaultOutstationApplication;

impl OutstationApplication for DefaultOutstationApplication {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iin_packing() {
        let iin = ApplicationIin {
            need_time: true,
            local_control: false,
            device_trouble: true,
            config_corrupt: true,
        };
        let field = iin.to_iin();
        assert_eq!(field.lsb, 0x50);
        assert_eq!(field.msb, 0x20);

        assert_eq!(ApplicationIin::default().to_iin(), IinField::default());
    }

    #[test]
    fn test_defaults_are_conservative() {
        let app = DefaultOutstationApplication;
        assert_eq!(app.cold_restart_support(), RestartMode::Unsupported);
        assert_eq!(app.warm_restart_support(), RestartMode::Unsupported);
        assert!(!app.supports_write_absolute_time());
        assert!(!app.supports_assign_class());
        assert_eq!(app.application_iin(), ApplicationIin::default());
    }
}
