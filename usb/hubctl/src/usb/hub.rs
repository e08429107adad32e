use crate::Error;

/// The fixed part of a USB 2.0 hub class descriptor, decoded from the bytes of a
/// GET_DESCRIPTOR reply.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HubDescriptor {
    pub length: u8,
    pub kind: u8,
    pub ports: u8,
    pub characteristics: u16,
    pub power_on_good: u8,
    pub current: u8,
    /*TODO: the variable length DeviceRemovable and PortPwrCtrlMask bitmaps follow the
    header; decode them once per-port removability is reported.
    */
}

impl HubDescriptor {
    pub const DESCRIPTOR_KIND: u8 = 0x29;

    /// Size of the header fields above. A reply must be strictly longer than this to be
    /// accepted.
    pub const HEADER_LEN: usize = 7;

    pub const CHAR_LPSM_MASK: u16 = 0x0003;
    pub const CHAR_PORT_INDICATORS: u16 = 0x0080;

    /// Decodes the received part of a descriptor reply. No field is read unless the reply is
    /// longer than the header and carries the hub descriptor type.
    pub fn parse(received: &[u8]) -> Result<Self, Error> {
        if received.len() <= Self::HEADER_LEN {
            return Err(Error::DescriptorTooShort {
                len: received.len(),
            });
        }
        if received[1] != Self::DESCRIPTOR_KIND {
            return Err(Error::UnexpectedDescriptorKind { kind: received[1] });
        }

        Ok(Self {
            length: received[0],
            kind: received[1],
            ports: received[2],
            characteristics: u16::from_le_bytes([received[3], received[4]]),
            power_on_good: received[5],
            current: received[6],
        })
    }

    pub fn power_switching(&self) -> PowerSwitchingMode {
        PowerSwitchingMode::from_characteristics(self.characteristics)
    }

    pub fn port_indicators(&self) -> bool {
        self.characteristics & Self::CHAR_PORT_INDICATORS != 0
    }
}

/// Logical power switching mode, bits 0..=1 of wHubCharacteristics.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PowerSwitchingMode {
    /// All ports are powered at once.
    Ganged,
    Individual,
    /// Ports are always powered. Both values 2 and 3 mean this.
    None,
}

impl PowerSwitchingMode {
    pub fn from_characteristics(characteristics: u16) -> Self {
        match characteristics & HubDescriptor::CHAR_LPSM_MASK {
            0 => Self::Ganged,
            1 => Self::Individual,
            _ => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ganged => "ganged",
            Self::Individual => "individual",
            Self::None => "no",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum HubPortFeature {
    PortPower = 8,
}

bitflags::bitflags! {
    /// wPortStatus, the first half of a GET_STATUS(port) reply. The change half is not
    /// decoded.
    #[derive(Default)]
    #[repr(transparent)]
    pub struct PortStatus: u16 {
        const CONNECTION = 1 << 0;
        const ENABLE = 1 << 1;
        const SUSPEND = 1 << 2;
        const OVER_CURRENT = 1 << 3;
        const RESET = 1 << 4;
        // bits 5-7 reserved
        const POWER = 1 << 8;
        const LOW_SPEED = 1 << 9;
        const HIGH_SPEED = 1 << 10;
        const TEST = 1 << 11;
        const INDICATOR = 1 << 12;
        // bits 13-15 reserved
    }
}

impl PortStatus {
    pub fn decode(reply: [u8; 4]) -> Self {
        Self::from_bits_truncate(u16::from_le_bytes([reply[0], reply[1]]))
    }

    pub fn is_connected(&self) -> bool {
        self.contains(Self::CONNECTION)
    }
    pub fn is_enabled(&self) -> bool {
        self.contains(Self::ENABLE)
    }
    pub fn is_suspended(&self) -> bool {
        self.contains(Self::SUSPEND)
    }
    pub fn is_over_current(&self) -> bool {
        self.contains(Self::OVER_CURRENT)
    }
    pub fn is_resetting(&self) -> bool {
        self.contains(Self::RESET)
    }
    pub fn is_powered(&self) -> bool {
        self.contains(Self::POWER)
    }
    pub fn is_low_speed(&self) -> bool {
        self.contains(Self::LOW_SPEED)
    }
    pub fn is_high_speed(&self) -> bool {
        self.contains(Self::HIGH_SPEED)
    }
    pub fn is_test_mode(&self) -> bool {
        self.contains(Self::TEST)
    }
    pub fn is_indicator_active(&self) -> bool {
        self.contains(Self::INDICATOR)
    }
}
