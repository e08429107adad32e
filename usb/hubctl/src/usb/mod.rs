pub use self::hub::{HubDescriptor, HubPortFeature, PortStatus, PowerSwitchingMode};
pub use self::setup::{ReqDirection, ReqRecipient, ReqType, Setup, SetupReq, PORT_STATUS_LEN};

/// bDeviceClass of a hub.
pub const CLASS_HUB: u8 = 0x09;

pub mod hub;
pub mod setup;
