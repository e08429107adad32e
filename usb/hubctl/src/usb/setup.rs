use super::hub::{HubDescriptor, HubPortFeature};

/// The eight bytes of a control transfer's setup stage.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Setup {
    pub kind: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub length: u16,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum ReqDirection {
    HostToDevice = 0,
    DeviceToHost = 1,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum ReqType {
    Standard = 0,

    /// Hub class requests. Everything this tool sends is one of these.
    Class = 1,

    Vendor = 2,

    /// Reserved
    Reserved = 3,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum ReqRecipient {
    Device = 0,
    Interface = 1,
    Endpoint = 2,
    /// Used by hubs to address one of their downstream ports.
    Other = 3,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum SetupReq {
    GetStatus = 0x00,
    ClearFeature = 0x01,
    SetFeature = 0x03,
    GetDescriptor = 0x06,
}

pub const USB_SETUP_DIR_BIT: u8 = 1 << 7;
pub const USB_SETUP_DIR_SHIFT: u8 = 7;
pub const USB_SETUP_REQ_TY_MASK: u8 = 0x60;
pub const USB_SETUP_REQ_TY_SHIFT: u8 = 5;
pub const USB_SETUP_RECIPIENT_MASK: u8 = 0x1F;
pub const USB_SETUP_RECIPIENT_SHIFT: u8 = 0;

/// Length of the reply to a hub class GET_STATUS(port) request.
pub const PORT_STATUS_LEN: u16 = 4;

pub const fn request_type(direction: ReqDirection, ty: ReqType, recipient: ReqRecipient) -> u8 {
    ((direction as u8) << USB_SETUP_DIR_SHIFT)
        | ((ty as u8) << USB_SETUP_REQ_TY_SHIFT)
        | ((recipient as u8) << USB_SETUP_RECIPIENT_SHIFT)
}

impl Setup {
    pub fn direction(&self) -> ReqDirection {
        if self.kind & USB_SETUP_DIR_BIT == 0 {
            ReqDirection::HostToDevice
        } else {
            ReqDirection::DeviceToHost
        }
    }
    pub const fn req_ty(&self) -> u8 {
        (self.kind & USB_SETUP_REQ_TY_MASK) >> USB_SETUP_REQ_TY_SHIFT
    }
    pub const fn req_recipient(&self) -> u8 {
        (self.kind & USB_SETUP_RECIPIENT_MASK) >> USB_SETUP_RECIPIENT_SHIFT
    }

    /// GET_DESCRIPTOR for the hub class descriptor, read into a buffer of `length` bytes.
    pub const fn get_hub_descriptor(length: u16) -> Self {
        Self {
            kind: request_type(
                ReqDirection::DeviceToHost,
                ReqType::Class,
                ReqRecipient::Device,
            ),
            request: SetupReq::GetDescriptor as u8,
            value: (HubDescriptor::DESCRIPTOR_KIND as u16) << 8,
            index: 0,
            length,
        }
    }

    pub const fn get_port_status(port: u16) -> Self {
        Self {
            kind: request_type(
                ReqDirection::DeviceToHost,
                ReqType::Class,
                ReqRecipient::Other,
            ),
            request: SetupReq::GetStatus as u8,
            value: 0,
            index: port,
            length: PORT_STATUS_LEN,
        }
    }

    pub const fn set_port_feature(feature: HubPortFeature, port: u16) -> Self {
        Self {
            kind: request_type(ReqDirection::HostToDevice, ReqType::Class, ReqRecipient::Other),
            request: SetupReq::SetFeature as u8,
            value: feature as u16,
            index: port,
            length: 0,
        }
    }

    pub const fn clear_port_feature(feature: HubPortFeature, port: u16) -> Self {
        Self {
            kind: request_type(ReqDirection::HostToDevice, ReqType::Class, ReqRecipient::Other),
            request: SetupReq::ClearFeature as u8,
            value: feature as u16,
            index: port,
            length: 0,
        }
    }
}
