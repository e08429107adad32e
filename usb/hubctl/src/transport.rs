//! The seam between the hub protocol and whatever actually moves bytes on the bus.
//!
//! Bus and device enumeration, and the submission of control transfers, are left to an
//! implementation of [`UsbBus`]. [`crate::libusb`] provides one on top of libusb.

use std::time::Duration;

use thiserror::Error;

use crate::usb::Setup;

#[derive(Clone, Debug, Error)]
pub enum TransportError {
    #[error("operation timed out")]
    Timeout,

    #[error("request stalled")]
    Stall,

    #[error("no such device (it may have been disconnected)")]
    NoDevice,

    #[error("access denied (insufficient permissions)")]
    Access,

    #[error("unexpected short packet of size {0}")]
    ShortPacket(usize),

    #[error("{0}")]
    Other(String),
}

/// One device as seen while walking the bus topology.
#[derive(Clone, Debug)]
pub struct TopologyEntry<D> {
    pub bus: u8,
    pub address: u8,
    /// bDeviceClass from the device descriptor.
    pub class: u8,
    pub device: D,
}

pub trait UsbBus {
    /// Reference to a device that can be opened again later.
    type Device: Clone;
    /// An open device. Dropping it closes the device.
    type Handle: ControlTransfer;

    fn topology(&self) -> Result<Vec<TopologyEntry<Self::Device>>, TransportError>;

    fn open(&self, device: &Self::Device) -> Result<Self::Handle, TransportError>;
}

pub trait ControlTransfer {
    /// Device-to-host transfer. Returns the number of bytes received into `data`.
    fn control_in(
        &mut self,
        setup: &Setup,
        data: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportError>;

    /// Host-to-device transfer. Returns the number of bytes sent from `data`.
    fn control_out(
        &mut self,
        setup: &Setup,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, TransportError>;
}
