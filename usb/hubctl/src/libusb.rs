//! [`UsbBus`] on top of libusb, through `rusb`.

use std::time::Duration;

use rusb::UsbContext;

use crate::transport::{ControlTransfer, TopologyEntry, TransportError, UsbBus};
use crate::usb::Setup;

impl From<rusb::Error> for TransportError {
    fn from(err: rusb::Error) -> Self {
        match err {
            rusb::Error::Timeout => Self::Timeout,
            rusb::Error::Pipe => Self::Stall,
            rusb::Error::NoDevice => Self::NoDevice,
            rusb::Error::Access => Self::Access,
            other => Self::Other(other.to_string()),
        }
    }
}

pub struct LibUsbBus {
    context: rusb::Context,
}

impl LibUsbBus {
    pub fn new() -> Result<Self, TransportError> {
        Ok(Self {
            context: rusb::Context::new()?,
        })
    }
}

impl UsbBus for LibUsbBus {
    type Device = rusb::Device<rusb::Context>;
    type Handle = LibUsbHandle;

    fn topology(&self) -> Result<Vec<TopologyEntry<Self::Device>>, TransportError> {
        let mut entries = Vec::new();
        for device in self.context.devices()?.iter() {
            let descriptor = match device.device_descriptor() {
                Ok(descriptor) => descriptor,
                Err(err) => {
                    log::debug!(
                        "bus {} dev {}: no device descriptor: {}",
                        device.bus_number(),
                        device.address(),
                        err
                    );
                    continue;
                }
            };
            entries.push(TopologyEntry {
                bus: device.bus_number(),
                address: device.address(),
                class: descriptor.class_code(),
                device,
            });
        }
        Ok(entries)
    }

    fn open(&self, device: &Self::Device) -> Result<LibUsbHandle, TransportError> {
        Ok(LibUsbHandle(device.open()?))
    }
}

/// An open device. libusb closes it when this is dropped.
pub struct LibUsbHandle(rusb::DeviceHandle<rusb::Context>);

impl ControlTransfer for LibUsbHandle {
    fn control_in(
        &mut self,
        setup: &Setup,
        data: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportError> {
        Ok(self.0.read_control(
            setup.kind,
            setup.request,
            setup.value,
            setup.index,
            data,
            timeout,
        )?)
    }

    fn control_out(
        &mut self,
        setup: &Setup,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, TransportError> {
        Ok(self.0.write_control(
            setup.kind,
            setup.request,
            setup.value,
            setup.index,
            data,
            timeout,
        )?)
    }
}
