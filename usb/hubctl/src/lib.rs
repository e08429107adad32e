//! USB hub port power control.
//!
//! This crate lists the USB hubs attached to the host, reports the status of every
//! downstream port, and switches power on individual ports, using the hub class requests
//! from chapter 11 of the USB 2.0 specification:
//!
//! - GET_DESCRIPTOR (hub descriptor), to learn the number of ports and the power switching
//!   mode of each hub.
//! - GET_STATUS (port), decoded into [`usb::PortStatus`].
//! - SET_FEATURE / CLEAR_FEATURE (PORT_POWER), to turn a port on or off.
//!
//! Moving bytes on the bus is left to a [`transport::UsbBus`]; [`libusb::LibUsbBus`] is the
//! implementation used by the `hubctl` binary. Results are handed to a [`report::Reporter`]
//! rather than printed, so the binary decides how they look.

pub mod config;
pub mod enumerator;
mod error;
pub mod libusb;
pub mod power;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod transport;
pub mod usb;

pub use crate::config::{Config, HubTarget, Options, PowerState};
pub use crate::error::Error;

use crate::report::Reporter;
use crate::transport::UsbBus;

/// Lists every hub, then, if a port was given, switches its power and reports the hub's
/// ports again.
///
/// Problems with single devices during the listing are reported and skipped. Anything that
/// goes wrong once a power change was requested ends the run with an error.
pub fn run<B, R>(bus: &B, options: &Options, config: &Config, reporter: &mut R) -> Result<(), Error>
where
    B: UsbBus,
    R: Reporter + ?Sized,
{
    let registry = enumerator::enumerate(bus, config, reporter)?;

    let port = match options.port {
        Some(port) => port,
        None => return Ok(()),
    };

    let index = resolver::resolve(&registry, options.target)?;
    let hub = registry.get(index).ok_or(Error::TargetNotFound)?;

    let outcome = power::set_port_power(bus, index, hub, port, options.power, config)?;
    let confirmation_error = outcome.ports.error.clone();
    reporter.power(&outcome);

    match confirmation_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
