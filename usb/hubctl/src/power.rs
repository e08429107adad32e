use crate::config::{Config, PowerState};
use crate::enumerator::list_ports;
use crate::registry::HubRecord;
use crate::report::PowerOutcome;
use crate::transport::{ControlTransfer, UsbBus};
use crate::usb::{HubPortFeature, Setup};
use crate::Error;

/// Switches power on one port of a registered hub, then reads back all of the hub's ports.
///
/// The hub is opened again for this; nothing is kept open from enumeration. The port must be
/// one the hub's descriptor advertised.
pub fn set_port_power<B: UsbBus>(
    bus: &B,
    hub_index: usize,
    hub: &HubRecord<B::Device>,
    port: u16,
    power: PowerState,
    config: &Config,
) -> Result<PowerOutcome, Error> {
    if port == 0 || port > u16::from(hub.port_count) {
        return Err(Error::PortOutOfRange {
            port,
            port_count: hub.port_count,
        });
    }

    let timeout = config.timeout();
    let mut handle = bus
        .open(&hub.device_ref)
        .map_err(|source| Error::DeviceOpenFailed {
            bus: hub.bus,
            device: hub.device,
            source,
        })?;

    let setup = match power {
        PowerState::On => Setup::set_port_feature(HubPortFeature::PortPower, port),
        PowerState::Off => Setup::clear_port_feature(HubPortFeature::PortPower, port),
    };
    log::info!(
        "hub {} (bus {} dev {}) port {}: power {:?}",
        hub_index,
        hub.bus,
        hub.device,
        port,
        power
    );
    handle
        .control_out(&setup, &[], timeout)
        .map_err(|source| Error::PowerCommandFailed { port, source })?;

    let ports = list_ports(&mut handle, hub.port_count, timeout);

    Ok(PowerOutcome {
        hub: hub_index,
        bus: hub.bus,
        device: hub.device,
        port,
        power,
        ports,
    })
}
