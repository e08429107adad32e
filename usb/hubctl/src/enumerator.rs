use std::time::Duration;

use crate::config::Config;
use crate::registry::{HubRecord, HubRegistry};
use crate::report::{HubReport, PortEntry, PortListing, Reporter};
use crate::transport::{ControlTransfer, TransportError, UsbBus};
use crate::usb::{self, HubDescriptor, PortStatus, Setup};
use crate::Error;

/// Reads the hub class descriptor through an open handle.
pub fn read_hub_descriptor<H: ControlTransfer>(
    handle: &mut H,
    buffer_len: u16,
    timeout: Duration,
) -> Result<HubDescriptor, Error> {
    let mut buf = vec![0u8; usize::from(buffer_len)];
    let setup = Setup::get_hub_descriptor(buffer_len);
    log::trace!("GET_DESCRIPTOR {:X?}", setup);

    let received = handle
        .control_in(&setup, &mut buf, timeout)
        .map_err(Error::DescriptorReadFailed)?;
    HubDescriptor::parse(&buf[..received.min(buf.len())])
}

pub fn read_port_status<H: ControlTransfer>(
    handle: &mut H,
    port: u16,
    timeout: Duration,
) -> Result<PortStatus, Error> {
    let mut reply = [0u8; usb::PORT_STATUS_LEN as usize];
    let setup = Setup::get_port_status(port);

    let received = handle
        .control_in(&setup, &mut reply, timeout)
        .and_then(|received| {
            if received < reply.len() {
                Err(TransportError::ShortPacket(received))
            } else {
                Ok(received)
            }
        })
        .map_err(|source| Error::PortStatusReadFailed { port, source })?;
    log::trace!("port {} status {:02X?} ({} bytes)", port, reply, received);

    Ok(PortStatus::decode(reply))
}

/// Reads the status of ports `1..=port_count` in order, stopping at the first failure.
pub fn list_ports<H: ControlTransfer>(
    handle: &mut H,
    port_count: u8,
    timeout: Duration,
) -> PortListing {
    let mut listing = PortListing {
        port_count,
        entries: Vec::with_capacity(port_count.into()),
        error: None,
    };

    for port in 1..=u16::from(port_count) {
        match read_port_status(handle, port, timeout) {
            Ok(status) => listing.entries.push(PortEntry { port, status }),
            Err(err) => {
                log::debug!("stopping port listing: {}", err);
                listing.error = Some(err);
                break;
            }
        }
    }

    listing
}

/// Walks the bus for hub class devices, registering every hub whose descriptor can be read
/// and reporting its ports.
///
/// A device that cannot be opened, or whose descriptor cannot be read, is reported and
/// skipped. Finding no hub at all is an error, as is finding more than the registry holds.
pub fn enumerate<B, R>(
    bus: &B,
    config: &Config,
    reporter: &mut R,
) -> Result<HubRegistry<B::Device>, Error>
where
    B: UsbBus,
    R: Reporter + ?Sized,
{
    let timeout = config.timeout();
    let mut registry = HubRegistry::with_capacity(config.max_hubs);

    let topology = bus.topology().map_err(Error::TopologyUnavailable)?;

    for entry in topology.iter().filter(|entry| entry.class == usb::CLASS_HUB) {
        let skipped = |error: Error| HubReport::Skipped {
            bus: entry.bus,
            device: entry.address,
            error,
        };

        let mut handle = match bus.open(&entry.device) {
            Ok(handle) => handle,
            Err(source) => {
                log::debug!("bus {} dev {}: open failed", entry.bus, entry.address);
                reporter.hub(&skipped(Error::DeviceOpenFailed {
                    bus: entry.bus,
                    device: entry.address,
                    source,
                }));
                continue;
            }
        };

        let descriptor =
            match read_hub_descriptor(&mut handle, config.descriptor_buffer_len, timeout) {
                Ok(descriptor) => descriptor,
                Err(err) => {
                    log::debug!("bus {} dev {}: {}", entry.bus, entry.address, err);
                    reporter.hub(&skipped(err));
                    continue;
                }
            };

        let index = registry.register(HubRecord {
            bus: entry.bus,
            device: entry.address,
            port_count: descriptor.ports,
            device_ref: entry.device.clone(),
        })?;
        log::info!(
            "hub {} at bus {} dev {}: {} ports, {} power switching",
            index,
            entry.bus,
            entry.address,
            descriptor.ports,
            descriptor.power_switching().as_str()
        );

        let ports = list_ports(&mut handle, descriptor.ports, timeout);
        drop(handle);

        reporter.hub(&HubReport::Registered {
            index,
            bus: entry.bus,
            device: entry.address,
            descriptor,
            ports,
        });
    }

    if registry.is_empty() {
        return Err(Error::NoHubFound);
    }
    Ok(registry)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::report::Collected;
    use crate::transport::mock::{MockBus, Reply};
    use crate::usb::SetupReq;

    #[test]
    fn registers_hubs_and_lists_ports() {
        let mut bus = MockBus::default();
        let hub = bus.add_hub(1, 2, 4);
        bus.add_device(1, 3, 0x00);
        bus.add_hub(2, 1, 2);
        bus.reply(
            hub,
            &Setup::get_port_status(2),
            Reply::Data(vec![0x03, 0x05, 0x00, 0x00]),
        );

        let mut reports = Collected::default();
        let registry = enumerate(&bus, &Config::default(), &mut reports).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find_by_address(2, 1), Some(1));
        assert_eq!(registry.get(0).unwrap().port_count, 4);

        assert_eq!(reports.hubs.len(), 2);
        match &reports.hubs[0] {
            HubReport::Registered {
                index: 0,
                descriptor,
                ports,
                ..
            } => {
                assert_eq!(descriptor.ports, 4);
                assert!(ports.is_complete());
                assert_eq!(ports.entries.len(), 4);
                let port2 = ports.get(2).unwrap();
                assert!(port2.is_connected() && port2.is_enabled());
                assert!(port2.is_powered() && port2.is_high_speed());
                assert!(ports.is_last(&ports.entries[3]));
            }
            other => panic!("unexpected report {:?}", other),
        }

        // Handles are closed before the next device is opened.
        let log = bus.log.borrow();
        assert_eq!(log.opened, 2);
        assert_eq!(log.closed, 2);
    }

    #[test]
    fn short_descriptor_skips_hub() {
        let mut bus = MockBus::default();
        let bad = bus.add_device(1, 7, usb::CLASS_HUB);
        bus.reply(
            bad,
            &Setup::get_hub_descriptor(0),
            Reply::Data(vec![0x09, 0x29, 0x04, 0x01, 0x00, 0x32, 0x64]),
        );
        bus.add_hub(1, 8, 3);

        let mut reports = Collected::default();
        let registry = enumerate(&bus, &Config::default(), &mut reports).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find_by_address(1, 7), None);
        assert!(matches!(
            reports.hubs[0],
            HubReport::Skipped {
                bus: 1,
                device: 7,
                error: Error::DescriptorTooShort { len: 7 },
            }
        ));

        // No port status is requested from the rejected hub.
        let log = bus.log.borrow();
        let from_bad = log
            .transfers
            .iter()
            .filter(|(device, setup, _)| {
                *device == bad && setup.request == SetupReq::GetStatus as u8
            })
            .count();
        assert_eq!(from_bad, 0);
        assert_eq!(log.opened, log.closed);
    }

    #[test]
    fn wrong_descriptor_kind_skips_hub() {
        let mut bus = MockBus::default();
        let bad = bus.add_device(2, 5, usb::CLASS_HUB);
        bus.reply(
            bad,
            &Setup::get_hub_descriptor(0),
            Reply::Data(vec![0x12, 0x01, 0x00, 0x02, 0x09, 0x00, 0x01, 0x40]),
        );

        let mut reports = Collected::default();
        let result = enumerate(&bus, &Config::default(), &mut reports);

        assert!(matches!(result, Err(Error::NoHubFound)));
        assert!(matches!(
            reports.hubs[0],
            HubReport::Skipped {
                bus: 2,
                device: 5,
                error: Error::UnexpectedDescriptorKind { kind: 0x01 },
            }
        ));
    }

    #[test]
    fn unopenable_and_failing_hubs_are_skipped() {
        let mut bus = MockBus::default();
        let locked = bus.add_hub(1, 2, 4);
        bus.unopenable.push(locked);
        let stalled = bus.add_device(1, 3, usb::CLASS_HUB);
        bus.reply(stalled, &Setup::get_hub_descriptor(0), Reply::Fail);
        bus.add_hub(1, 4, 4);

        let mut reports = Collected::default();
        let registry = enumerate(&bus, &Config::default(), &mut reports).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(0).unwrap().device, 4);
        assert!(matches!(
            reports.hubs[0],
            HubReport::Skipped {
                error: Error::DeviceOpenFailed { bus: 1, device: 2, .. },
                ..
            }
        ));
        assert!(matches!(
            reports.hubs[1],
            HubReport::Skipped {
                error: Error::DescriptorReadFailed(TransportError::Stall),
                ..
            }
        ));
    }

    #[test]
    fn port_listing_stops_at_first_failure() {
        let mut bus = MockBus::default();
        let hub = bus.add_hub(1, 2, 4);
        bus.reply(hub, &Setup::get_port_status(2), Reply::Fail);

        let mut reports = Collected::default();
        enumerate(&bus, &Config::default(), &mut reports).unwrap();

        match &reports.hubs[0] {
            HubReport::Registered { ports, .. } => {
                assert_eq!(ports.entries.len(), 1);
                assert!(matches!(
                    ports.error,
                    Some(Error::PortStatusReadFailed { port: 2, .. })
                ));
            }
            other => panic!("unexpected report {:?}", other),
        }
        let status_requests: Vec<u16> = bus
            .transfers()
            .iter()
            .filter(|setup| setup.request == SetupReq::GetStatus as u8)
            .map(|setup| setup.index)
            .collect();
        assert_eq!(status_requests, vec![1, 2]);
    }

    #[test]
    fn short_port_status_is_a_failure() {
        let mut bus = MockBus::default();
        let hub = bus.add_hub(1, 2, 2);
        bus.reply(hub, &Setup::get_port_status(1), Reply::Data(vec![0x01, 0x01]));

        let mut handle = bus.open(&hub).unwrap();
        let listing = list_ports(&mut handle, 2, Duration::from_millis(1000));
        assert!(listing.entries.is_empty());
        assert!(matches!(
            listing.error,
            Some(Error::PortStatusReadFailed {
                port: 1,
                source: TransportError::ShortPacket(2),
            })
        ));
    }

    #[test]
    fn no_hub_is_an_error() {
        let mut bus = MockBus::default();
        bus.add_device(1, 1, 0x00);
        bus.add_device(1, 2, 0x03);

        let mut reports = Collected::default();
        assert!(matches!(
            enumerate(&bus, &Config::default(), &mut reports),
            Err(Error::NoHubFound)
        ));
        assert!(bus.transfers().is_empty());
        assert_eq!(bus.log.borrow().opened, 0);
    }

    #[test]
    fn too_many_hubs_is_an_error() {
        let mut bus = MockBus::default();
        for address in 1..=3 {
            bus.add_hub(1, address, 1);
        }
        let config = Config {
            max_hubs: 2,
            ..Config::default()
        };

        let mut reports = Collected::default();
        assert!(matches!(
            enumerate(&bus, &config, &mut reports),
            Err(Error::RegistryFull(2))
        ));
        assert_eq!(reports.hubs.len(), 2);
    }

    #[test]
    fn transfers_use_configured_timeout() {
        let mut bus = MockBus::default();
        bus.add_hub(1, 2, 1);
        let config = Config {
            timeout_ms: 1000,
            ..Config::default()
        };

        enumerate(&bus, &config, &mut Collected::default()).unwrap();
        let log = bus.log.borrow();
        assert_eq!(log.transfers.len(), 2);
        assert!(log
            .transfers
            .iter()
            .all(|(_, _, timeout)| *timeout == Duration::from_millis(1000)));
        assert_eq!(log.transfers[0].1.length, 1024);
    }
}
