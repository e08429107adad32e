//! Structured results handed to the presentation layer.

use crate::config::PowerState;
use crate::usb::{HubDescriptor, PortStatus};
use crate::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PortEntry {
    pub port: u16,
    pub status: PortStatus,
}

/// Status of a hub's ports, walked from port 1 upwards. The walk ends at the first port
/// whose status could not be read.
#[derive(Clone, Debug)]
pub struct PortListing {
    pub port_count: u8,
    pub entries: Vec<PortEntry>,
    pub error: Option<Error>,
}

impl PortListing {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_last(&self, entry: &PortEntry) -> bool {
        entry.port == u16::from(self.port_count)
    }

    pub fn get(&self, port: u16) -> Option<&PortStatus> {
        self.entries
            .iter()
            .find(|entry| entry.port == port)
            .map(|entry| &entry.status)
    }
}

#[derive(Clone, Debug)]
pub enum HubReport {
    Registered {
        index: usize,
        bus: u8,
        device: u8,
        descriptor: HubDescriptor,
        ports: PortListing,
    },
    /// A hub class device that could not be used. Enumeration went on without it.
    Skipped { bus: u8, device: u8, error: Error },
}

#[derive(Clone, Debug)]
pub struct PowerOutcome {
    pub hub: usize,
    pub bus: u8,
    pub device: u8,
    pub port: u16,
    pub power: PowerState,
    /// The hub's ports re-read after the command.
    pub ports: PortListing,
}

pub trait Reporter {
    fn hub(&mut self, report: &HubReport);

    fn power(&mut self, outcome: &PowerOutcome);
}

/// Keeps every report for later inspection.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct Collected {
    pub hubs: Vec<HubReport>,
    pub power: Option<PowerOutcome>,
}

#[cfg(test)]
impl Reporter for Collected {
    fn hub(&mut self, report: &HubReport) {
        self.hubs.push(report.clone());
    }

    fn power(&mut self, outcome: &PowerOutcome) {
        self.power = Some(outcome.clone());
    }
}
