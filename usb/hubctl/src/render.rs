//! Console rendering of hub reports, as a tree of ports under each hub.

use std::io::{self, Write};

use hubctl_interface::report::{HubReport, PortListing, PowerOutcome, Reporter};
use hubctl_interface::usb::{PortStatus, PowerSwitchingMode};

pub mod color {
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RESET: &str = "\x1b[0m";
}

/// Flag words in print order.
const PORT_FLAGS: [(PortStatus, &str); 10] = [
    (PortStatus::POWER, "power"),
    (PortStatus::LOW_SPEED, "lowspeed"),
    (PortStatus::HIGH_SPEED, "highspeed"),
    (PortStatus::TEST, "test"),
    (PortStatus::INDICATOR, "indicator"),
    (PortStatus::CONNECTION, "connect"),
    (PortStatus::ENABLE, "enable"),
    (PortStatus::SUSPEND, "suspend"),
    (PortStatus::OVER_CURRENT, "oc"),
    (PortStatus::RESET, "RESET"),
];

pub struct Renderer<W> {
    out: W,
    /// Print the one line summary of each hub. Only done when no power change was asked for.
    summaries: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, summaries: bool) -> Self {
        Self { out, summaries }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn error(&mut self, err: &dyn std::fmt::Display) -> io::Result<()> {
        writeln!(self.out, "{}> {}{}", color::RED, err, color::RESET)
    }

    /// Prints the error that ends the run.
    pub fn fatal(&mut self, err: &dyn std::fmt::Display) {
        if let Err(write_err) = self.error(err) {
            log::warn!("failed to write error: {}", write_err);
        }
    }

    fn write_hub(&mut self, report: &HubReport) -> io::Result<()> {
        match report {
            HubReport::Registered {
                index,
                bus,
                device,
                descriptor,
                ports,
            } => {
                if self.summaries {
                    let mode = descriptor.power_switching();
                    let mode_color = match mode {
                        PowerSwitchingMode::Ganged => color::YELLOW,
                        PowerSwitchingMode::Individual => color::GREEN,
                        PowerSwitchingMode::None => color::RED,
                    };
                    writeln!(
                        self.out,
                        "Hub {} (Bus {}, Dev {}) {}- {} power switching{}",
                        index,
                        bus,
                        device,
                        mode_color,
                        mode.as_str(),
                        color::RESET
                    )?;
                }
                self.write_ports(ports, true)
            }
            HubReport::Skipped { error, .. } => self.error(error),
        }
    }

    fn write_ports(&mut self, listing: &PortListing, with_error: bool) -> io::Result<()> {
        for entry in &listing.entries {
            let branch = if listing.is_last(entry) { " └" } else { " ├" };
            write!(self.out, "{}─ Port {:2}:", branch, entry.port)?;
            for (flag, name) in PORT_FLAGS.iter() {
                if entry.status.contains(*flag) {
                    write!(self.out, " {}", name)?;
                }
            }
            writeln!(self.out)?;
        }
        match &listing.error {
            Some(err) if with_error => self.error(err),
            _ => Ok(()),
        }
    }

    fn write_power(&mut self, outcome: &PowerOutcome) -> io::Result<()> {
        // A failed read-back ends the run; the caller prints that error.
        self.write_ports(&outcome.ports, false)?;
        if outcome.ports.is_complete() {
            writeln!(
                self.out,
                "> Hub:{} Bus:{} Device:{} Port:{} power->{}",
                outcome.hub, outcome.bus, outcome.device, outcome.port, outcome.power
            )?;
        }
        Ok(())
    }
}

impl<W: Write> Reporter for Renderer<W> {
    fn hub(&mut self, report: &HubReport) {
        if let Err(err) = self.write_hub(report) {
            log::warn!("failed to write hub report: {}", err);
        }
    }

    fn power(&mut self, outcome: &PowerOutcome) {
        if let Err(err) = self.write_power(outcome) {
            log::warn!("failed to write power report: {}", err);
        }
    }
}
