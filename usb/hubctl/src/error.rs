use thiserror::Error;

use crate::transport::TransportError;

#[derive(Clone, Debug, Error)]
pub enum Error {
    #[error("hub descriptor too short ({len} bytes)")]
    DescriptorTooShort { len: usize },

    #[error("not a hub descriptor (type {kind:#04x})")]
    UnexpectedDescriptorKind { kind: u8 },

    #[error("can't get hub descriptor: {0}")]
    DescriptorReadFailed(TransportError),

    #[error("can't open device (bus {bus}, dev {device}): {source}")]
    DeviceOpenFailed {
        bus: u8,
        device: u8,
        source: TransportError,
    },

    #[error("cannot read port {port} status: {source}")]
    PortStatusReadFailed { port: u16, source: TransportError },

    #[error("failed to access USB bus: {0}")]
    TopologyUnavailable(TransportError),

    #[error("no hub found")]
    NoHubFound,

    #[error("device not found")]
    TargetNotFound,

    #[error("port {port} out of range (hub has {port_count} ports)")]
    PortOutOfRange { port: u16, port_count: u8 },

    #[error("failed to control port {port} power: {source}")]
    PowerCommandFailed { port: u16, source: TransportError },

    #[error("hub registry full ({0} entries)")]
    RegistryFull(usize),
}

impl Error {
    /// Whether the error ends the run. The others only skip one device, or the rest of one
    /// hub's port listing.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::DescriptorTooShort { .. }
            | Self::UnexpectedDescriptorKind { .. }
            | Self::DescriptorReadFailed(_)
            | Self::DeviceOpenFailed { .. }
            | Self::PortStatusReadFailed { .. } => false,
            Self::TopologyUnavailable(_)
            | Self::NoHubFound
            | Self::TargetNotFound
            | Self::PortOutOfRange { .. }
            | Self::PowerCommandFailed { .. }
            | Self::RegistryFull(_) => true,
        }
    }
}
