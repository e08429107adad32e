use crate::config::HubTarget;
use crate::registry::HubRegistry;
use crate::Error;

/// Finds the registry index of the hub the operator named. No device is touched.
pub fn resolve<D>(registry: &HubRegistry<D>, target: HubTarget) -> Result<usize, Error> {
    match target {
        HubTarget::Index(index) if index < registry.len() => Ok(index),
        HubTarget::Index(_) => Err(Error::TargetNotFound),
        HubTarget::Address { bus, device } => registry
            .find_by_address(bus, device)
            .ok_or(Error::TargetNotFound),
    }
}
