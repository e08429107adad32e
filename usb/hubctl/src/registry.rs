use crate::Error;

/// A hub found during enumeration. The device is kept so it can be opened again; the open
/// handle itself is not.
#[derive(Clone, Debug)]
pub struct HubRecord<D> {
    pub bus: u8,
    pub device: u8,
    pub port_count: u8,
    pub device_ref: D,
}

/// Hubs in the order they were discovered. The index of a hub is its position here.
#[derive(Debug)]
pub struct HubRegistry<D> {
    hubs: Vec<HubRecord<D>>,
    capacity: usize,
}

impl<D> HubRegistry<D> {
    pub const DEFAULT_CAPACITY: usize = 128;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hubs: Vec::new(),
            capacity,
        }
    }

    pub fn register(&mut self, record: HubRecord<D>) -> Result<usize, Error> {
        if self.hubs.len() >= self.capacity {
            return Err(Error::RegistryFull(self.capacity));
        }
        self.hubs.push(record);
        Ok(self.hubs.len() - 1)
    }

    pub fn get(&self, index: usize) -> Option<&HubRecord<D>> {
        self.hubs.get(index)
    }

    /// First hub registered at `bus`/`device`.
    pub fn find_by_address(&self, bus: u8, device: u8) -> Option<usize> {
        self.hubs
            .iter()
            .position(|hub| hub.bus == bus && hub.device == device)
    }

    pub fn len(&self) -> usize {
        self.hubs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.hubs.is_empty()
    }
}

impl<D> Default for HubRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}
