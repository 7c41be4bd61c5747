use crate::StackError;
use rustknx_core::dpt::{DptId, DptValue, DptXlator, DptXlatorFactory};
use rustknx_core::{Flags, Priority};
use std::sync::{Arc, Mutex, Weak};

/// Direction of a datapoint relative to the device logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatapointAccess {
    Input,
    Output,
    Param,
}

/// Observer for datapoint value changes.
pub trait DatapointObserver: Send + Sync {
    fn datapoint_changed(&self, dp: &Datapoint, old: Option<DptValue>, new: DptValue);
}

/// A typed process value.
///
/// The cache holds the raw data word; conversions go through two
/// translators resolved at construction: the specific one enforces the
/// sub-DPT's limits on values set by the application, the generic one
/// accepts any bus data of the right format.
///
/// Change propagation is asymmetric: [`set_value`](Self::set_value) (the
/// application side) signals subscribers and then the owner, while
/// [`set_frame`](Self::set_frame) (the bus side) notifies the owner only.
pub struct Datapoint {
    name: String,
    access: DatapointAccess,
    dpt_id: DptId,
    xlator: Box<dyn DptXlator>,
    xlator_generic: Box<dyn DptXlator>,
    flags: Option<Flags>,
    priority: Option<Priority>,
    data: Mutex<Option<u32>>,
    subscribers: Mutex<Vec<Arc<dyn DatapointObserver>>>,
    owner: Mutex<Option<Weak<dyn DatapointObserver>>>,
}

impl Datapoint {
    pub fn new(
        name: impl Into<String>,
        access: DatapointAccess,
        dpt_id: DptId,
    ) -> Result<Self, StackError> {
        let xlator = DptXlatorFactory::create(dpt_id)?;
        let xlator_generic = DptXlatorFactory::create(dpt_id.to_generic())?;
        Ok(Self {
            name: name.into(),
            access,
            dpt_id,
            xlator,
            xlator_generic,
            flags: None,
            priority: None,
            data: Mutex::new(None),
            subscribers: Mutex::new(Vec::new()),
            owner: Mutex::new(None),
        })
    }

    /// Seeds the cache without signalling anyone.
    pub fn with_default(self, value: DptValue) -> Result<Self, StackError> {
        let data = self.xlator.value_to_data(&value)?;
        {
            let mut cache = self.data.lock().unwrap_or_else(|e| e.into_inner());
            *cache = Some(data);
        }
        Ok(self)
    }

    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = Some(flags);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn access(&self) -> DatapointAccess {
        self.access
    }

    pub fn dpt_id(&self) -> DptId {
        self.dpt_id
    }

    pub fn flags(&self) -> Option<Flags> {
        self.flags
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn unit(&self) -> Option<&'static str> {
        self.xlator.unit()
    }

    pub fn add_subscriber(&self, subscriber: Arc<dyn DatapointObserver>) {
        let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subs.push(subscriber);
    }

    pub fn set_owner(&self, owner: Weak<dyn DatapointObserver>) {
        let mut slot = self.owner.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(owner);
    }

    /// Application-side write: validates against the sub-DPT's limits,
    /// caches, then signals subscribers and the owner.
    pub fn set_value(&self, value: DptValue) -> Result<(), StackError> {
        let data = self.xlator.value_to_data(&value)?;
        let old = self.swap_data(data)?;
        let new = self.xlator.data_to_value(data)?;
        for subscriber in self.subscriber_snapshot() {
            subscriber.datapoint_changed(self, old.clone(), new.clone());
        }
        self.notify_owner(old, new);
        Ok(())
    }

    /// Bus-side write: accepts any well-formed frame of the format, caches,
    /// and notifies the owner only. Subscribers are not signalled, so a bus
    /// update never triggers a retransmission.
    pub fn set_frame(&self, frame: &[u8]) -> Result<(), StackError> {
        let data = self.xlator_generic.frame_to_data(frame)?;
        let old = self.swap_data(data)?;
        let new = self.xlator_generic.data_to_value(data)?;
        self.notify_owner(old, new);
        Ok(())
    }

    /// The cached value, or `Ok(None)` when nothing has been set yet.
    pub fn value(&self) -> Result<Option<DptValue>, StackError> {
        let cache = self.data.lock().unwrap_or_else(|e| e.into_inner());
        match *cache {
            Some(data) => Ok(Some(self.xlator.data_to_value(data)?)),
            None => Ok(None),
        }
    }

    /// The cached value as a bus frame plus the format's type size.
    pub fn frame(&self) -> Result<(Vec<u8>, usize), StackError> {
        let data = {
            let cache = self.data.lock().unwrap_or_else(|e| e.into_inner());
            cache.ok_or(StackError::NoValue)?
        };
        let frame = self.xlator_generic.data_to_frame(data)?;
        Ok((frame, self.xlator.type_size()))
    }

    fn swap_data(&self, data: u32) -> Result<Option<DptValue>, StackError> {
        let old_data = {
            let mut cache = self.data.lock().unwrap_or_else(|e| e.into_inner());
            cache.replace(data)
        };
        match old_data {
            Some(d) => Ok(Some(self.xlator_generic.data_to_value(d)?)),
            None => Ok(None),
        }
    }

    fn subscriber_snapshot(&self) -> Vec<Arc<dyn DatapointObserver>> {
        let subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subs.clone()
    }

    fn notify_owner(&self, old: Option<DptValue>, new: DptValue) {
        let owner = {
            let slot = self.owner.lock().unwrap_or_else(|e| e.into_inner());
            slot.clone()
        };
        if let Some(owner) = owner.and_then(|w| w.upgrade()) {
            owner.datapoint_changed(self, old, new);
        }
    }
}
